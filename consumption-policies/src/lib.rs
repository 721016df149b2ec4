//! Policy levers for household consumption scenarios
//!
//! Each lever is a one-time change to a [`consumption_core::ScenarioState`] applied in
//! the policy year of a [`consumption_core::PolicyRun`]. Levers are registered with
//! `typetag`, so a run can be described in TOML or JSON:
//!
//! ```toml
//! [[levers]]
//! type = "ElectricVehicles"
//! scaler = 30.0
//! ```
//!
//! Whatever order they are listed in, levers fire in the order given by
//! [`consumption_core::PolicyStage`]:
//! - [`EfficiencyRetrofit`]
//! - [`LocalGeneration`]
//! - [`LocalHeating`]
//! - [`BiofuelSubstitution`]
//! - [`ElectricVehicles`]
//! - [`ModalShift`]

pub mod constants;
pub mod levers;

pub use levers::{
    BiofuelSubstitution, EfficiencyRetrofit, ElectricVehicles, LocalGeneration, LocalHeating,
    ModalShift,
};
