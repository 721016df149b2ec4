//! Household consumption emissions projections
//!
//! Projects the greenhouse-gas emissions of an average household in a European region
//! from its baseline year to 2050, and compares the baseline with policy runs.
//!
//! ```
//! use consumption::country::Country;
//! use consumption::fixtures;
//! use consumption::policies::EfficiencyRetrofit;
//! use consumption::{PolicyRun, ScenarioConfig, ScenarioState};
//!
//! let config = ScenarioConfig::new(2023, Country::Ireland, 195000);
//! let state = ScenarioState::new(fixtures::shared_reference(), &config)?;
//!
//! let baseline = state.emission_calculation(None)?;
//! let run = PolicyRun::new(2025).with_lever(EfficiencyRetrofit::new(10.0));
//! let policy = state.emission_calculation(Some(&run))?;
//! assert!(policy.area.total(2030) < baseline.area.total(2030));
//! # Ok::<(), consumption::ConsumptionError>(())
//! ```

pub use consumption_core::{
    config, country, engine, errors, fixtures, policy, product, reference, runs, scenario, sector,
    table,
};
pub use consumption_core::{
    ConsumptionError, ConsumptionResult, PolicyLever, PolicyPhase, PolicyRun, PolicyStage,
    Projection, ProjectionResult, ScenarioConfig, ScenarioState,
};
pub use consumption_policies as policies;

#[cfg(feature = "python")]
mod python;
