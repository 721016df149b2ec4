pub mod config;
pub mod country;
pub mod engine;
pub mod errors;
pub mod fixtures;
pub mod policy;
pub mod product;
pub mod reference;
pub mod runs;
pub mod scenario;
pub mod sector;
pub mod table;

pub use engine::{PolicyPhase, Projection, ProjectionResult};
pub use errors::{ConsumptionError, ConsumptionResult};
pub use policy::{PolicyLever, PolicyRun, PolicyStage};
pub use scenario::{ScenarioConfig, ScenarioState};
