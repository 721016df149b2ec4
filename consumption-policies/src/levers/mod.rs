mod biofuel;
mod efficiency;
mod generation;
mod heating;
mod modal_shift;
mod vehicles;

pub use biofuel::BiofuelSubstitution;
pub use efficiency::EfficiencyRetrofit;
pub use generation::LocalGeneration;
pub use heating::LocalHeating;
pub use modal_shift::ModalShift;
pub use vehicles::{replacement_electricity, ElectricVehicles};
