/// Energy content of diesel
/// unit: MJ / l
pub const DIESEL_ENERGY_DENSITY: f64 = 38.6;

/// Energy content of petrol
/// unit: MJ / l
pub const PETROL_ENERGY_DENSITY: f64 = 34.2;

/// unit: kWh / MJ
pub const KWH_PER_MJ: f64 = 0.278;

/// How many times more efficient an electric drivetrain is than a combustion engine
pub const EV_EFFICIENCY_RATIO: f64 = 4.54;

/// Tolerance used when checking that proportions add up to 100 %
pub const PROPORTION_TOLERANCE: f64 = 1e-6;
