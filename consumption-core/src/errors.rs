use thiserror::Error;

/// Error type for invalid inputs and failed projections.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsumptionError {
    #[error("{0}")]
    Error(String),
    #[error("Unknown country '{0}'")]
    UnknownCountry(String),
    #[error("No reference data is available for {0}")]
    CountryNotAvailable(String),
    #[error("Unknown area type '{0}'. Expected one of average, city, rural or town")]
    UnknownAreaType(String),
    #[error("Unknown product '{0}'")]
    UnknownProduct(String),
    #[error("Year {year} is outside of the supported range {first}-{last}")]
    InvalidYear { year: i32, first: i32, last: i32 },
    #[error("Policy year {policy_year} must be between the base year {base_year} and {last}")]
    InvalidPolicyYear {
        policy_year: i32,
        base_year: i32,
        last: i32,
    },
    #[error("Population must be positive, got {0}")]
    InvalidPopulation(u64),
    #[error("Household size must be a finite, non-negative number, got {0}")]
    InvalidHouseholdSize(f64),
    #[error("{name} must be a percentage between 0 and 100, got {value}")]
    ScalerOutOfRange { name: String, value: f64 },
    #[error("Proportions of {group} must sum to 100%, got {sum}")]
    UnbalancedProportions { group: String, sum: f64 },
    #[error("Redistributed biofuel spend {biofuel} exceeds the total fuel spend {total}")]
    BiofuelShareExceedsTotal { biofuel: f64, total: f64 },
    #[error("Policy lever '{0}' was supplied more than once")]
    DuplicatePolicy(String),
    #[error("Cannot redistribute {0}: the current total is zero")]
    EmptyTotal(String),
    #[error("Demand for '{product}' became negative ({value})")]
    NegativeDemand { product: String, value: f64 },
    #[error("Non-finite emissions for '{product}' in {year}")]
    NonFiniteResult { year: i32, product: String },
    #[error("Shape mismatch for {name}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenience type for `Result<T, ConsumptionError>`.
pub type ConsumptionResult<T> = Result<T, ConsumptionError>;

impl From<toml::de::Error> for ConsumptionError {
    fn from(value: toml::de::Error) -> Self {
        ConsumptionError::Config(value.to_string())
    }
}
