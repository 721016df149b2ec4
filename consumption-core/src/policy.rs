//! Policy levers and the parameters of a policy run.
//!
//! A policy lever is a one-time transformation of a [`ScenarioState`] applied in the
//! policy year. Levers are implemented outside of this crate and registered with
//! `typetag`, which allows a [`PolicyRun`] to be read from a configuration file.

use crate::errors::{ConsumptionError, ConsumptionResult};
use crate::scenario::ScenarioState;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::Arc;

/// Position of a lever within the policy year
///
/// Several levers read electricity and heating totals that earlier levers may already
/// have changed, so levers are always applied in this order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PolicyStage {
    Efficiency,
    LocalGeneration,
    LocalHeating,
    Biofuel,
    ElectricVehicles,
    ModalShift,
}

/// A one-time change to a scenario applied in the policy year
#[typetag::serde(tag = "type")]
pub trait PolicyLever: Debug + Send + Sync {
    fn stage(&self) -> PolicyStage;

    /// Check the lever's parameters without touching any state
    fn validate(&self) -> ConsumptionResult<()> {
        Ok(())
    }

    /// Mutate the state in place
    fn apply(&self, state: &mut ScenarioState) -> ConsumptionResult<()>;
}

/// Convert a percentage in the range 0-100 into a fraction
pub fn percentage(name: &str, value: f64) -> ConsumptionResult<f64> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(value / 100.0)
    } else {
        Err(ConsumptionError::ScalerOutOfRange {
            name: name.to_string(),
            value,
        })
    }
}

/// Parameters of a policy run
///
/// A run with no levers is still a policy run: the policy population applies from the
/// policy year and construction emissions are added for any new floor area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyRun {
    /// Year in which the levers are applied. Defaults to the baseline year.
    #[serde(default)]
    pub policy_year: Option<i32>,
    /// Population from the policy year onwards. Defaults to the baseline population.
    #[serde(default)]
    pub population: Option<u64>,
    /// New residential floor area built in the policy year
    /// unit: m^2
    #[serde(default)]
    pub new_floor_area: f64,
    #[serde(default)]
    pub levers: Vec<Arc<dyn PolicyLever>>,
}

impl PolicyRun {
    pub fn new(policy_year: i32) -> Self {
        Self {
            policy_year: Some(policy_year),
            ..Default::default()
        }
    }

    pub fn with_population(mut self, population: u64) -> Self {
        self.population = Some(population);
        self
    }

    pub fn with_new_floor_area(mut self, new_floor_area: f64) -> Self {
        self.new_floor_area = new_floor_area;
        self
    }

    pub fn with_lever<L: PolicyLever + 'static>(mut self, lever: L) -> Self {
        self.levers.push(Arc::new(lever));
        self
    }

    /// Validate the levers and return them in application order
    pub fn ordered_levers(&self) -> ConsumptionResult<Vec<Arc<dyn PolicyLever>>> {
        let mut seen = HashSet::new();
        for lever in self.levers.iter() {
            lever.validate()?;
            if !seen.insert(lever.stage()) {
                return Err(ConsumptionError::DuplicatePolicy(format!(
                    "{:?}",
                    lever.stage()
                )));
            }
        }
        let mut levers = self.levers.clone();
        levers.sort_by_key(|lever| lever.stage());
        Ok(levers)
    }

    pub fn validate(&self) -> ConsumptionResult<()> {
        if !(self.new_floor_area.is_finite() && self.new_floor_area >= 0.0) {
            return Err(ConsumptionError::Error(format!(
                "New floor area must be non-negative, got {}",
                self.new_floor_area
            )));
        }
        if self.population == Some(0) {
            return Err(ConsumptionError::InvalidPopulation(0));
        }
        self.ordered_levers().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct Marker {
        stage: PolicyStage,
    }

    #[typetag::serde]
    impl PolicyLever for Marker {
        fn stage(&self) -> PolicyStage {
            self.stage
        }

        fn apply(&self, _state: &mut ScenarioState) -> ConsumptionResult<()> {
            Ok(())
        }
    }

    #[test]
    fn percentages() {
        assert_eq!(percentage("scaler", 50.0).unwrap(), 0.5);
        assert_eq!(percentage("scaler", 0.0).unwrap(), 0.0);
        assert_eq!(percentage("scaler", 100.0).unwrap(), 1.0);
        assert!(percentage("scaler", 100.5).is_err());
        assert!(percentage("scaler", -1.0).is_err());
        assert!(percentage("scaler", f64::NAN).is_err());
    }

    #[test]
    fn levers_are_ordered_by_stage() {
        let run = PolicyRun::new(2025)
            .with_lever(Marker {
                stage: PolicyStage::ModalShift,
            })
            .with_lever(Marker {
                stage: PolicyStage::Efficiency,
            })
            .with_lever(Marker {
                stage: PolicyStage::LocalHeating,
            });

        let stages: Vec<_> = run
            .ordered_levers()
            .unwrap()
            .iter()
            .map(|l| l.stage())
            .collect();
        assert_eq!(
            stages,
            vec![
                PolicyStage::Efficiency,
                PolicyStage::LocalHeating,
                PolicyStage::ModalShift
            ]
        );
    }

    #[test]
    fn duplicate_levers_are_rejected() {
        let run = PolicyRun::new(2025)
            .with_lever(Marker {
                stage: PolicyStage::Biofuel,
            })
            .with_lever(Marker {
                stage: PolicyStage::Biofuel,
            });
        assert_eq!(
            run.validate().unwrap_err(),
            ConsumptionError::DuplicatePolicy("Biofuel".to_string())
        );
    }

    #[test]
    fn invalid_run_parameters() {
        assert!(PolicyRun::new(2025).with_new_floor_area(-1.0).validate().is_err());
        assert!(PolicyRun::new(2025).with_population(0).validate().is_err());
        assert!(PolicyRun::default().validate().is_ok());
    }

    #[test]
    fn deserialise_from_toml() {
        let run: PolicyRun = toml::from_str(
            r#"
            policy_year = 2030
            new_floor_area = 1000.0

            [[levers]]
            type = "Marker"
            stage = "Biofuel"
            "#,
        )
        .unwrap();
        assert_eq!(run.policy_year, Some(2030));
        assert_eq!(run.population, None);
        assert_eq!(run.levers.len(), 1);
        assert_eq!(run.levers[0].stage(), PolicyStage::Biofuel);
    }
}
