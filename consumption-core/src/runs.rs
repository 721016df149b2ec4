//! Labelled collection of a baseline and the policy runs derived from it.

use crate::engine::ProjectionResult;
use crate::errors::{ConsumptionError, ConsumptionResult};
use crate::policy::PolicyRun;
use crate::scenario::ScenarioState;
use log::info;
use std::collections::BTreeMap;

/// A baseline projection and any number of labelled policy projections
///
/// Every policy run starts from its own copy of the baseline state, so the order in
/// which runs are added has no effect on their results.
#[derive(Debug, Clone)]
pub struct ScenarioRuns {
    baseline_state: ScenarioState,
    baseline: ProjectionResult,
    policies: BTreeMap<String, ProjectionResult>,
}

impl ScenarioRuns {
    /// Project the baseline of `state`
    pub fn new(state: ScenarioState) -> ConsumptionResult<Self> {
        let baseline = state.emission_calculation(None)?;
        Ok(Self {
            baseline_state: state,
            baseline,
            policies: BTreeMap::new(),
        })
    }

    pub fn baseline_state(&self) -> &ScenarioState {
        &self.baseline_state
    }

    pub fn baseline(&self) -> &ProjectionResult {
        &self.baseline
    }

    /// Project a policy run and store it under `label`
    ///
    /// Replaces any earlier result with the same label.
    pub fn add_policy(&mut self, label: &str, run: &PolicyRun) -> ConsumptionResult<&ProjectionResult> {
        let result = self.baseline_state.emission_calculation(Some(run))?;
        if self.policies.insert(label.to_string(), result).is_some() {
            info!("Replaced policy run {}", label);
        }
        self.get(label)
    }

    pub fn get(&self, label: &str) -> ConsumptionResult<&ProjectionResult> {
        self.policies
            .get(label)
            .ok_or_else(|| ConsumptionError::Error(format!("No policy run labelled {}", label)))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(|label| label.as_str())
    }

    pub fn policies(&self) -> &BTreeMap<String, ProjectionResult> {
        &self.policies
    }

    /// Area emissions of a policy run minus those of the baseline in `year`
    ///
    /// Negative values are savings.
    pub fn difference(&self, label: &str, year: i32) -> ConsumptionResult<f64> {
        let policy = self.get(label)?;
        let first = *self.baseline.area.years().start();
        match (policy.area.total(year), self.baseline.area.total(year)) {
            (Some(policy), Some(baseline)) => Ok(policy - baseline),
            _ => Err(ConsumptionError::InvalidYear {
                year,
                first,
                last: *self.baseline.area.years().end(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use is_close::is_close;

    fn runs() -> ScenarioRuns {
        let state =
            ScenarioState::new(fixtures::shared_reference(), &fixtures::ireland_config()).unwrap();
        ScenarioRuns::new(state).unwrap()
    }

    #[test]
    fn construction_only_difference() {
        let mut runs = runs();
        runs.add_policy(
            "new homes",
            &PolicyRun::new(2030).with_new_floor_area(1000.0),
        )
        .unwrap();

        assert!(is_close!(runs.difference("new homes", 2030).unwrap(), 520.0 * 1000.0));
        assert_eq!(runs.difference("new homes", 2031).unwrap(), 0.0);
        assert!(runs.difference("new homes", 2019).is_err());
        assert!(runs.difference("missing", 2030).is_err());
    }

    #[test]
    fn labels_are_sorted() {
        let mut runs = runs();
        runs.add_policy("b", &PolicyRun::new(2030)).unwrap();
        runs.add_policy("a", &PolicyRun::new(2040)).unwrap();
        runs.add_policy("b", &PolicyRun::new(2035)).unwrap();
        assert_eq!(runs.labels().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(runs.policies().len(), 2);
    }
}
