//! Whole-projection configuration read from TOML.
//!
//! ```toml
//! [scenario]
//! year = 2023
//! country = "Ireland"
//! population = 195000
//!
//! [policies.retrofit]
//! policy_year = 2025
//! new_floor_area = 50000.0
//!
//! [[policies.retrofit.levers]]
//! type = "EfficiencyRetrofit"
//! scaler = 10.0
//! ```

use crate::errors::ConsumptionResult;
use crate::policy::PolicyRun;
use crate::reference::ReferenceData;
use crate::runs::ScenarioRuns;
use crate::scenario::{ScenarioConfig, ScenarioState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A baseline scenario and the labelled policy runs to compare against it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionConfig {
    pub scenario: ScenarioConfig,
    #[serde(default)]
    pub policies: BTreeMap<String, PolicyRun>,
}

impl ProjectionConfig {
    pub fn from_toml_str(content: &str) -> ConsumptionResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Check every policy run before any projection is started
    pub fn validate(&self) -> ConsumptionResult<()> {
        self.policies.values().try_for_each(|run| run.validate())
    }

    /// Build the baseline and project it together with every policy run
    pub fn run(&self, reference: Arc<ReferenceData>) -> ConsumptionResult<ScenarioRuns> {
        self.validate()?;
        let state = ScenarioState::new(reference, &self.scenario)?;
        let mut runs = ScenarioRuns::new(state)?;
        for (label, run) in self.policies.iter() {
            runs.add_policy(label, run)?;
        }
        Ok(runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::Country;
    use crate::errors::ConsumptionError;
    use crate::fixtures;

    #[test]
    fn read_and_run() {
        let config = ProjectionConfig::from_toml_str(
            r#"
            [scenario]
            year = 2023
            country = "IE"
            population = 195000

            [policies.homes]
            policy_year = 2025
            population = 205000
            new_floor_area = 50000.0

            [policies.later]
            policy_year = 2040
            "#,
        )
        .unwrap();
        assert_eq!(config.scenario.country, Country::Ireland);
        assert_eq!(config.policies.len(), 2);

        let runs = config.run(fixtures::shared_reference()).unwrap();
        assert_eq!(runs.labels().collect::<Vec<_>>(), vec!["homes", "later"]);
        assert!(runs.difference("homes", 2025).unwrap() > 0.0);
    }

    #[test]
    fn policies_are_optional() {
        let config = ProjectionConfig::from_toml_str(
            "[scenario]\nyear = 2030\ncountry = \"Finland\"\npopulation = 5000\n",
        )
        .unwrap();
        assert!(config.policies.is_empty());
        let runs = config.run(fixtures::shared_reference()).unwrap();
        assert_eq!(runs.baseline().per_capita.years(), 2030..=2050);
    }

    #[test]
    fn invalid_policy_is_reported_before_running() {
        let config = ProjectionConfig::from_toml_str(
            r#"
            [scenario]
            year = 2023
            country = "Ireland"
            population = 195000

            [policies.broken]
            population = 0
            "#,
        )
        .unwrap();
        assert_eq!(
            config.run(fixtures::shared_reference()).unwrap_err(),
            ConsumptionError::InvalidPopulation(0)
        );
    }
}
