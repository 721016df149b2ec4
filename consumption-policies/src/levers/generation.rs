//! Local electricity generation, usually rooftop solar.

use consumption_core::errors::{ConsumptionError, ConsumptionResult};
use consumption_core::policy::{percentage, PolicyLever, PolicyStage};
use consumption_core::product::ElectricityTechnology;
use consumption_core::scenario::{ScenarioState, DIRECT, INDIRECT};
use log::debug;
use serde::{Deserialize, Serialize};

/// Local generation
///
/// A share of every electricity product is replaced by locally generated electricity,
/// booked as "Electricity nec". That product then carries the life-cycle intensity of
/// the chosen technology. Total electricity demand does not change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalGeneration {
    pub technology: ElectricityTechnology,
    /// Share of electricity generated locally
    /// unit: %
    pub scaler: f64,
}

impl LocalGeneration {
    pub fn new(technology: ElectricityTechnology, scaler: f64) -> Self {
        Self { technology, scaler }
    }
}

#[typetag::serde]
impl PolicyLever for LocalGeneration {
    fn stage(&self) -> PolicyStage {
        PolicyStage::LocalGeneration
    }

    fn validate(&self) -> ConsumptionResult<()> {
        percentage("local generation scaler", self.scaler).map(|_| ())
    }

    fn apply(&self, state: &mut ScenarioState) -> ConsumptionResult<()> {
        let scaler = percentage("local generation scaler", self.scaler)?;
        let lca = state
            .country_tables()
            .lca_intensities
            .get(&self.technology)
            .copied()
            .ok_or_else(|| {
                ConsumptionError::Error(format!(
                    "No life-cycle intensity for {} in {}",
                    self.technology,
                    state.country()
                ))
            })?;
        let electricity = state.key_products().electricity.clone();
        let nec = state.key_products().electricity_nec;
        debug!(
            "{:.1}% of electricity in {} generated locally by {:?}",
            self.scaler,
            state.region(),
            self.technology
        );

        let total = state.electricity_total();
        for product in electricity.iter() {
            state.scale_demand(*product, 1.0 - scaler);
        }
        state.set_demand(nec, state.demand_of(nec) + total * scaler);

        state.set_intensity(DIRECT, nec, lca.direct);
        state.set_intensity(INDIRECT, nec, lca.indirect);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consumption_core::fixtures;
    use is_close::is_close;

    fn ireland() -> ScenarioState {
        ScenarioState::new(fixtures::shared_reference(), &fixtures::ireland_config()).unwrap()
    }

    #[test]
    fn electricity_total_is_conserved() {
        for scaler in [0.0, 25.0, 50.0, 100.0] {
            let mut state = ireland();
            let before = state.electricity_total();
            LocalGeneration::new(ElectricityTechnology::SolarPhotovoltaic, scaler)
                .apply(&mut state)
                .unwrap();
            assert!(is_close!(state.electricity_total(), before));
        }
    }

    #[test]
    fn nec_takes_the_freed_share() {
        let mut state = ireland();
        let before = state.electricity_total();
        let nec = state.key_products().electricity_nec;
        LocalGeneration::new(ElectricityTechnology::Wind, 30.0)
            .apply(&mut state)
            .unwrap();

        // The fixture has no prior nec demand
        assert!(is_close!(state.demand_of(nec), before * 0.3));
        assert_eq!(state.intensity(DIRECT, nec), 0.0);
        assert_eq!(state.intensity(INDIRECT, nec), 0.012);
    }

    #[test]
    fn prior_nec_demand_is_kept() {
        let mut state = ireland();
        let nec = state.key_products().electricity_nec;
        state.set_demand(nec, 100.0);
        let before = state.electricity_total();

        LocalGeneration::new(ElectricityTechnology::Geothermal, 50.0)
            .apply(&mut state)
            .unwrap();
        assert!(is_close!(state.demand_of(nec), 50.0 + before * 0.5));
        assert!(is_close!(state.electricity_total(), before));
    }

    #[test]
    fn missing_technology() {
        let mut reference = fixtures::reference_data();
        let mut countries = std::collections::BTreeMap::new();
        for country in reference.countries() {
            let mut tables = reference.country(country).unwrap().clone();
            tables.lca_intensities.clear();
            countries.insert(country, tables);
        }
        reference = consumption_core::reference::ReferenceData::new(
            reference.products().clone(),
            reference.sector_map().clone(),
            countries,
        )
        .unwrap();
        let mut state =
            ScenarioState::new(std::sync::Arc::new(reference), &fixtures::ireland_config())
                .unwrap();

        assert!(LocalGeneration::new(ElectricityTechnology::Wind, 10.0)
            .apply(&mut state)
            .is_err());
    }
}
