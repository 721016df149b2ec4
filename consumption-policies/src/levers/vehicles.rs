//! Uptake of electric vehicles.

use crate::constants::{
    DIESEL_ENERGY_DENSITY, EV_EFFICIENCY_RATIO, KWH_PER_MJ, PETROL_ENERGY_DENSITY,
};
use consumption_core::errors::ConsumptionResult;
use consumption_core::policy::{percentage, PolicyLever, PolicyStage};
use consumption_core::reference::FuelPrices;
use consumption_core::scenario::ScenarioState;
use log::debug;
use serde::{Deserialize, Serialize};

/// Electric vehicle uptake
///
/// `scaler` percent of vehicles become electric. Spend on every transport fuel is
/// reduced by that share and the fuel no longer bought is converted into the
/// electricity needed to drive the same distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectricVehicles {
    /// Share of vehicles that become electric
    /// unit: %
    pub scaler: f64,
}

impl ElectricVehicles {
    pub fn new(scaler: f64) -> Self {
        Self { scaler }
    }
}

/// Electricity needed to replace the given fuel spend
/// unit: kWh / yr
pub fn replacement_electricity(diesel_spend: f64, petrol_spend: f64, prices: &FuelPrices) -> f64 {
    let diesel = diesel_spend / prices.diesel * DIESEL_ENERGY_DENSITY;
    let petrol = petrol_spend / prices.petrol * PETROL_ENERGY_DENSITY;
    (diesel + petrol) * KWH_PER_MJ / EV_EFFICIENCY_RATIO
}

#[typetag::serde]
impl PolicyLever for ElectricVehicles {
    fn stage(&self) -> PolicyStage {
        PolicyStage::ElectricVehicles
    }

    fn validate(&self) -> ConsumptionResult<()> {
        percentage("electric vehicle scaler", self.scaler).map(|_| ())
    }

    fn apply(&self, state: &mut ScenarioState) -> ConsumptionResult<()> {
        let scaler = percentage("electric vehicle scaler", self.scaler)?;
        let key = state.key_products().clone();
        let fuels = key.fuels;

        let diesel_spend = state.total_demand(&[fuels.biodiesel, fuels.diesel]) * scaler;
        let petrol_spend = state.total_demand(&[fuels.gasoline, fuels.biogasoline]) * scaler;
        for product in fuels.all() {
            state.scale_demand(product, 1.0 - scaler);
        }

        let added = replacement_electricity(
            diesel_spend,
            petrol_spend,
            &state.country_tables().fuel_prices,
        );
        debug!(
            "{:.1}% electric vehicles in {} add {:.1} kWh",
            self.scaler,
            state.region(),
            added
        );

        let electricity_total = state.electricity_total();
        if electricity_total > 0.0 {
            let factor = (electricity_total + added) / electricity_total;
            for product in key.electricity.iter() {
                state.scale_demand(*product, factor);
            }
        } else {
            let per_product = added / key.electricity.len() as f64;
            for product in key.electricity.iter() {
                state.set_demand(*product, state.demand_of(*product) + per_product);
            }
        }
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
    fn conversion() {
        let prices = FuelPrices {
            diesel: 2.0,
            petrol: 1.0,
        };
        // 10 l of diesel and 5 l of petrol
        let expected = (10.0 * 38.6 + 5.0 * 34.2) * 0.278 / 4.54;
        assert!(is_close!(replacement_electricity(20.0, 5.0, &prices), expected));
    }

    #[test]
    fn fuel_becomes_electricity() {
        let mut state = ireland();
        let initial = state.clone();
        let fuels = state.key_products().fuels.all();
        ElectricVehicles::new(25.0).apply(&mut state).unwrap();

        assert!(is_close!(
            state.total_demand(&fuels),
            initial.total_demand(&fuels) * 0.75
        ));
        assert!(state.electricity_total() > initial.electricity_total());

        // The electricity mix is unchanged
        let coal = state.key_products().electricity[0];
        assert!(is_close!(
            state.demand_of(coal) / state.electricity_total(),
            initial.demand_of(coal) / initial.electricity_total()
        ));
    }

    #[test]
    fn zero_scaler_is_identity() {
        let mut state = ireland();
        let before = state.demand().clone();
        ElectricVehicles::new(0.0).apply(&mut state).unwrap();
        assert_eq!(state.demand(), &before);
    }

    #[test]
    fn no_prior_electricity() {
        let mut state = ireland();
        let electricity = state.key_products().electricity.clone();
        for product in electricity.iter() {
            state.set_demand(*product, 0.0);
        }
        ElectricVehicles::new(100.0).apply(&mut state).unwrap();

        let first = state.demand_of(electricity[0]);
        assert!(first > 0.0);
        assert!(electricity
            .iter()
            .all(|p| is_close!(state.demand_of(*p), first)));
    }
}
