//! Blending biofuels into transport fuel.

use consumption_core::errors::{ConsumptionError, ConsumptionResult};
use consumption_core::policy::{percentage, PolicyLever, PolicyStage};
use consumption_core::scenario::ScenarioState;
use log::debug;
use serde::{Deserialize, Serialize};

/// Biofuel substitution
///
/// Sets the biofuel share of transport fuel spend to `scaler` percent. The split between
/// the diesel family (biodiesel, diesel) and the petrol family (petrol, biogasoline) is
/// kept, as is the total spend on transport fuel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiofuelSubstitution {
    /// Target biofuel share of fuel spend
    /// unit: %
    pub scaler: f64,
}

impl BiofuelSubstitution {
    pub fn new(scaler: f64) -> Self {
        Self { scaler }
    }
}

#[typetag::serde]
impl PolicyLever for BiofuelSubstitution {
    fn stage(&self) -> PolicyStage {
        PolicyStage::Biofuel
    }

    fn validate(&self) -> ConsumptionResult<()> {
        percentage("biofuel scaler", self.scaler).map(|_| ())
    }

    fn apply(&self, state: &mut ScenarioState) -> ConsumptionResult<()> {
        let scaler = percentage("biofuel scaler", self.scaler)?;
        let fuels = state.key_products().fuels.clone();

        let total = state.total_demand(&fuels.all());
        if total <= 0.0 {
            debug!("No transport fuel bought in {}", state.region());
            return Ok(());
        }
        let diesel_share = state.total_demand(&[fuels.biodiesel, fuels.diesel]) / total;
        let petrol_share = state.total_demand(&[fuels.gasoline, fuels.biogasoline]) / total;

        let biodiesel = scaler * total * diesel_share;
        let biogasoline = scaler * total * petrol_share;
        let bio_total = biodiesel + biogasoline;
        if bio_total > total {
            return Err(ConsumptionError::BiofuelShareExceedsTotal {
                biofuel: bio_total,
                total,
            });
        }
        debug!(
            "Biofuels make up {:.1}% of transport fuel in {}",
            self.scaler,
            state.region()
        );

        let remaining = total - bio_total;
        state.set_demand(fuels.biodiesel, biodiesel);
        state.set_demand(fuels.biogasoline, biogasoline);
        state.set_demand(fuels.diesel, remaining * diesel_share);
        state.set_demand(fuels.gasoline, remaining * petrol_share);
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
    fn total_fuel_is_conserved() {
        for scaler in [0.0, 10.0, 55.0, 100.0] {
            let mut state = ireland();
            let fuels = state.key_products().fuels.all();
            let before = state.total_demand(&fuels);
            BiofuelSubstitution::new(scaler).apply(&mut state).unwrap();
            assert!(is_close!(state.total_demand(&fuels), before));
        }
    }

    #[test]
    fn target_share_is_reached() {
        let mut state = ireland();
        let fuels = state.key_products().fuels.clone();
        let total = state.total_demand(&fuels.all());
        let diesel_family = state.total_demand(&[fuels.biodiesel, fuels.diesel]);
        BiofuelSubstitution::new(20.0).apply(&mut state).unwrap();

        let bio = state.total_demand(&[fuels.biodiesel, fuels.biogasoline]);
        assert!(is_close!(bio / total, 0.2));
        assert!(is_close!(
            state.total_demand(&[fuels.biodiesel, fuels.diesel]),
            diesel_family
        ));
        assert!(is_close!(
            state.demand_of(fuels.biodiesel),
            0.2 * diesel_family
        ));
    }

    #[test]
    fn no_fuel_is_a_no_op() {
        let mut state = ireland();
        let fuels = state.key_products().fuels.all();
        for product in fuels {
            state.set_demand(product, 0.0);
        }
        let before = state.demand().clone();
        BiofuelSubstitution::new(50.0).apply(&mut state).unwrap();
        assert_eq!(state.demand(), &before);
    }
}
