//! Household retrofits that cut the energy needed for heating.

use consumption_core::errors::ConsumptionResult;
use consumption_core::policy::{percentage, PolicyLever, PolicyStage};
use consumption_core::scenario::ScenarioState;
use log::debug;
use serde::{Deserialize, Serialize};

/// Efficiency retrofit
///
/// Reduces spend on liquid, solid and gaseous heating fuels and on district heating by
/// `scaler` percent. Only the heating, cooling and hot water share of electricity is
/// reduced; electricity used by appliances is unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfficiencyRetrofit {
    /// Reduction in heating energy
    /// unit: %
    pub scaler: f64,
}

impl EfficiencyRetrofit {
    pub fn new(scaler: f64) -> Self {
        Self { scaler }
    }
}

#[typetag::serde]
impl PolicyLever for EfficiencyRetrofit {
    fn stage(&self) -> PolicyStage {
        PolicyStage::Efficiency
    }

    fn validate(&self) -> ConsumptionResult<()> {
        percentage("efficiency scaler", self.scaler).map(|_| ())
    }

    fn apply(&self, state: &mut ScenarioState) -> ConsumptionResult<()> {
        let scaler = percentage("efficiency scaler", self.scaler)?;
        let key = state.key_products().clone();
        let heating_share = state.country_tables().adjustable_amounts.heating_share();
        debug!(
            "Retrofits reduce heating energy by {:.1}% in {}",
            self.scaler,
            state.region()
        );

        for product in key.combustible_heating() {
            state.scale_demand(product, 1.0 - scaler);
        }
        state.scale_demand(key.district_heating, 1.0 - scaler);

        // appliances keep (1 - share), heating keeps share * (1 - scaler)
        for product in key.electricity.iter() {
            state.scale_demand(*product, 1.0 - heating_share * scaler);
        }
        Ok(())
    }
}
