//! Changes to the mix of heating sources.

use crate::constants::PROPORTION_TOLERANCE;
use consumption_core::errors::{ConsumptionError, ConsumptionResult};
use consumption_core::policy::{percentage, PolicyLever, PolicyStage};
use consumption_core::product::ProductIndex;
use consumption_core::scenario::{ScenarioState, DIRECT};
use log::debug;
use serde::{Deserialize, Serialize};

/// Local heating mix
///
/// Reallocates the current heating spend between district heating, electricity and
/// combustible fuels, and the combustible share between liquid, solid and gaseous fuels.
///
/// Within each fuel family spend is split in proportion to current purchases. A family
/// with no current purchases receives its whole share in a single product: kerosene,
/// wood products or distribution gas. Electricity used by appliances is kept.
///
/// Both groups of proportions must add up to 100 %.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalHeating {
    /// unit: %
    pub district: f64,
    /// unit: %
    pub electricity: f64,
    /// unit: %
    pub combustible: f64,
    /// Share of combustible fuel spend on liquid fuels
    /// unit: %
    pub liquids: f64,
    /// unit: %
    pub solids: f64,
    /// unit: %
    pub gases: f64,
    /// Direct emission intensity of district heating
    /// unit: kg CO2e / currency
    pub district_direct_intensity: f64,
}

struct Fractions {
    district: f64,
    electricity: f64,
    combustible: f64,
    liquids: f64,
    solids: f64,
    gases: f64,
}

fn check_balanced(group: &str, values: [f64; 3]) -> ConsumptionResult<()> {
    let sum: f64 = values.iter().sum();
    if (sum - 100.0).abs() > PROPORTION_TOLERANCE {
        return Err(ConsumptionError::UnbalancedProportions {
            group: group.to_string(),
            sum,
        });
    }
    Ok(())
}

impl LocalHeating {
    fn fractions(&self) -> ConsumptionResult<Fractions> {
        let fractions = Fractions {
            district: percentage("district heating proportion", self.district)?,
            electricity: percentage("electric heating proportion", self.electricity)?,
            combustible: percentage("combustible fuel proportion", self.combustible)?,
            liquids: percentage("liquid fuel proportion", self.liquids)?,
            solids: percentage("solid fuel proportion", self.solids)?,
            gases: percentage("gas proportion", self.gases)?,
        };
        check_balanced(
            "heating sources",
            [self.district, self.electricity, self.combustible],
        )?;
        check_balanced("combustible fuels", [self.liquids, self.solids, self.gases])?;

        if !(self.district_direct_intensity.is_finite() && self.district_direct_intensity >= 0.0)
        {
            return Err(ConsumptionError::Error(format!(
                "District heating intensity must be non-negative, got {}",
                self.district_direct_intensity
            )));
        }
        Ok(fractions)
    }
}

/// Split `target` across a fuel family in proportion to current spend
fn redistribute(
    state: &mut ScenarioState,
    family: &[ProductIndex],
    fallback: ProductIndex,
    target: f64,
) {
    let subtotal = state.total_demand(family);
    if subtotal > 0.0 {
        for product in family {
            let share = state.demand_of(*product) / subtotal;
            state.set_demand(*product, share * target);
        }
    } else {
        state.set_demand(fallback, target);
    }
}

#[typetag::serde]
impl PolicyLever for LocalHeating {
    fn stage(&self) -> PolicyStage {
        PolicyStage::LocalHeating
    }

    fn validate(&self) -> ConsumptionResult<()> {
        self.fractions().map(|_| ())
    }

    fn apply(&self, state: &mut ScenarioState) -> ConsumptionResult<()> {
        let fractions = self.fractions()?;
        let key = state.key_products().clone();
        let tables = state.country_tables();
        let heating_share = tables.adjustable_amounts.heating_share();
        let electricity_price = tables.electricity_price;

        let total = state.heating_fuel_total();
        let electricity_total = state.electricity_total();
        if electricity_total <= 0.0 {
            return Err(ConsumptionError::EmptyTotal("electricity".to_string()));
        }
        debug!(
            "Heating mix in {}: {:.1}% district, {:.1}% electric, {:.1}% combustible of {:.2}",
            state.region(),
            self.district,
            self.electricity,
            self.combustible,
            total
        );

        state.set_demand(key.district_heating, total * fractions.district);

        // Electric heating spend converted back to kWh, split by the current mix
        let electric_heating = fractions.electricity * total / electricity_price;
        for product in key.electricity.iter() {
            let demand = state.demand_of(*product);
            let appliances = (1.0 - heating_share) * demand;
            state.set_demand(
                *product,
                demand / electricity_total * electric_heating + appliances,
            );
        }

        let combustible = fractions.combustible * total;
        redistribute(
            state,
            &key.liquids,
            key.kerosene,
            fractions.liquids * combustible,
        );
        redistribute(state, &key.solids, key.wood, fractions.solids * combustible);
        redistribute(
            state,
            &key.gases,
            key.distribution_gas,
            fractions.gases * combustible,
        );

        state.set_intensity(DIRECT, key.district_heating, self.district_direct_intensity);
        Ok(())
    }
}
