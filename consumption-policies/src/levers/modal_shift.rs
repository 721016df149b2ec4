//! Shift from private cars to public transport.

use consumption_core::errors::ConsumptionResult;
use consumption_core::policy::{percentage, PolicyLever, PolicyStage};
use consumption_core::scenario::ScenarioState;
use log::debug;
use serde::{Deserialize, Serialize};

/// Transport modal shift
///
/// Three independent changes: less fuel, fewer private vehicles and more public
/// transport. The public transport increase need not match the private decrease, since
/// part of the shift goes to walking and cycling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalShift {
    /// Reduction in transport fuel spend
    /// unit: %
    pub fuel_scaler: f64,
    /// Reduction in spend on buying and maintaining vehicles
    /// unit: %
    pub vehicle_scaler: f64,
    /// Increase in public transport spend
    /// unit: %
    pub public_transport_scaler: f64,
}

impl ModalShift {
    fn fractions(&self) -> ConsumptionResult<(f64, f64, f64)> {
        Ok((
            percentage("modal shift fuel scaler", self.fuel_scaler)?,
            percentage("modal shift vehicle scaler", self.vehicle_scaler)?,
            percentage(
                "modal shift public transport scaler",
                self.public_transport_scaler,
            )?,
        ))
    }
}

#[typetag::serde]
impl PolicyLever for ModalShift {
    fn stage(&self) -> PolicyStage {
        PolicyStage::ModalShift
    }

    fn validate(&self) -> ConsumptionResult<()> {
        self.fractions().map(|_| ())
    }

    fn apply(&self, state: &mut ScenarioState) -> ConsumptionResult<()> {
        let (fuel, vehicles, public_transport) = self.fractions()?;
        let key = state.key_products().clone();
        debug!("{:?} in {}", self, state.region());

        for product in key.fuels.all() {
            state.scale_demand(product, 1.0 - fuel);
        }
        for product in key.vehicles.iter() {
            state.scale_demand(*product, 1.0 - vehicles);
        }
        for product in key.public_transport.iter() {
            state.scale_demand(*product, 1.0 + public_transport);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consumption_core::fixtures;
    use is_close::is_close;

    #[test]
    fn independent_scalers() {
        let mut state =
            ScenarioState::new(fixtures::shared_reference(), &fixtures::ireland_config())
                .unwrap();
        let initial = state.clone();
        let key = state.key_products().clone();

        ModalShift {
            fuel_scaler: 10.0,
            vehicle_scaler: 20.0,
            public_transport_scaler: 50.0,
        }
        .apply(&mut state)
        .unwrap();

        assert!(is_close!(
            state.total_demand(&key.fuels.all()),
            initial.total_demand(&key.fuels.all()) * 0.9
        ));
        assert!(is_close!(
            state.total_demand(&key.vehicles),
            initial.total_demand(&key.vehicles) * 0.8
        ));
        assert!(is_close!(
            state.total_demand(&key.public_transport),
            initial.total_demand(&key.public_transport) * 1.5
        ));
        assert_eq!(
            state.electricity_total(),
            initial.electricity_total()
        );
    }

    #[test]
    fn deserialise() {
        let lever: Box<dyn PolicyLever> = serde_json::from_str(
            r#"{"type": "ModalShift", "fuel_scaler": 5, "vehicle_scaler": 5, "public_transport_scaler": 200}"#,
        )
        .unwrap();
        assert_eq!(lever.stage(), PolicyStage::ModalShift);
        assert!(lever.validate().is_err());
    }
}
