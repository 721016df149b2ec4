//! Reporting sectors and the product to sector mapping.

use crate::errors::{ConsumptionError, ConsumptionResult};
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse groupings that per-product emissions are folded into for reporting
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sector {
    HouseholdEnergy,
    HouseholdOther,
    TransportFuels,
    TransportOther,
    AirTransport,
    Food,
    TangibleGoods,
    Services,
}

impl Sector {
    pub const COUNT: usize = 8;

    /// Sectors in column order
    pub const ALL: [Sector; Sector::COUNT] = [
        Sector::HouseholdEnergy,
        Sector::HouseholdOther,
        Sector::TransportFuels,
        Sector::TransportOther,
        Sector::AirTransport,
        Sector::Food,
        Sector::TangibleGoods,
        Sector::Services,
    ];

    /// Column index within an emissions table
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sector::HouseholdEnergy => "Household Energy",
            Sector::HouseholdOther => "Household Other",
            Sector::TransportFuels => "Transport Fuels",
            Sector::TransportOther => "Transport Other",
            Sector::AirTransport => "Air Transport",
            Sector::Food => "Food",
            Sector::TangibleGoods => "Tangible Goods",
            Sector::Services => "Services",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Static product x sector weight matrix
///
/// Row `i` holds the share of product `i` attributed to each of the [`Sector::ALL`] columns.
/// Most rows are one-hot, but fractional weights are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct SectorMap {
    weights: Array2<f64>,
}

impl SectorMap {
    pub fn new(weights: Array2<f64>) -> ConsumptionResult<Self> {
        if weights.ncols() != Sector::COUNT {
            return Err(ConsumptionError::ShapeMismatch {
                name: "sector map columns".to_string(),
                expected: Sector::COUNT,
                actual: weights.ncols(),
            });
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(ConsumptionError::Error(
                "sector map weights must be finite".to_string(),
            ));
        }
        Ok(Self { weights })
    }

    /// Build a one-hot map from the sector of each product
    pub fn from_assignments(assignments: &[Sector]) -> Self {
        let mut weights = Array2::zeros((assignments.len(), Sector::COUNT));
        for (product, sector) in assignments.iter().enumerate() {
            weights[[product, sector.index()]] = 1.0;
        }
        Self { weights }
    }

    pub fn n_products(&self) -> usize {
        self.weights.nrows()
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Fold a per-product emission row into sector totals
    pub fn aggregate(&self, product_emissions: ArrayView1<f64>) -> [f64; Sector::COUNT] {
        let folded = self.weights.t().dot(&product_emissions);
        let mut sectors = [0.0; Sector::COUNT];
        sectors
            .iter_mut()
            .zip(folded.iter())
            .for_each(|(out, value)| *out = *value);
        sectors
    }
}

impl TryFrom<Vec<Vec<f64>>> for SectorMap {
    type Error = ConsumptionError;

    fn try_from(rows: Vec<Vec<f64>>) -> ConsumptionResult<Self> {
        let n_products = rows.len();
        let mut flat = Vec::with_capacity(n_products * Sector::COUNT);
        for row in rows {
            if row.len() != Sector::COUNT {
                return Err(ConsumptionError::ShapeMismatch {
                    name: "sector map row".to_string(),
                    expected: Sector::COUNT,
                    actual: row.len(),
                });
            }
            flat.extend(row);
        }
        let weights = Array2::from_shape_vec((n_products, Sector::COUNT), flat)
            .map_err(|e| ConsumptionError::Error(e.to_string()))?;
        SectorMap::new(weights)
    }
}

impl From<SectorMap> for Vec<Vec<f64>> {
    fn from(value: SectorMap) -> Self {
        value.weights.outer_iter().map(|row| row.to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;
    use ndarray::array;

    #[test]
    fn column_order() {
        for (idx, sector) in Sector::ALL.iter().enumerate() {
            assert_eq!(sector.index(), idx);
        }
    }

    #[test]
    fn aggregate_one_hot() {
        let map = SectorMap::from_assignments(&[
            Sector::Food,
            Sector::Food,
            Sector::Services,
            Sector::HouseholdEnergy,
        ]);
        let sectors = map.aggregate(array![1.0, 2.0, 4.0, 8.0].view());

        assert!(is_close!(sectors[Sector::Food.index()], 3.0));
        assert!(is_close!(sectors[Sector::Services.index()], 4.0));
        assert!(is_close!(sectors[Sector::HouseholdEnergy.index()], 8.0));
        assert!(is_close!(sectors.iter().sum::<f64>(), 15.0));
    }

    #[test]
    fn aggregate_fractional_weights() {
        let map = SectorMap::try_from(vec![vec![0.5, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]]).unwrap();
        let sectors = map.aggregate(array![10.0].view());
        assert!(is_close!(sectors[0], 5.0));
        assert!(is_close!(sectors[1], 5.0));
    }

    #[test]
    fn rejects_wrong_width() {
        let err = SectorMap::try_from(vec![vec![1.0, 0.0]]).unwrap_err();
        assert!(matches!(err, ConsumptionError::ShapeMismatch { .. }));
    }
}
