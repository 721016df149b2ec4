//! The product universe and the named product groups the policy levers act on.
//!
//! Products are identified by the labels used in the reference tables. A
//! [`ProductCatalog`] maps each label to a [`ProductIndex`] into the demand vector and
//! the intensity matrix. [`KeyProducts`] resolves every label the levers need once,
//! so a missing label is reported while the reference data is loaded instead of in
//! the middle of a projection.

use crate::errors::{ConsumptionError, ConsumptionResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Electricity that is not produced by any of the national generation mixes.
/// Local generation is accounted for here.
pub const ELECTRICITY_NEC: &str = "Electricity nec";

pub const ELECTRICITY_TYPES: [&str; 12] = [
    "Electricity by coal",
    "Electricity by gas",
    "Electricity by nuclear",
    "Electricity by hydro",
    "Electricity by wind",
    "Electricity by petroleum and other oil derivatives",
    "Electricity by biomass and waste",
    "Electricity by solar photovoltaic",
    "Electricity by solar thermal",
    "Electricity by tide, wave, ocean",
    "Electricity by Geothermal",
    ELECTRICITY_NEC,
];

pub const KEROSENE: &str = "Kerosene";
pub const LIQUID_FUELS: [&str; 4] = [
    "Natural Gas Liquids",
    KEROSENE,
    "Heavy Fuel Oil",
    "Other Liquid Biofuels",
];

pub const WOOD_PRODUCTS: &str = "Wood and products of wood and cork (except furniture); \
    articles of straw and plaiting materials (20)";
pub const SOLID_FUELS: [&str; 2] = [WOOD_PRODUCTS, "Coke Oven Coke"];

pub const DISTRIBUTION_GAS: &str = "Distribution services of gaseous fuels through mains";
pub const GAS_FUELS: [&str; 2] = [DISTRIBUTION_GAS, "Biogas"];

pub const DISTRICT_HEATING: &str = "Steam and hot water supply services";

pub const BIOGASOLINE: &str = "Biogasoline";
pub const BIODIESEL: &str = "Biodiesels";
pub const MOTOR_GASOLINE: &str = "Motor Gasoline";
pub const GAS_DIESEL_OIL: &str = "Gas/Diesel Oil";

pub const MOTOR_VEHICLES: &str = "Motor vehicles, trailers and semi-trailers (34)";
// "accessoiries" is spelled the way the reference tables spell it
pub const VEHICLE_SALE_AND_REPAIR: &str = "Sale, maintenance, repair of motor vehicles, \
    motor vehicles parts, motorcycles, motor cycles parts and accessoiries";

pub const PUBLIC_TRANSPORT: [&str; 4] = [
    "Railway transportation services",
    "Other land transportation services",
    "Sea and coastal water transportation services",
    "Inland water transportation services",
];

/// Position of a product within the catalog
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductIndex(pub usize);

impl ProductIndex {
    pub fn get(&self) -> usize {
        self.0
    }
}

/// Ordered set of product labels shared by every scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ProductCatalog {
    labels: Vec<String>,
    #[serde(skip)]
    lookup: HashMap<String, ProductIndex>,
}

impl ProductCatalog {
    /// Create a catalog
    ///
    /// Labels must be unique.
    pub fn new(labels: Vec<String>) -> ConsumptionResult<Self> {
        let mut lookup = HashMap::with_capacity(labels.len());
        for (idx, label) in labels.iter().enumerate() {
            if lookup.insert(label.clone(), ProductIndex(idx)).is_some() {
                return Err(ConsumptionError::Error(format!(
                    "product '{}' appears more than once in the catalog",
                    label
                )));
            }
        }
        Ok(Self { labels, lookup })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn index_of(&self, label: &str) -> ConsumptionResult<ProductIndex> {
        self.lookup
            .get(label)
            .copied()
            .ok_or_else(|| ConsumptionError::UnknownProduct(label.to_string()))
    }

    pub fn label(&self, index: ProductIndex) -> &str {
        &self.labels[index.0]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn resolve(&self, labels: &[&str]) -> ConsumptionResult<Vec<ProductIndex>> {
        labels.iter().map(|label| self.index_of(label)).collect()
    }
}

impl TryFrom<Vec<String>> for ProductCatalog {
    type Error = ConsumptionError;

    fn try_from(value: Vec<String>) -> ConsumptionResult<Self> {
        ProductCatalog::new(value)
    }
}

impl From<ProductCatalog> for Vec<String> {
    fn from(value: ProductCatalog) -> Self {
        value.labels
    }
}

/// Technologies available for local electricity generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElectricityTechnology {
    SolarPhotovoltaic,
    BiomassAndWaste,
    Wind,
    Geothermal,
}

impl ElectricityTechnology {
    /// Product label whose life-cycle intensity describes this technology
    pub fn product_label(&self) -> &'static str {
        match self {
            ElectricityTechnology::SolarPhotovoltaic => "Electricity by solar photovoltaic",
            ElectricityTechnology::BiomassAndWaste => "Electricity by biomass and waste",
            ElectricityTechnology::Wind => "Electricity by wind",
            ElectricityTechnology::Geothermal => "Electricity by Geothermal",
        }
    }
}

impl fmt::Display for ElectricityTechnology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.product_label())
    }
}

/// Transport fuels, split into the diesel and petrol families
#[derive(Debug, Clone, PartialEq)]
pub struct TransportFuels {
    pub biodiesel: ProductIndex,
    pub diesel: ProductIndex,
    pub gasoline: ProductIndex,
    pub biogasoline: ProductIndex,
}

impl TransportFuels {
    pub fn all(&self) -> [ProductIndex; 4] {
        [self.biodiesel, self.diesel, self.gasoline, self.biogasoline]
    }
}

/// Catalog positions of every product group referenced by the policy levers
#[derive(Debug, Clone, PartialEq)]
pub struct KeyProducts {
    pub electricity: Vec<ProductIndex>,
    pub electricity_nec: ProductIndex,
    pub liquids: Vec<ProductIndex>,
    pub solids: Vec<ProductIndex>,
    pub gases: Vec<ProductIndex>,
    pub district_heating: ProductIndex,
    pub fuels: TransportFuels,
    pub vehicles: Vec<ProductIndex>,
    pub public_transport: Vec<ProductIndex>,
    /// Receives the liquid heating share when no liquid fuel is currently bought
    pub kerosene: ProductIndex,
    /// Receives the solid heating share when no solid fuel is currently bought
    pub wood: ProductIndex,
    /// Receives the gas heating share when no gas is currently bought
    pub distribution_gas: ProductIndex,
}

impl KeyProducts {
    pub fn resolve(catalog: &ProductCatalog) -> ConsumptionResult<Self> {
        Ok(Self {
            electricity: catalog.resolve(&ELECTRICITY_TYPES)?,
            electricity_nec: catalog.index_of(ELECTRICITY_NEC)?,
            liquids: catalog.resolve(&LIQUID_FUELS)?,
            solids: catalog.resolve(&SOLID_FUELS)?,
            gases: catalog.resolve(&GAS_FUELS)?,
            district_heating: catalog.index_of(DISTRICT_HEATING)?,
            fuels: TransportFuels {
                biodiesel: catalog.index_of(BIODIESEL)?,
                diesel: catalog.index_of(GAS_DIESEL_OIL)?,
                gasoline: catalog.index_of(MOTOR_GASOLINE)?,
                biogasoline: catalog.index_of(BIOGASOLINE)?,
            },
            vehicles: catalog.resolve(&[MOTOR_VEHICLES, VEHICLE_SALE_AND_REPAIR])?,
            public_transport: catalog.resolve(&PUBLIC_TRANSPORT)?,
            kerosene: catalog.index_of(KEROSENE)?,
            wood: catalog.index_of(WOOD_PRODUCTS)?,
            distribution_gas: catalog.index_of(DISTRIBUTION_GAS)?,
        })
    }

    /// Household heating fuels bought directly: liquids, solids and gases
    pub fn combustible_heating(&self) -> impl Iterator<Item = ProductIndex> + '_ {
        self.liquids
            .iter()
            .chain(self.solids.iter())
            .chain(self.gases.iter())
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup() {
        let catalog =
            ProductCatalog::new(vec!["Food".to_string(), "Biogas".to_string()]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.index_of("Biogas").unwrap(), ProductIndex(1));
        assert_eq!(catalog.label(ProductIndex(0)), "Food");
        assert_eq!(
            catalog.index_of("Caviar"),
            Err(ConsumptionError::UnknownProduct("Caviar".to_string()))
        );
    }

    #[test]
    fn catalog_rejects_duplicates() {
        let result = ProductCatalog::new(vec!["Food".to_string(), "Food".to_string()]);
        assert!(result.is_err());
    }

    #[test]
    fn key_products_require_every_label() {
        let catalog = ProductCatalog::new(vec!["Food".to_string()]).unwrap();
        let err = KeyProducts::resolve(&catalog).unwrap_err();
        assert!(matches!(err, ConsumptionError::UnknownProduct(_)));
    }

    #[test]
    fn technologies_are_electricity_products() {
        for technology in [
            ElectricityTechnology::SolarPhotovoltaic,
            ElectricityTechnology::BiomassAndWaste,
            ElectricityTechnology::Wind,
            ElectricityTechnology::Geothermal,
        ] {
            assert!(ELECTRICITY_TYPES.contains(&technology.product_label()));
        }
    }
}
