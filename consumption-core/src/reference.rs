//! Immutable reference tables
//!
//! The reference data store holds every lookup table a scenario needs: demand vectors,
//! emission intensities, use-phase and tail-pipe factors, projections and prices.
//! Loading the underlying CSV files is left to the caller; the store is deserialisable
//! (JSON, TOML or a Python dict) and is validated against the product catalog when it
//! is built so that malformed tables are rejected at the boundary.

use crate::country::Country;
use crate::errors::{ConsumptionError, ConsumptionResult};
use crate::product::{ElectricityTechnology, KeyProducts, ProductCatalog};
use crate::sector::SectorMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Urban density of the region, selecting which demand vector is used
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AreaType {
    /// Mixed regions, or when unsure
    #[default]
    Average,
    City,
    Rural,
    Town,
}

impl FromStr for AreaType {
    type Err = ConsumptionError;

    fn from_str(s: &str) -> ConsumptionResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "average" => Ok(AreaType::Average),
            "city" => Ok(AreaType::City),
            "rural" => Ok(AreaType::Rural),
            "town" => Ok(AreaType::Town),
            _ => Err(ConsumptionError::UnknownAreaType(s.to_string())),
        }
    }
}

impl TryFrom<String> for AreaType {
    type Error = ConsumptionError;

    fn try_from(value: String) -> ConsumptionResult<Self> {
        value.parse()
    }
}

impl From<AreaType> for String {
    fn from(value: AreaType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AreaType::Average => "average",
            AreaType::City => "city",
            AreaType::Rural => "rural",
            AreaType::Town => "town",
        };
        write!(f, "{}", label)
    }
}

/// One value per [`AreaType`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaTables<T> {
    pub average: T,
    pub city: T,
    pub rural: T,
    pub town: T,
}

impl<T> AreaTables<T> {
    pub fn get(&self, area_type: AreaType) -> &T {
        match area_type {
            AreaType::Average => &self.average,
            AreaType::City => &self.city,
            AreaType::Rural => &self.rural,
            AreaType::Town => &self.town,
        }
    }

    fn iter(&self) -> impl Iterator<Item = (AreaType, &T)> {
        [
            (AreaType::Average, &self.average),
            (AreaType::City, &self.city),
            (AreaType::Rural, &self.rural),
            (AreaType::Town, &self.town),
        ]
        .into_iter()
    }
}

/// Projection periods. Each multiplier applies to every year in the period.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Decade {
    #[serde(rename = "2020-2030")]
    Y2020To2030,
    #[serde(rename = "2030-2040")]
    Y2030To2040,
    #[serde(rename = "2040-2050")]
    Y2040To2050,
}

impl Decade {
    /// The period a simulated year belongs to
    ///
    /// Periods are closed at the end: 2030 belongs to 2020-2030.
    /// 2020 itself is the reference year of the tables and belongs to none.
    pub fn for_year(year: i32) -> Option<Decade> {
        match year {
            2021..=2030 => Some(Decade::Y2020To2030),
            2031..=2040 => Some(Decade::Y2030To2040),
            2041..=2050 => Some(Decade::Y2040To2050),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Decade::Y2020To2030 => "2020-2030",
            Decade::Y2030To2040 => "2030-2040",
            Decade::Y2040To2050 => "2040-2050",
        }
    }
}

/// Annual multipliers for each projection period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecadeValues {
    #[serde(rename = "2020-2030")]
    pub y2020_2030: f64,
    #[serde(rename = "2030-2040")]
    pub y2030_2040: f64,
    #[serde(rename = "2040-2050")]
    pub y2040_2050: f64,
}

impl DecadeValues {
    pub fn constant(value: f64) -> Self {
        Self {
            y2020_2030: value,
            y2030_2040: value,
            y2040_2050: value,
        }
    }

    pub fn get(&self, decade: Decade) -> f64 {
        match decade {
            Decade::Y2020To2030 => self.y2020_2030,
            Decade::Y2030To2040 => self.y2030_2040,
            Decade::Y2040To2050 => self.y2040_2050,
        }
    }

    fn all_positive(&self) -> bool {
        [self.y2020_2030, self.y2030_2040, self.y2040_2050]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

/// Direct (production) and indirect (supply chain) emission intensity rows
/// unit: kg CO2e / currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensityRows {
    pub direct: Vec<f64>,
    pub indirect: Vec<f64>,
}

/// Life-cycle intensity of a single electricity technology
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityPair {
    pub direct: f64,
    pub indirect: f64,
}

/// Shares of household electricity used for water heating, space heating and cooling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustableAmounts {
    pub elec_water: f64,
    pub elec_heat: f64,
    pub elec_cool: f64,
}

impl AdjustableAmounts {
    /// Share of electricity attributable to heating, cooling and hot water
    pub fn heating_share(&self) -> f64 {
        self.elec_water + self.elec_heat + self.elec_cool
    }
}

/// Transport fuel prices at basic prices
/// unit: currency / litre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelPrices {
    pub diesel: f64,
    pub petrol: f64,
}

/// Mean household expenditure by income quintile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomeScaling {
    /// First quintile is the richest
    pub quintiles: [f64; 5],
    pub total: f64,
}

impl IncomeScaling {
    /// Spend of a quintile (1-5) relative to the average household
    pub fn ratio(&self, quintile: usize) -> f64 {
        self.quintiles[quintile - 1] / self.total
    }
}

/// All country-specific tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryTables {
    /// Household demand vectors for 2020
    /// unit: currency / yr (electricity products: kWh / yr)
    pub demand: AreaTables<Vec<f64>>,
    /// Default number of people per household
    pub household_size: AreaTables<f64>,
    pub intensities: IntensityRows,
    /// Life-cycle intensities available for local electricity generation
    #[serde(default)]
    pub lca_intensities: BTreeMap<ElectricityTechnology, IntensityPair>,
    /// Emissions from burning household fuels. Missing entries are zero.
    pub use_phase: Vec<Option<f64>>,
    /// Emissions from burning transport fuels. Missing entries are zero.
    pub tail_pipe: Vec<Option<f64>>,
    pub income_projection: DecadeValues,
    pub household_size_projection: DecadeValues,
    pub adjustable_amounts: AdjustableAmounts,
    /// unit: currency / kWh
    pub electricity_price: f64,
    pub fuel_prices: FuelPrices,
    pub income_scaling: IncomeScaling,
}

impl CountryTables {
    fn validate(&self, country: Country, n_products: usize) -> ConsumptionResult<()> {
        let check_len = |name: String, actual: usize| {
            if actual != n_products {
                Err(ConsumptionError::ShapeMismatch {
                    name,
                    expected: n_products,
                    actual,
                })
            } else {
                Ok(())
            }
        };

        for (area_type, demand) in self.demand.iter() {
            check_len(format!("{} {} demand", country, area_type), demand.len())?;
            if demand.iter().any(|d| !(d.is_finite() && *d >= 0.0)) {
                return Err(ConsumptionError::Error(format!(
                    "{} {} demand must be non-negative",
                    country, area_type
                )));
            }
        }
        check_len(
            format!("{} direct intensities", country),
            self.intensities.direct.len(),
        )?;
        check_len(
            format!("{} indirect intensities", country),
            self.intensities.indirect.len(),
        )?;
        check_len(format!("{} use phase", country), self.use_phase.len())?;
        check_len(format!("{} tail pipe", country), self.tail_pipe.len())?;

        for (area_type, size) in self.household_size.iter() {
            if !(size.is_finite() && *size > 0.0) {
                return Err(ConsumptionError::Error(format!(
                    "{} default {} household size must be positive, got {}",
                    country, area_type, size
                )));
            }
        }
        if !self.income_projection.all_positive() || !self.household_size_projection.all_positive()
        {
            return Err(ConsumptionError::Error(format!(
                "{} projection multipliers must be positive",
                country
            )));
        }
        let prices = [
            self.electricity_price,
            self.fuel_prices.diesel,
            self.fuel_prices.petrol,
            self.income_scaling.total,
        ];
        if self
            .income_scaling
            .quintiles
            .iter()
            .any(|q| !(q.is_finite() && *q >= 0.0))
        {
            return Err(ConsumptionError::Error(format!(
                "{} income quintiles must be non-negative",
                country
            )));
        }
        if prices.iter().any(|p| !(p.is_finite() && *p > 0.0)) {
            return Err(ConsumptionError::Error(format!(
                "{} prices and expenditure totals must be positive",
                country
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawReferenceData {
    products: ProductCatalog,
    sector_map: SectorMap,
    countries: BTreeMap<Country, CountryTables>,
}

/// The reference data store
///
/// Shared read-only between every scenario built from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawReferenceData", into = "RawReferenceData")]
pub struct ReferenceData {
    products: ProductCatalog,
    key_products: KeyProducts,
    sector_map: SectorMap,
    countries: BTreeMap<Country, CountryTables>,
}

impl ReferenceData {
    pub fn new(
        products: ProductCatalog,
        sector_map: SectorMap,
        countries: BTreeMap<Country, CountryTables>,
    ) -> ConsumptionResult<Self> {
        let key_products = KeyProducts::resolve(&products)?;
        if sector_map.n_products() != products.len() {
            return Err(ConsumptionError::ShapeMismatch {
                name: "sector map rows".to_string(),
                expected: products.len(),
                actual: sector_map.n_products(),
            });
        }
        for (country, tables) in countries.iter() {
            tables.validate(*country, products.len())?;
        }

        Ok(Self {
            products,
            key_products,
            sector_map,
            countries,
        })
    }

    pub fn products(&self) -> &ProductCatalog {
        &self.products
    }

    pub fn key_products(&self) -> &KeyProducts {
        &self.key_products
    }

    pub fn sector_map(&self) -> &SectorMap {
        &self.sector_map
    }

    pub fn country(&self, country: Country) -> ConsumptionResult<&CountryTables> {
        self.countries
            .get(&country)
            .ok_or_else(|| ConsumptionError::CountryNotAvailable(country.to_string()))
    }

    /// Countries that have reference tables
    pub fn countries(&self) -> impl Iterator<Item = Country> + '_ {
        self.countries.keys().copied()
    }
}

impl TryFrom<RawReferenceData> for ReferenceData {
    type Error = ConsumptionError;

    fn try_from(value: RawReferenceData) -> ConsumptionResult<Self> {
        ReferenceData::new(value.products, value.sector_map, value.countries)
    }
}

impl From<ReferenceData> for RawReferenceData {
    fn from(value: ReferenceData) -> Self {
        RawReferenceData {
            products: value.products,
            sector_map: value.sector_map,
            countries: value.countries,
        }
    }
}
