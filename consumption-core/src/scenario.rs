//! Scenario construction and the mutable per-run state.
//!
//! A [`ScenarioState`] holds the demand vector, the emission intensity matrix, the
//! use-phase and tail-pipe overlays and the scalar household characteristics for a
//! single run. It is built once from a [`ScenarioConfig`] and the shared
//! [`ReferenceData`], then evolves in place as the projection advances.
//!
//! The state is cheap to branch: the reference data are shared behind an [`Arc`] and
//! everything that a run mutates is owned. Every projection clones the state it is
//! given, so policy runs derived from the same baseline never observe each other.

use crate::country::Country;
use crate::errors::{ConsumptionError, ConsumptionResult};
use crate::product::{KeyProducts, ProductCatalog, ProductIndex};
use crate::reference::{AreaType, CountryTables, ReferenceData};
use log::warn;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// First year covered by the reference tables
pub const FIRST_YEAR: i32 = 2020;
/// Last simulated year (inclusive)
pub const LAST_YEAR: i32 = 2050;

/// Row of the intensity matrix holding direct (production) intensities
pub const DIRECT: usize = 0;
/// Row of the intensity matrix holding indirect (supply chain) intensities
pub const INDIRECT: usize = 1;

/// Quintile used when no valid income choice is given
const DEFAULT_QUINTILE: usize = 3;

/// Expected global reduction in product emission intensities
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EfficiencyPreset {
    Fast,
    #[default]
    Normal,
    Slow,
}

impl EfficiencyPreset {
    /// Annual fractional reduction in intensities
    pub fn annual_reduction(&self) -> f64 {
        match self {
            EfficiencyPreset::Fast => 0.07,
            EfficiencyPreset::Normal => 0.03,
            EfficiencyPreset::Slow => 0.01,
        }
    }

    /// Multiplier applied to intensities each simulated year
    pub fn factor(&self) -> f64 {
        1.0 - self.annual_reduction()
    }
}

/// Parameters used to build the baseline state of a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Baseline year
    pub year: i32,
    pub country: Country,
    pub population: u64,
    /// Free-text name of the region. Defaults to the country name.
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub area_type: AreaType,
    /// People per household. Zero selects the country default for the area type.
    #[serde(default)]
    pub house_size: f64,
    /// Income quintile, 1 (richest) to 5. Anything else selects the average household.
    #[serde(default)]
    pub income_choice: u8,
    #[serde(default)]
    pub efficiency: EfficiencyPreset,
}

impl ScenarioConfig {
    pub fn new(year: i32, country: Country, population: u64) -> Self {
        Self {
            year,
            country,
            population,
            region: None,
            area_type: AreaType::default(),
            house_size: 0.0,
            income_choice: 0,
            efficiency: EfficiencyPreset::default(),
        }
    }

    pub fn with_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    pub fn with_area_type(mut self, area_type: AreaType) -> Self {
        self.area_type = area_type;
        self
    }

    pub fn with_house_size(mut self, house_size: f64) -> Self {
        self.house_size = house_size;
        self
    }

    pub fn with_income_choice(mut self, income_choice: u8) -> Self {
        self.income_choice = income_choice;
        self
    }

    pub fn with_efficiency(mut self, efficiency: EfficiencyPreset) -> Self {
        self.efficiency = efficiency;
        self
    }

    pub fn from_toml_str(content: &str) -> ConsumptionResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Income quintile (1-5) selected by `income_choice`
    pub fn income_quintile(&self) -> usize {
        match self.income_choice {
            1..=5 => self.income_choice as usize,
            0 => DEFAULT_QUINTILE,
            other => {
                warn!(
                    "Income choice {} is out of range, using quintile {}",
                    other, DEFAULT_QUINTILE
                );
                DEFAULT_QUINTILE
            }
        }
    }

    fn validate(&self) -> ConsumptionResult<()> {
        if !(FIRST_YEAR..=LAST_YEAR).contains(&self.year) {
            return Err(ConsumptionError::InvalidYear {
                year: self.year,
                first: FIRST_YEAR,
                last: LAST_YEAR,
            });
        }
        if self.population == 0 {
            return Err(ConsumptionError::InvalidPopulation(self.population));
        }
        if !(self.house_size.is_finite() && self.house_size >= 0.0) {
            return Err(ConsumptionError::InvalidHouseholdSize(self.house_size));
        }
        Ok(())
    }
}

/// Mutable state of a single projection run
#[derive(Debug, Clone)]
pub struct ScenarioState {
    reference: Arc<ReferenceData>,
    tables: Arc<CountryTables>,
    country: Country,
    region: String,
    area_type: AreaType,
    base_year: i32,
    population: u64,
    household_size: f64,
    efficiency_factor: f64,
    /// Spend per product
    /// unit: currency / yr (electricity products: kWh / yr)
    demand: Array1<f64>,
    /// Direct and indirect intensities, shape (2, n_products)
    intensities: Array2<f64>,
    use_phase: Array1<f64>,
    tail_pipe: Array1<f64>,
    /// Heating-related fuel spend when the scenario was built.
    /// Reporting only; levers read [`ScenarioState::heating_fuel_total`] when they fire.
    baseline_heating_total: f64,
}

impl ScenarioState {
    /// Build the baseline state for a region
    pub fn new(reference: Arc<ReferenceData>, config: &ScenarioConfig) -> ConsumptionResult<Self> {
        config.validate()?;
        let tables = Arc::new(reference.country(config.country)?.clone());

        let household_size = if config.house_size > 0.0 {
            config.house_size
        } else {
            *tables.household_size.get(config.area_type)
        };

        // Elasticity of spend with respect to income is taken as 1 for every product
        let elasticity = 1.0;
        let income_scaler = tables.income_scaling.ratio(config.income_quintile());
        let demand =
            Array1::from_vec(tables.demand.get(config.area_type).clone()) * (income_scaler * elasticity);

        let n_products = reference.products().len();
        let mut intensities = Array2::zeros((2, n_products));
        intensities
            .row_mut(DIRECT)
            .assign(&Array1::from_vec(tables.intensities.direct.clone()));
        intensities
            .row_mut(INDIRECT)
            .assign(&Array1::from_vec(tables.intensities.indirect.clone()));

        let use_phase = fill_missing(&tables.use_phase);
        let tail_pipe = fill_missing(&tables.tail_pipe);

        let mut state = Self {
            country: config.country,
            region: config
                .region
                .clone()
                .unwrap_or_else(|| config.country.to_string()),
            area_type: config.area_type,
            base_year: config.year,
            population: config.population,
            household_size,
            efficiency_factor: config.efficiency.factor(),
            demand,
            intensities,
            use_phase,
            tail_pipe,
            baseline_heating_total: 0.0,
            tables,
            reference,
        };
        state.baseline_heating_total = state.heating_fuel_total();

        Ok(state)
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn country(&self) -> Country {
        self.country
    }

    pub fn country_tables(&self) -> &CountryTables {
        &self.tables
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn area_type(&self) -> AreaType {
        self.area_type
    }

    pub fn base_year(&self) -> i32 {
        self.base_year
    }

    pub fn population(&self) -> u64 {
        self.population
    }

    pub fn household_size(&self) -> f64 {
        self.household_size
    }

    pub fn efficiency_factor(&self) -> f64 {
        self.efficiency_factor
    }

    pub fn products(&self) -> &ProductCatalog {
        self.reference.products()
    }

    pub fn key_products(&self) -> &KeyProducts {
        self.reference.key_products()
    }

    pub fn demand(&self) -> &Array1<f64> {
        &self.demand
    }

    pub fn demand_of(&self, product: ProductIndex) -> f64 {
        self.demand[product.get()]
    }

    pub fn set_demand(&mut self, product: ProductIndex, value: f64) {
        self.demand[product.get()] = value;
    }

    /// Multiply the demand for a product by `factor`
    pub fn scale_demand(&mut self, product: ProductIndex, factor: f64) {
        self.demand[product.get()] *= factor;
    }

    /// Combined demand for a group of products
    pub fn total_demand(&self, products: &[ProductIndex]) -> f64 {
        products.iter().map(|p| self.demand_of(*p)).sum()
    }

    pub fn intensities(&self) -> &Array2<f64> {
        &self.intensities
    }

    pub fn intensity(&self, row: usize, product: ProductIndex) -> f64 {
        self.intensities[[row, product.get()]]
    }

    pub fn set_intensity(&mut self, row: usize, product: ProductIndex, value: f64) {
        self.intensities[[row, product.get()]] = value;
    }

    pub fn use_phase(&self) -> &Array1<f64> {
        &self.use_phase
    }

    pub fn tail_pipe(&self) -> &Array1<f64> {
        &self.tail_pipe
    }

    /// Current electricity demand across every electricity product
    /// unit: kWh / yr
    pub fn electricity_total(&self) -> f64 {
        self.total_demand(&self.key_products().electricity)
    }

    /// Current spend on household heating
    ///
    /// Solid, liquid and gaseous fuels plus district heating, plus the share of electricity
    /// used for heating, cooling and hot water converted to currency.
    pub fn heating_fuel_total(&self) -> f64 {
        let key = self.key_products();
        let tables = self.country_tables();
        let combustible: f64 = key.combustible_heating().map(|p| self.demand_of(p)).sum();
        let electricity_heat = tables.adjustable_amounts.heating_share()
            * self.electricity_total()
            * tables.electricity_price;

        combustible + self.demand_of(key.district_heating) + electricity_heat
    }

    /// Heating-related spend when the scenario was built
    ///
    /// A construction-time snapshot kept for reporting. It is not updated by levers or
    /// annual scaling; use [`ScenarioState::heating_fuel_total`] for the current value.
    pub fn baseline_heating_total(&self) -> f64 {
        self.baseline_heating_total
    }

    /// Apply one year of income growth and efficiency improvement
    ///
    /// Both are cumulative: the already scaled vectors from the previous year are scaled again.
    pub fn apply_annual_scaling(&mut self, income_multiplier: f64, efficiency_factor: f64) {
        self.demand *= income_multiplier;
        self.intensities *= efficiency_factor;
        self.use_phase *= efficiency_factor;
        self.tail_pipe *= efficiency_factor;
    }

    /// Emissions per product for the current state
    ///
    /// Sums direct, indirect and use-phase emissions of each product and divides by the
    /// number of people in the household (`household_size * household_multiplier`).
    pub fn product_emissions(&self, household_multiplier: f64) -> Array1<f64> {
        // (2, n) intensities scaled column-wise by demand
        let production = &self.intensities * &self.demand.view().insert_axis(Axis(0));
        let use_phase = &self.demand * &(&self.tail_pipe + &self.use_phase);

        (production.sum_axis(Axis(0)) + use_phase) / (self.household_size * household_multiplier)
    }

    /// Fails if any product has negative or non-finite demand
    pub fn check_demand(&self) -> ConsumptionResult<()> {
        match self
            .demand
            .iter()
            .position(|value| !value.is_finite() || *value < 0.0)
        {
            Some(idx) => Err(ConsumptionError::NegativeDemand {
                product: self.products().label(ProductIndex(idx)).to_string(),
                value: self.demand[idx],
            }),
            None => Ok(()),
        }
    }
}

fn fill_missing(values: &[Option<f64>]) -> Array1<f64> {
    values
        .iter()
        .map(|v| match v {
            Some(x) if x.is_finite() => *x,
            _ => 0.0,
        })
        .collect()
}
