//! Small, self-consistent reference data set used in tests and documentation.
//!
//! The catalog holds every product the policy levers refer to plus a handful of other
//! consumption categories, so that all eight sectors receive emissions. Ireland, Finland
//! and Estonia have tables (one country per European region); the values are synthetic
//! but of a realistic magnitude.

use crate::country::Country;
use crate::product::{
    ElectricityTechnology, ProductCatalog, BIODIESEL, BIOGASOLINE, DISTRICT_HEATING,
    ELECTRICITY_TYPES, GAS_DIESEL_OIL, GAS_FUELS, LIQUID_FUELS, MOTOR_GASOLINE, MOTOR_VEHICLES,
    PUBLIC_TRANSPORT, SOLID_FUELS, VEHICLE_SALE_AND_REPAIR,
};
use crate::reference::{
    AdjustableAmounts, AreaTables, CountryTables, DecadeValues, FuelPrices, IncomeScaling,
    IntensityPair, IntensityRows, ReferenceData,
};
use crate::scenario::ScenarioConfig;
use crate::sector::{Sector, SectorMap};
use std::collections::BTreeMap;
use std::sync::Arc;

struct ProductRow {
    label: &'static str,
    sector: Sector,
    demand: f64,
    direct: f64,
    indirect: f64,
    use_phase: Option<f64>,
    tail_pipe: Option<f64>,
}

fn row(
    label: &'static str,
    sector: Sector,
    demand: f64,
    direct: f64,
    indirect: f64,
) -> ProductRow {
    ProductRow {
        label,
        sector,
        demand,
        direct,
        indirect,
        use_phase: None,
        tail_pipe: None,
    }
}

fn burnt(mut product: ProductRow, use_phase: f64) -> ProductRow {
    product.use_phase = Some(use_phase);
    product
}

fn exhaust(mut product: ProductRow, tail_pipe: f64) -> ProductRow {
    product.tail_pipe = Some(tail_pipe);
    product
}

// Electricity demand is in kWh, everything else in currency
fn products() -> Vec<ProductRow> {
    use Sector::*;

    let electricity = [
        (400.0, 0.90, 0.10),
        (900.0, 0.40, 0.05),
        (0.0, 0.0, 0.012),
        (100.0, 0.0, 0.010),
        (600.0, 0.0, 0.012),
        (20.0, 0.70, 0.10),
        (80.0, 0.05, 0.05),
        (50.0, 0.0, 0.05),
        (0.0, 0.0, 0.03),
        (0.0, 0.0, 0.02),
        (0.0, 0.01, 0.04),
        (0.0, 0.30, 0.05),
    ];
    let mut rows: Vec<ProductRow> = ELECTRICITY_TYPES
        .iter()
        .zip(electricity)
        .map(|(label, (demand, direct, indirect))| {
            row(*label, HouseholdEnergy, demand, direct, indirect)
        })
        .collect();

    rows.extend([
        burnt(row(LIQUID_FUELS[0], HouseholdEnergy, 0.0, 0.10, 0.20), 2.1),
        burnt(row(LIQUID_FUELS[1], HouseholdEnergy, 450.0, 0.10, 0.25), 2.6),
        burnt(row(LIQUID_FUELS[2], HouseholdEnergy, 30.0, 0.12, 0.30), 3.1),
        row(LIQUID_FUELS[3], HouseholdEnergy, 0.0, 0.05, 0.20),
        row(SOLID_FUELS[0], HouseholdEnergy, 60.0, 0.05, 0.30),
        burnt(row(SOLID_FUELS[1], HouseholdEnergy, 10.0, 0.20, 0.40), 3.8),
        burnt(row(GAS_FUELS[0], HouseholdEnergy, 250.0, 0.08, 0.20), 2.2),
        row(GAS_FUELS[1], HouseholdEnergy, 0.0, 0.02, 0.15),
        row(DISTRICT_HEATING, HouseholdEnergy, 20.0, 0.60, 0.20),
        row(BIODIESEL, TransportFuels, 40.0, 0.05, 0.25),
        exhaust(row(GAS_DIESEL_OIL, TransportFuels, 700.0, 0.10, 0.30), 2.4),
        exhaust(row(MOTOR_GASOLINE, TransportFuels, 500.0, 0.10, 0.30), 2.0),
        row(BIOGASOLINE, TransportFuels, 15.0, 0.05, 0.25),
        row(MOTOR_VEHICLES, TransportOther, 900.0, 0.02, 0.35),
        row(VEHICLE_SALE_AND_REPAIR, TransportOther, 300.0, 0.01, 0.15),
        row(PUBLIC_TRANSPORT[0], TransportOther, 120.0, 0.15, 0.20),
        row(PUBLIC_TRANSPORT[1], TransportOther, 80.0, 0.25, 0.20),
        row(PUBLIC_TRANSPORT[2], TransportOther, 10.0, 0.60, 0.25),
        row(PUBLIC_TRANSPORT[3], TransportOther, 5.0, 0.50, 0.25),
        row("Food products nec", Food, 3200.0, 0.02, 0.45),
        row("Air transport services", AirTransport, 400.0, 0.90, 0.30),
        row("Hotel and restaurant services", Services, 1500.0, 0.02, 0.25),
        row("Textiles (17)", TangibleGoods, 700.0, 0.01, 0.40),
        row("Real estate services (70)", Services, 2500.0, 0.005, 0.05),
        row(
            "Furniture; other manufactured goods n.e.c. (36)",
            HouseholdOther,
            600.0,
            0.01,
            0.30,
        ),
    ]);
    rows
}

fn catalog(rows: &[ProductRow]) -> ProductCatalog {
    ProductCatalog::new(rows.iter().map(|r| r.label.to_string()).collect())
        .expect("fixture labels are unique")
}

fn country_tables(
    rows: &[ProductRow],
    demand_scale: f64,
    household_size: f64,
    electricity_price: f64,
) -> CountryTables {
    let average: Vec<f64> = rows.iter().map(|r| r.demand * demand_scale).collect();
    let scaled = |factor: f64| average.iter().map(|v| v * factor).collect::<Vec<f64>>();

    CountryTables {
        demand: AreaTables {
            city: scaled(1.1),
            rural: scaled(0.9),
            town: scaled(1.0),
            average: average.clone(),
        },
        household_size: AreaTables {
            average: household_size,
            city: household_size - 0.2,
            rural: household_size + 0.3,
            town: household_size,
        },
        intensities: IntensityRows {
            direct: rows.iter().map(|r| r.direct).collect(),
            indirect: rows.iter().map(|r| r.indirect).collect(),
        },
        lca_intensities: BTreeMap::from([
            (
                ElectricityTechnology::SolarPhotovoltaic,
                IntensityPair {
                    direct: 0.0,
                    indirect: 0.05,
                },
            ),
            (
                ElectricityTechnology::BiomassAndWaste,
                IntensityPair {
                    direct: 0.02,
                    indirect: 0.08,
                },
            ),
            (
                ElectricityTechnology::Wind,
                IntensityPair {
                    direct: 0.0,
                    indirect: 0.012,
                },
            ),
            (
                ElectricityTechnology::Geothermal,
                IntensityPair {
                    direct: 0.01,
                    indirect: 0.04,
                },
            ),
        ]),
        use_phase: rows.iter().map(|r| r.use_phase).collect(),
        tail_pipe: rows.iter().map(|r| r.tail_pipe).collect(),
        income_projection: DecadeValues {
            y2020_2030: 1.02,
            y2030_2040: 1.015,
            y2040_2050: 1.01,
        },
        household_size_projection: DecadeValues {
            y2020_2030: 0.99,
            y2030_2040: 0.995,
            y2040_2050: 1.0,
        },
        adjustable_amounts: AdjustableAmounts {
            elec_water: 0.1,
            elec_heat: 0.2,
            elec_cool: 0.05,
        },
        electricity_price,
        fuel_prices: FuelPrices {
            diesel: 0.6,
            petrol: 0.65,
        },
        income_scaling: IncomeScaling {
            quintiles: [150.0, 120.0, 100.0, 80.0, 60.0],
            total: 100.0,
        },
    }
}

/// Reference data for Ireland, Finland and Estonia
pub fn reference_data() -> ReferenceData {
    let rows = products();
    let sectors: Vec<Sector> = rows.iter().map(|r| r.sector).collect();

    let countries = BTreeMap::from([
        (Country::Ireland, country_tables(&rows, 1.0, 2.7, 0.22)),
        (Country::Finland, country_tables(&rows, 1.15, 2.1, 0.18)),
        (Country::Estonia, country_tables(&rows, 0.6, 2.3, 0.16)),
    ]);

    ReferenceData::new(
        catalog(&rows),
        SectorMap::from_assignments(&sectors),
        countries,
    )
    .expect("fixture tables are consistent")
}

pub fn shared_reference() -> Arc<ReferenceData> {
    Arc::new(reference_data())
}

/// Replace every income and household size multiplier with 1
pub fn with_flat_projections(reference: ReferenceData) -> ReferenceData {
    let countries = reference
        .countries()
        .filter_map(|country| {
            let mut tables = reference.country(country).ok()?.clone();
            tables.income_projection = DecadeValues::constant(1.0);
            tables.household_size_projection = DecadeValues::constant(1.0);
            Some((country, tables))
        })
        .collect();

    ReferenceData::new(
        reference.products().clone(),
        reference.sector_map().clone(),
        countries,
    )
    .expect("fixture tables are consistent")
}

/// An average-income Irish region of 195,000 people in 2023
pub fn ireland_config() -> ScenarioConfig {
    ScenarioConfig::new(2023, Country::Ireland, 195000)
}
