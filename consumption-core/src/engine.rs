//! Year-by-year projection of household emissions.
//!
//! A [`Projection`] owns a private copy of a [`ScenarioState`] and advances it one year
//! at a time from the baseline year to [`LAST_YEAR`]. Each year it:
//!
//! 1. applies the policy levers, once, if this is the policy year of a policy run
//! 2. scales demand by the income multiplier of the year's decade
//! 3. scales intensities, use-phase and tail-pipe factors by the efficiency factor
//! 4. computes per-product emissions per person and folds them into sectors
//!
//! Both scalings are cumulative, so a year can only be computed after the previous one.

use crate::errors::{ConsumptionError, ConsumptionResult};
use crate::policy::{PolicyLever, PolicyRun};
use crate::product::ProductIndex;
use crate::reference::Decade;
use crate::scenario::{ScenarioState, LAST_YEAR};
use crate::table::{EmissionsTable, ProductEmissionsTable};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Whether the policy levers have been applied yet
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyPhase {
    PrePolicy,
    PostPolicy,
}

/// Emission tables produced by a single run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Emissions per person
    pub per_capita: EmissionsTable,
    /// Per-capita emissions scaled by the population of the region
    pub area: EmissionsTable,
    /// Per-capita emissions of every product
    pub products: ProductEmissionsTable,
}

#[derive(Debug, Clone)]
struct ActivePolicy {
    year: i32,
    population: u64,
    new_floor_area: f64,
    levers: Vec<Arc<dyn PolicyLever>>,
}

/// A single projection run
#[derive(Debug, Clone)]
pub struct Projection {
    state: ScenarioState,
    policy: Option<ActivePolicy>,
    phase: PolicyPhase,
    /// Next year to be simulated
    year: i32,
    population: u64,
    decade: Option<Decade>,
    per_capita: EmissionsTable,
    area: EmissionsTable,
    products: ProductEmissionsTable,
}

impl Projection {
    /// Prepare a run starting from a copy of `initial`
    ///
    /// Without a policy run the projection is a baseline.
    pub fn new(initial: &ScenarioState, policy: Option<&PolicyRun>) -> ConsumptionResult<Self> {
        let state = initial.clone();
        let base_year = state.base_year();
        let years = base_year..=LAST_YEAR;

        let policy = match policy {
            Some(run) => {
                run.validate()?;
                let year = run.policy_year.unwrap_or(base_year);
                if !years.contains(&year) {
                    return Err(ConsumptionError::InvalidPolicyYear {
                        policy_year: year,
                        base_year,
                        last: LAST_YEAR,
                    });
                }
                let levers = run.ordered_levers()?;
                if levers.is_empty() {
                    warn!("Policy run for {} has no levers enabled", state.region());
                }
                Some(ActivePolicy {
                    year,
                    population: run.population.unwrap_or(state.population()),
                    new_floor_area: run.new_floor_area,
                    levers,
                })
            }
            None => None,
        };

        let n_products = state.products().len();
        Ok(Self {
            population: state.population(),
            per_capita: EmissionsTable::new(years.clone()),
            area: EmissionsTable::new(years.clone()),
            products: ProductEmissionsTable::new(years, n_products),
            phase: PolicyPhase::PrePolicy,
            decade: None,
            year: base_year,
            policy,
            state,
        })
    }

    pub fn is_baseline(&self) -> bool {
        self.policy.is_none()
    }

    /// Year that the next call to [`Projection::step`] will simulate
    pub fn current_year(&self) -> i32 {
        self.year
    }

    pub fn phase(&self) -> PolicyPhase {
        self.phase
    }

    /// Population used for area emissions of the current year
    pub fn population(&self) -> u64 {
        self.population
    }

    pub fn state(&self) -> &ScenarioState {
        &self.state
    }

    /// Returns true if every year up to [`LAST_YEAR`] has been simulated
    pub fn finished(&self) -> bool {
        self.year > LAST_YEAR
    }

    fn apply_policy(&mut self) -> ConsumptionResult<()> {
        let policy = match &self.policy {
            Some(policy) if policy.year == self.year => policy,
            _ => return Ok(()),
        };

        self.population = policy.population;
        for lever in policy.levers.iter() {
            debug!("{}: applying {:?} in {}", self.state.region(), lever, self.year);
            lever.apply(&mut self.state)?;
        }
        self.state.check_demand()?;
        self.phase = PolicyPhase::PostPolicy;
        Ok(())
    }

    /// Simulate the current year and advance to the next one
    pub fn step(&mut self) -> ConsumptionResult<()> {
        assert!(!self.finished(), "projection already reached {}", LAST_YEAR);
        let year = self.year;

        if self.phase == PolicyPhase::PrePolicy {
            self.apply_policy()?;
        }

        let decade = Decade::for_year(year);
        if decade != self.decade {
            if let Some(decade) = decade {
                debug!("{}: entering decade {}", self.state.region(), decade.label());
            }
            self.decade = decade;
        }
        let (income_multiplier, household_multiplier, efficiency_factor) = match decade {
            Some(decade) => {
                let tables = self.state.country_tables();
                (
                    tables.income_projection.get(decade),
                    tables.household_size_projection.get(decade),
                    self.state.efficiency_factor(),
                )
            }
            // The reference tables describe 2020 itself
            None => (1.0, 1.0, 1.0),
        };

        self.state
            .apply_annual_scaling(income_multiplier, efficiency_factor);

        let emissions = self.state.product_emissions(household_multiplier);
        if let Some(idx) = emissions.iter().position(|v| !v.is_finite()) {
            return Err(ConsumptionError::NonFiniteResult {
                year,
                product: self.state.products().label(ProductIndex(idx)).to_string(),
            });
        }

        let sectors = self.state.reference().sector_map().aggregate(emissions.view());
        let population = self.population as f64;
        self.per_capita.set_row(year, &sectors);
        self.area.set_row(year, &sectors.map(|value| value * population));
        self.products.set_row(year, emissions.view());

        self.year += 1;
        Ok(())
    }

    /// Simulate every remaining year
    pub fn run(&mut self) -> ConsumptionResult<()> {
        while !self.finished() {
            self.step()?;
        }
        Ok(())
    }

    /// Run to completion and return the result tables
    ///
    /// Policy runs add the embodied emissions of new buildings to the grand total of the
    /// policy year.
    pub fn into_result(mut self) -> ConsumptionResult<ProjectionResult> {
        self.run()?;

        if let Some(policy) = &self.policy {
            let factor = self.state.country().region().construction_factor();
            let construction = factor * policy.new_floor_area;
            self.per_capita
                .add_to_total(policy.year, construction / policy.population as f64);
            self.area.add_to_total(policy.year, construction);
        }

        Ok(ProjectionResult {
            per_capita: self.per_capita,
            area: self.area,
            products: self.products,
        })
    }
}

impl ScenarioState {
    /// Project emissions from the baseline year to [`LAST_YEAR`]
    ///
    /// The state itself is left untouched: the run works on a private copy, so the same
    /// baseline can seed any number of policy runs.
    pub fn emission_calculation(
        &self,
        policy: Option<&PolicyRun>,
    ) -> ConsumptionResult<ProjectionResult> {
        info!(
            "Projecting {} ({}) from {} to {}{}",
            self.region(),
            self.country(),
            self.base_year(),
            LAST_YEAR,
            if policy.is_some() { " with policies" } else { "" }
        );
        let result = Projection::new(self, policy)?.into_result()?;
        info!("Finished projection for {}", self.region());
        Ok(result)
    }
}
