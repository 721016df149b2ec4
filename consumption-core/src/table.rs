//! Year-indexed result tables.

use crate::product::ProductIndex;
use crate::sector::Sector;
use ndarray::{s, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Column label of the grand total
pub const TOTAL_EMISSIONS: &str = "Total_Emissions";

/// Column index of the grand total
pub const TOTAL_COLUMN: usize = Sector::COUNT;

/// Emissions per year by sector plus a grand total
///
/// Rows cover every simulated year; the columns are [`Sector::ALL`] followed by
/// [`TOTAL_EMISSIONS`].
/// unit: kg CO2e / yr
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionsTable {
    first_year: i32,
    values: Array2<f64>,
}

impl EmissionsTable {
    pub(crate) fn new(years: RangeInclusive<i32>) -> Self {
        let n_years = (years.end() - years.start() + 1).max(0) as usize;
        Self {
            first_year: *years.start(),
            values: Array2::zeros((n_years, Sector::COUNT + 1)),
        }
    }

    fn row_index(&self, year: i32) -> Option<usize> {
        let idx = year.checked_sub(self.first_year)?;
        if idx >= 0 && (idx as usize) < self.values.nrows() {
            Some(idx as usize)
        } else {
            None
        }
    }

    /// Record the sector totals of a year. The grand total is their sum.
    pub(crate) fn set_row(&mut self, year: i32, sectors: &[f64; Sector::COUNT]) {
        if let Some(idx) = self.row_index(year) {
            let mut row = self.values.row_mut(idx);
            for (sector, value) in sectors.iter().enumerate() {
                row[sector] = *value;
            }
            row[TOTAL_COLUMN] = sectors.iter().sum();
        }
    }

    /// Add emissions that are not attributed to any sector to a year's grand total
    pub(crate) fn add_to_total(&mut self, year: i32, value: f64) {
        if let Some(idx) = self.row_index(year) {
            self.values[[idx, TOTAL_COLUMN]] += value;
        }
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.first_year..=(self.first_year + self.values.nrows() as i32 - 1)
    }

    /// Raw values, shape (years, sectors + 1)
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn column_labels() -> Vec<&'static str> {
        Sector::ALL
            .iter()
            .map(|s| s.label())
            .chain(std::iter::once(TOTAL_EMISSIONS))
            .collect()
    }

    pub fn row(&self, year: i32) -> Option<ArrayView1<f64>> {
        self.row_index(year).map(|idx| self.values.row(idx))
    }

    pub fn sector(&self, year: i32, sector: Sector) -> Option<f64> {
        self.row_index(year)
            .map(|idx| self.values[[idx, sector.index()]])
    }

    pub fn total(&self, year: i32) -> Option<f64> {
        self.row_index(year).map(|idx| self.values[[idx, TOTAL_COLUMN]])
    }

    /// Sum of the sector columns, excluding anything only added to the grand total
    pub fn sector_sum(&self, year: i32) -> Option<f64> {
        self.row_index(year)
            .map(|idx| self.values.slice(s![idx, ..TOTAL_COLUMN]).sum())
    }

    /// Running sum of the grand total over the simulated years
    pub fn cumulative_totals(&self) -> Vec<(i32, f64)> {
        self.years()
            .zip(self.values.column(TOTAL_COLUMN).iter())
            .scan(0.0, |acc, (year, value)| {
                *acc += value;
                Some((year, *acc))
            })
            .collect()
    }
}

/// Emissions per year for every product
/// unit: kg CO2e / yr
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductEmissionsTable {
    first_year: i32,
    values: Array2<f64>,
}

impl ProductEmissionsTable {
    pub(crate) fn new(years: RangeInclusive<i32>, n_products: usize) -> Self {
        let n_years = (years.end() - years.start() + 1).max(0) as usize;
        Self {
            first_year: *years.start(),
            values: Array2::zeros((n_years, n_products)),
        }
    }

    fn row_index(&self, year: i32) -> Option<usize> {
        let idx = year.checked_sub(self.first_year)?;
        if idx >= 0 && (idx as usize) < self.values.nrows() {
            Some(idx as usize)
        } else {
            None
        }
    }

    pub(crate) fn set_row(&mut self, year: i32, emissions: ArrayView1<f64>) {
        if let Some(idx) = self.row_index(year) {
            self.values.row_mut(idx).assign(&emissions);
        }
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn row(&self, year: i32) -> Option<ArrayView1<f64>> {
        self.row_index(year).map(|idx| self.values.row(idx))
    }

    pub fn product(&self, year: i32, product: ProductIndex) -> Option<f64> {
        self.row_index(year)
            .and_then(|idx| self.values.get((idx, product.get())).copied())
    }
}
