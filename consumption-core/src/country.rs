//! Supported countries and their European groupings.
//!
//! Reference tables are keyed by [`Country`]. Names coming from users or data files
//! are parsed once at the boundary so that an unknown country is rejected before
//! any arithmetic happens.

use crate::errors::{ConsumptionError, ConsumptionResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// European grouping used for the embodied emissions of new buildings
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EuropeanRegion {
    Northern,
    Western,
    Eastern,
}

impl EuropeanRegion {
    /// Construction emissions per square metre of new residential floor area
    /// unit: kg CO2e / m^2
    pub fn construction_factor(&self) -> f64 {
        match self {
            EuropeanRegion::Northern => 350.0,
            EuropeanRegion::Western => 520.0,
            EuropeanRegion::Eastern => 580.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Country {
    Denmark,
    Finland,
    Sweden,
    Norway,
    Iceland,
    Austria,
    Belgium,
    Germany,
    Spain,
    France,
    Ireland,
    Italy,
    Luxembourg,
    Malta,
    Netherlands,
    Portugal,
    UnitedKingdom,
    Switzerland,
    Liechtenstein,
    Bulgaria,
    Cyprus,
    Czechia,
    Estonia,
    Greece,
    Hungary,
    Croatia,
    Lithuania,
    Latvia,
    Poland,
    Romania,
    Slovenia,
    Slovakia,
}

// (country, name, code, region)
static COUNTRIES: [(Country, &str, &str, EuropeanRegion); 32] = [
    (Country::Denmark, "Denmark", "DK", EuropeanRegion::Northern),
    (Country::Finland, "Finland", "FI", EuropeanRegion::Northern),
    (Country::Sweden, "Sweden", "SE", EuropeanRegion::Northern),
    (Country::Norway, "Norway", "NO", EuropeanRegion::Northern),
    (Country::Iceland, "Iceland", "IS", EuropeanRegion::Northern),
    (Country::Austria, "Austria", "AT", EuropeanRegion::Western),
    (Country::Belgium, "Belgium", "BE", EuropeanRegion::Western),
    (Country::Germany, "Germany", "DE", EuropeanRegion::Western),
    (Country::Spain, "Spain", "ES", EuropeanRegion::Western),
    (Country::France, "France", "FR", EuropeanRegion::Western),
    (Country::Ireland, "Ireland", "IE", EuropeanRegion::Western),
    (Country::Italy, "Italy", "IT", EuropeanRegion::Western),
    (Country::Luxembourg, "Luxembourg", "LU", EuropeanRegion::Western),
    (Country::Malta, "Malta", "MT", EuropeanRegion::Western),
    (Country::Netherlands, "Netherlands", "NL", EuropeanRegion::Western),
    (Country::Portugal, "Portugal", "PT", EuropeanRegion::Western),
    (Country::UnitedKingdom, "United Kingdom", "GB", EuropeanRegion::Western),
    (Country::Switzerland, "Switzerland", "CH", EuropeanRegion::Western),
    (Country::Liechtenstein, "Liechtenstein", "LI", EuropeanRegion::Western),
    (Country::Bulgaria, "Bulgaria", "BG", EuropeanRegion::Eastern),
    (Country::Cyprus, "Cyprus", "CY", EuropeanRegion::Eastern),
    (Country::Czechia, "Czechia", "CZ", EuropeanRegion::Eastern),
    (Country::Estonia, "Estonia", "EE", EuropeanRegion::Eastern),
    (Country::Greece, "Greece", "GR", EuropeanRegion::Eastern),
    (Country::Hungary, "Hungary", "HU", EuropeanRegion::Eastern),
    (Country::Croatia, "Croatia", "HR", EuropeanRegion::Eastern),
    (Country::Lithuania, "Lithuania", "LT", EuropeanRegion::Eastern),
    (Country::Latvia, "Latvia", "LV", EuropeanRegion::Eastern),
    (Country::Poland, "Poland", "PL", EuropeanRegion::Eastern),
    (Country::Romania, "Romania", "RO", EuropeanRegion::Eastern),
    (Country::Slovenia, "Slovenia", "SI", EuropeanRegion::Eastern),
    (Country::Slovakia, "Slovakia", "SK", EuropeanRegion::Eastern),
];

impl Country {
    fn entry(&self) -> &'static (Country, &'static str, &'static str, EuropeanRegion) {
        // The table covers every variant, in declaration order
        &COUNTRIES[*self as usize]
    }

    /// All supported countries
    pub fn all() -> impl Iterator<Item = Country> {
        COUNTRIES.iter().map(|(country, ..)| *country)
    }

    /// English name as used in the reference tables
    pub fn name(&self) -> &'static str {
        self.entry().1
    }

    /// Two letter country code
    pub fn code(&self) -> &'static str {
        self.entry().2
    }

    pub fn region(&self) -> EuropeanRegion {
        self.entry().3
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Country {
    type Err = ConsumptionError;

    /// Parse either the English name ("Ireland") or the two letter code ("IE")
    fn from_str(s: &str) -> ConsumptionResult<Self> {
        let s = s.trim();
        COUNTRIES
            .iter()
            .find(|(_, name, code, _)| name.eq_ignore_ascii_case(s) || *code == s)
            .map(|(country, ..)| *country)
            .ok_or_else(|| ConsumptionError::UnknownCountry(s.to_string()))
    }
}

impl TryFrom<String> for Country {
    type Error = ConsumptionError;

    fn try_from(value: String) -> ConsumptionResult<Self> {
        value.parse()
    }
}

impl From<Country> for String {
    fn from(value: Country) -> Self {
        value.name().to_string()
    }
}
