//! Properties of the projection engine that hold for any scenario.
//!
//! - sector totals add up to the grand total every year
//! - a policy run without levers or new buildings reproduces the baseline
//! - policy runs branched from one baseline never observe each other

use approx::assert_relative_eq;
use consumption_core::country::Country;
use consumption_core::fixtures;
use consumption_core::reference::AreaType;
use consumption_core::runs::ScenarioRuns;
use consumption_core::scenario::{EfficiencyPreset, ScenarioConfig, ScenarioState};
use consumption_core::sector::Sector;
use consumption_core::table::EmissionsTable;
use consumption_core::PolicyRun;

fn assert_totals_are_sector_sums(table: &EmissionsTable) {
    for year in table.years() {
        let sectors: f64 = Sector::ALL
            .iter()
            .map(|s| table.sector(year, *s).unwrap())
            .sum();
        assert_relative_eq!(sectors, table.total(year).unwrap(), max_relative = 1e-12);
    }
}

mod aggregation {
    use super::*;

    #[test]
    fn test_totals_for_every_country_and_area_type() {
        let reference = fixtures::shared_reference();
        for country in [Country::Ireland, Country::Finland, Country::Estonia] {
            for area_type in [AreaType::Average, AreaType::City, AreaType::Rural, AreaType::Town] {
                let config = ScenarioConfig::new(2020, country, 10000).with_area_type(area_type);
                let state = ScenarioState::new(reference.clone(), &config).unwrap();
                let result = state.emission_calculation(None).unwrap();

                assert_eq!(result.per_capita.values().nrows(), 31);
                assert_totals_are_sector_sums(&result.per_capita);
                assert_totals_are_sector_sums(&result.area);
            }
        }
    }

    #[test]
    fn test_every_sector_receives_emissions() {
        let state =
            ScenarioState::new(fixtures::shared_reference(), &fixtures::ireland_config()).unwrap();
        let result = state.emission_calculation(None).unwrap();
        for sector in Sector::ALL {
            assert!(result.per_capita.sector(2023, sector).unwrap() > 0.0);
        }
    }

    #[test]
    fn test_product_table_matches_sectors() {
        let state =
            ScenarioState::new(fixtures::shared_reference(), &fixtures::ireland_config()).unwrap();
        let result = state.emission_calculation(None).unwrap();
        for year in [2023, 2035, 2050] {
            assert_relative_eq!(
                result.products.row(year).unwrap().sum(),
                result.per_capita.total(year).unwrap(),
                max_relative = 1e-12
            );
        }
    }
}

mod baseline {
    use super::*;

    #[test]
    fn test_ireland_2023_to_2050() {
        let state =
            ScenarioState::new(fixtures::shared_reference(), &fixtures::ireland_config()).unwrap();
        let result = state.emission_calculation(None).unwrap();

        let first = result.per_capita.total(2023).unwrap();
        let last = result.per_capita.total(2050).unwrap();
        assert!(first > 0.0);

        // Income growth is slower than the 3 % annual intensity decay in every decade
        assert!(last < first);
        // Household size multipliers are looked up per decade, not compounded
        let growth = 1.02_f64.powi(7) * 1.015_f64.powi(10) * 1.01_f64.powi(10);
        let households = 1.0 / 0.99;
        assert_relative_eq!(
            last,
            first * growth * 0.97_f64.powi(27) / households,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_faster_efficiency_lowers_2050() {
        let reference = fixtures::shared_reference();
        let total_2050 = |efficiency| {
            let config = fixtures::ireland_config().with_efficiency(efficiency);
            ScenarioState::new(reference.clone(), &config)
                .unwrap()
                .emission_calculation(None)
                .unwrap()
                .per_capita
                .total(2050)
                .unwrap()
        };
        let fast = total_2050(EfficiencyPreset::Fast);
        let normal = total_2050(EfficiencyPreset::Normal);
        let slow = total_2050(EfficiencyPreset::Slow);
        assert!(fast < normal && normal < slow);
    }

    #[test]
    fn test_empty_policy_run_equals_baseline() {
        let state =
            ScenarioState::new(fixtures::shared_reference(), &fixtures::ireland_config()).unwrap();
        let baseline = state.emission_calculation(None).unwrap();
        for year in [2023, 2030, 2050] {
            let policy = state
                .emission_calculation(Some(&PolicyRun::new(year)))
                .unwrap();
            assert_eq!(policy.per_capita, baseline.per_capita);
            assert_eq!(policy.area, baseline.area);
        }
    }
}

mod branching {
    use super::*;

    #[test]
    fn test_run_order_does_not_matter() {
        let state =
            ScenarioState::new(fixtures::shared_reference(), &fixtures::ireland_config()).unwrap();
        let a = PolicyRun::new(2025).with_new_floor_area(50000.0);
        let b = PolicyRun::new(2035).with_population(250000);

        let mut ab = ScenarioRuns::new(state.clone()).unwrap();
        ab.add_policy("a", &a).unwrap();
        ab.add_policy("b", &b).unwrap();

        let mut ba = ScenarioRuns::new(state).unwrap();
        ba.add_policy("b", &b).unwrap();
        ba.add_policy("a", &a).unwrap();

        assert_eq!(ab.get("a").unwrap(), ba.get("a").unwrap());
        assert_eq!(ab.get("b").unwrap(), ba.get("b").unwrap());
        assert_eq!(ab.baseline(), ba.baseline());
    }

    #[test]
    fn test_cumulative_difference() {
        let state =
            ScenarioState::new(fixtures::shared_reference(), &fixtures::ireland_config()).unwrap();
        let mut runs = ScenarioRuns::new(state).unwrap();
        runs.add_policy("growth", &PolicyRun::new(2040).with_population(390000))
            .unwrap();

        let baseline = runs.baseline().area.cumulative_totals();
        let policy = runs.get("growth").unwrap().area.cumulative_totals();
        let before = baseline.iter().position(|(year, _)| *year == 2039).unwrap();

        assert_eq!(policy[before], baseline[before]);
        // Doubling the population from 2040 doubles the area emissions from then on
        let added: f64 = (2040..=2050)
            .map(|year| runs.baseline().area.total(year).unwrap())
            .sum();
        assert_relative_eq!(
            policy.last().unwrap().1,
            baseline.last().unwrap().1 + added,
            max_relative = 1e-12
        );
    }
}
