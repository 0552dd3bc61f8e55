//! Property tests for the aggregation, join and audit invariants.

use mortality_report::aggregate::{aggregate, Bucket};
use mortality_report::geography::{Geography, Geometry};
use mortality_report::geojoin::{join_geo, JoinOptions};
use mortality_report::quality::audit;
use mortality_report::table::{Table, CAUSE, DEATH_DATE, MUNICIPALITY};
use proptest::prelude::*;
use proptest::test_runner::Config;

const NAMES: &[&str] = &["Moca", "MOCA ", "Gaspar Hernández", "Santiago", "  ", ""];
const DATES: &[&str] = &["2024-01-15", "2024-02-01", "15/03/2024", "sin fecha", ""];

fn cell(options: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
    prop::sample::select(options).prop_map(|v| (!v.is_empty()).then(|| v.to_string()))
}

fn table_strategy() -> impl Strategy<Value = Table> {
    prop::collection::vec(
        (cell(DATES), cell(NAMES), cell(&["I21", "J18", ""])),
        0..40,
    )
    .prop_map(|rows| {
        let headers = vec![
            DEATH_DATE.to_string(),
            MUNICIPALITY.to_string(),
            CAUSE.to_string(),
        ];
        let rows = rows.into_iter().map(|(d, m, c)| vec![d, m, c]).collect();
        Table::from_rows(headers, rows)
    })
}

fn geography() -> Geography {
    let mut geo = Geography::default();
    for name in ["Moca", "Gaspar Hernandez", "Jamao al Norte"] {
        geo.insert(
            name,
            Geometry {
                parts: vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
            },
        );
    }
    geo
}

proptest! {
    #![proptest_config(Config::with_cases(128))]
    #[test]
    fn counts_plus_unclassified_equal_rows(table in table_strategy()) {
        for column in [DEATH_DATE, MUNICIPALITY, CAUSE] {
            let agg = aggregate(&table, column, None).unwrap();
            prop_assert_eq!(agg.classified() + agg.unclassified, table.len());
            prop_assert!(agg.groups.iter().all(|g| g.count <= table.len() && g.count > 0));
        }
        let monthly = aggregate(&table, DEATH_DATE, Some(Bucket::Month)).unwrap();
        prop_assert_eq!(monthly.classified() + monthly.unclassified, table.len());
    }

    #[test]
    fn top_n_keeps_every_row(table in table_strategy(), n in 0usize..4) {
        let mut agg = aggregate(&table, MUNICIPALITY, None).unwrap();
        let groups = agg.groups.len();
        agg.truncate(n);
        prop_assert!(agg.groups.len() <= n);
        prop_assert_eq!(agg.groups.len() + agg.omitted_groups, groups);
        prop_assert_eq!(agg.classified() + agg.unclassified, table.len());
    }

    #[test]
    fn aggregate_is_pure(table in table_strategy()) {
        prop_assert_eq!(
            aggregate(&table, MUNICIPALITY, None).unwrap(),
            aggregate(&table, MUNICIPALITY, None).unwrap()
        );
    }

    #[test]
    fn rank_order_is_count_then_key(table in table_strategy()) {
        let agg = aggregate(&table, MUNICIPALITY, None).unwrap();
        for pair in agg.groups.windows(2) {
            prop_assert!(
                pair[0].count > pair[1].count
                    || (pair[0].count == pair[1].count && pair[0].key < pair[1].key)
            );
        }
    }

    #[test]
    fn join_only_emits_known_names(table in table_strategy(), zero_fill in any::<bool>()) {
        let geo = geography();
        let agg = aggregate(&table, MUNICIPALITY, None).unwrap();
        let join = join_geo(&agg, &geo, JoinOptions { zero_fill, ..JoinOptions::default() });
        for row in &join.joined {
            prop_assert!(geo.get(row.name).is_some());
        }
        for name in &join.unmatched {
            prop_assert!(geo.get(name).is_none());
        }
        let joined_total: usize = join.joined.iter().map(|j| j.count).sum();
        let unmatched_total: usize = agg
            .groups
            .iter()
            .filter(|g| join.unmatched.contains(&g.key))
            .map(|g| g.count)
            .sum();
        prop_assert_eq!(joined_total + unmatched_total, agg.classified());
    }

    #[test]
    fn audit_is_sorted_and_nonzero(table in table_strategy()) {
        let report = audit(&table);
        prop_assert!(report.iter().all(|m| m.missing > 0 && m.missing <= table.len()));
        for pair in report.windows(2) {
            prop_assert!(
                pair[0].missing > pair[1].missing
                    || (pair[0].missing == pair[1].missing && pair[0].column < pair[1].column)
            );
        }
    }
}

#[test]
fn empty_table_yields_empty_results() {
    let table = Table::from_rows(vec![MUNICIPALITY.to_string()], Vec::new());
    assert!(audit(&table).is_empty());
    let agg = aggregate(&table, MUNICIPALITY, None).unwrap();
    assert!(agg.groups.is_empty());
    assert_eq!(agg.unclassified, 0);
}
