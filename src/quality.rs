//! Missing-value audit.

use std::collections::HashMap;

use crate::error::AggregateError;
use crate::table::Table;

/// Label for rows whose grouping value is itself missing.
pub const NO_GROUP: &str = "(sin dato)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCount {
    pub column: String,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupQuality {
    pub group: String,
    pub rows: usize,
    pub missing_cells: usize,
    /// `missing_cells` over `rows * columns`.
    pub missing_share: f64,
}

/// Per-column missing counts, only columns with at least one gap, sorted by
/// descending count then ascending column name.
pub fn audit(table: &Table) -> Vec<MissingCount> {
    let mut missing = vec![0usize; table.headers().len()];
    for r in table.records() {
        for (idx, slot) in missing.iter_mut().enumerate() {
            if table.is_missing(r, idx) {
                *slot += 1;
            }
        }
    }

    let mut out: Vec<MissingCount> = table
        .headers()
        .iter()
        .zip(missing)
        .filter(|(_, n)| *n > 0)
        .map(|(column, missing)| MissingCount {
            column: column.clone(),
            missing,
        })
        .collect();
    out.sort_by(|a, b| b.missing.cmp(&a.missing).then_with(|| a.column.cmp(&b.column)));
    out
}

/// Missing cells per value of `column` (e.g. per certifying health center).
///
/// The grouping column itself is left out of the cell count. Ordered by
/// descending missing cells, ties by ascending group.
pub fn audit_by_group(table: &Table, column: &str) -> Result<Vec<GroupQuality>, AggregateError> {
    let group_idx = table
        .column_index(column)
        .ok_or_else(|| AggregateError::UnknownColumn {
            column: column.to_string(),
        })?;
    let audited_columns = table.headers().len() - 1;

    let mut acc: HashMap<&str, (usize, usize)> = HashMap::new();
    for r in table.records() {
        let group = r.cell(group_idx).unwrap_or(NO_GROUP);
        let missing = (0..table.headers().len())
            .filter(|idx| *idx != group_idx && table.is_missing(r, *idx))
            .count();
        let e = acc.entry(group).or_insert((0, 0));
        e.0 += 1;
        e.1 += missing;
    }

    let mut out: Vec<GroupQuality> = acc
        .into_iter()
        .map(|(group, (rows, missing_cells))| {
            let cells = rows * audited_columns;
            GroupQuality {
                group: group.to_string(),
                rows,
                missing_cells,
                missing_share: if cells == 0 {
                    0.0
                } else {
                    missing_cells as f64 / cells as f64
                },
            }
        })
        .collect();
    out.sort_by(|a, b| {
        b.missing_cells
            .cmp(&a.missing_cells)
            .then_with(|| a.group.cmp(&b.group))
    });
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{CAUSE, DEATH_DATE, HEALTH_CENTER, MUNICIPALITY};

    fn table(rows: &[[&str; 4]]) -> Table {
        let headers: Vec<String> = [DEATH_DATE, MUNICIPALITY, CAUSE, HEALTH_CENTER]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows: Vec<Vec<Option<String>>> = rows
            .iter()
            .map(|r| r.iter().map(|v| Some(v.to_string())).collect())
            .collect();
        Table::from_rows(headers, rows)
    }

    #[test]
    fn audit_sorts_and_filters() {
        let t = table(&[
            ["2024-01-01", "", "", "Hospital Toribio Bencosme"],
            ["fecha?", "Moca", "", "Hospital Toribio Bencosme"],
            ["", "", "I21", "Hospital Toribio Bencosme"],
        ]);
        let report = audit(&t);
        let rows: Vec<(&str, usize)> = report.iter().map(|m| (m.column.as_str(), m.missing)).collect();
        assert_eq!(
            rows,
            vec![(CAUSE, 2), (DEATH_DATE, 2), (MUNICIPALITY, 2)]
        );
        assert!(report.iter().all(|m| m.column != HEALTH_CENTER));
    }

    #[test]
    fn audit_empty_table() {
        let t = table(&[]);
        assert!(audit(&t).is_empty());
    }

    #[test]
    fn audit_by_group_counts_cells() {
        let t = table(&[
            ["2024-01-01", "Moca", "I21", "Hospital Toribio Bencosme"],
            ["", "", "I21", "Hospital Toribio Bencosme"],
            ["", "", "", ""],
            ["2024-05-01", "Moca", "J18", "Clínica Moca"],
        ]);
        let report = audit_by_group(&t, HEALTH_CENTER).unwrap();
        let rows: Vec<(&str, usize, usize)> = report
            .iter()
            .map(|g| (g.group.as_str(), g.rows, g.missing_cells))
            .collect();
        assert_eq!(
            rows,
            vec![
                (NO_GROUP, 1, 3),
                ("Hospital Toribio Bencosme", 2, 2),
                ("Clínica Moca", 1, 0),
            ]
        );
        assert!((report[1].missing_share - 2.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn audit_by_group_unknown_column() {
        let t = table(&[]);
        assert!(audit_by_group(&t, "NO_EXISTE").is_err());
    }
}
