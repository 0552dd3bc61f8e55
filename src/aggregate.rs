//! Grouping and counting over a single column.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;

use crate::error::AggregateError;
use crate::table::{RecordFilter, Table, DEATH_DATE};

/// Time granularity applied to the date column before grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Month,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
}

/// Ordered group counts plus the rows whose grouping value was missing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Aggregation {
    pub groups: Vec<GroupCount>,
    pub unclassified: usize,
    /// Rows that had a value but fell in groups cut by [`Aggregation::truncate`].
    pub omitted: usize,
    /// Number of groups cut by [`Aggregation::truncate`].
    pub omitted_groups: usize,
}

impl Aggregation {
    /// Rows with a value, whether still listed or cut by a top-N limit.
    pub fn classified(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum::<usize>() + self.omitted
    }

    /// Keep only the first `n` groups; the rest is folded into `omitted`.
    pub fn truncate(&mut self, n: usize) {
        if self.groups.len() <= n {
            return;
        }
        let cut = self.groups.split_off(n);
        self.omitted_groups += cut.len();
        self.omitted += cut.iter().map(|g| g.count).sum::<usize>();
    }
}

/// Potential years of life lost in one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearsLost {
    pub key: String,
    /// Deaths with both a group value and an age.
    pub deaths: usize,
    pub years: u64,
}

/// Years lost per group, ranked by years, plus the rows left out because the
/// group value or the age was missing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct YearsLostTable {
    pub groups: Vec<YearsLost>,
    pub unclassified: usize,
}

impl YearsLostTable {
    pub fn total_years(&self) -> u64 {
        self.groups.iter().map(|g| g.years).sum()
    }
}

pub fn aggregate(
    table: &Table,
    column: &str,
    bucket: Option<Bucket>,
) -> Result<Aggregation, AggregateError> {
    aggregate_filtered(table, column, bucket, RecordFilter::All)
}

/// Count rows per value of `column` among rows accepted by `filter`.
///
/// Without a bucket, groups are ranked by descending count with ties broken
/// by ascending key. With [`Bucket::Month`] the column must be the death date
/// and groups are `YYYY-MM` keys in chronological order.
pub fn aggregate_filtered(
    table: &Table,
    column: &str,
    bucket: Option<Bucket>,
    filter: RecordFilter,
) -> Result<Aggregation, AggregateError> {
    let idx = table
        .column_index(column)
        .ok_or_else(|| AggregateError::UnknownColumn {
            column: column.to_string(),
        })?;
    let rows = table.records().iter().filter(|r| filter.accepts(table, r));

    match bucket {
        None => {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            let mut unclassified = 0usize;
            for r in rows {
                match r.cell(idx) {
                    Some(key) => *counts.entry(key).or_default() += 1,
                    None => unclassified += 1,
                }
            }
            let mut groups: Vec<GroupCount> = counts
                .into_iter()
                .map(|(key, count)| GroupCount {
                    key: key.to_string(),
                    count,
                })
                .collect();
            groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
            Ok(Aggregation {
                groups,
                unclassified,
                ..Aggregation::default()
            })
        }
        Some(Bucket::Month) => {
            if column != DEATH_DATE {
                return Err(AggregateError::BucketOnNonDate {
                    column: column.to_string(),
                });
            }
            let mut counts: BTreeMap<(i32, u32), usize> = BTreeMap::new();
            let mut unclassified = 0usize;
            for r in rows {
                match r.death_date() {
                    Some(d) => *counts.entry((d.year(), d.month())).or_default() += 1,
                    None => unclassified += 1,
                }
            }
            let groups = counts
                .into_iter()
                .map(|((year, month), count)| GroupCount {
                    key: format!("{:04}-{:02}", year, month),
                    count,
                })
                .collect();
            Ok(Aggregation {
                groups,
                unclassified,
                ..Aggregation::default()
            })
        }
    }
}

/// Sum `limit - age` over deaths younger than `limit`, per value of `column`.
///
/// Deaths at or above the limit add no years but still count as deaths of
/// their group. Groups are ranked by descending years, then descending
/// deaths, then ascending key.
pub fn potential_years_lost(
    table: &Table,
    column: &str,
    limit: i32,
) -> Result<YearsLostTable, AggregateError> {
    let idx = table
        .column_index(column)
        .ok_or_else(|| AggregateError::UnknownColumn {
            column: column.to_string(),
        })?;

    let mut totals: HashMap<&str, (usize, u64)> = HashMap::new();
    let mut unclassified = 0usize;
    for r in table.records() {
        match (r.cell(idx), r.age_years()) {
            (Some(key), Some(age)) => {
                let entry = totals.entry(key).or_default();
                entry.0 += 1;
                entry.1 += u64::try_from(limit.saturating_sub(age)).unwrap_or(0);
            }
            _ => unclassified += 1,
        }
    }

    let mut groups: Vec<YearsLost> = totals
        .into_iter()
        .map(|(key, (deaths, years))| YearsLost {
            key: key.to_string(),
            deaths,
            years,
        })
        .collect();
    groups.sort_by(|a, b| {
        b.years
            .cmp(&a.years)
            .then_with(|| b.deaths.cmp(&a.deaths))
            .then_with(|| a.key.cmp(&b.key))
    });
    Ok(YearsLostTable {
        groups,
        unclassified,
    })
}
