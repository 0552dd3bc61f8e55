use crate::aggregate::{
    aggregate, aggregate_filtered, potential_years_lost, Aggregation, YearsLostTable,
};
use crate::error::ReportError;
use crate::geojoin::{join_geo, GeoJoin, JoinOptions};
use crate::loader::Dataset;
use crate::quality::{audit, audit_by_group, GroupQuality, MissingCount};
use crate::registry::{get_report, ReportSource, ReportSpec};
use crate::table::MUNICIPALITY;
use crate::types::{GroupQualityRow, MapRow, MissingRow, SeriesRow, SummaryStats, YearsLostRow};
use crate::util::format_percent;
use tracing::{debug, warn};

/// Data handed to the presentation layer for one report.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutput<'d> {
    /// Ordered `(label, count)` pairs for bar and line charts.
    Series(Aggregation),
    /// Ordered `(name, geometry, count)` rows for the map.
    Map(GeoJoin<'d>),
    /// Ordered `(label, deaths, years lost)` rows.
    YearsLost(YearsLostTable),
    Missing(Vec<MissingCount>),
    MissingByGroup(Vec<GroupQuality>),
}

impl ReportOutput<'_> {
    pub fn len(&self) -> usize {
        match self {
            ReportOutput::Series(agg) => agg.groups.len(),
            ReportOutput::Map(join) => join.joined.len(),
            ReportOutput::YearsLost(table) => table.groups.len(),
            ReportOutput::Missing(rows) => rows.len(),
            ReportOutput::MissingByGroup(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compute one registered report over the loaded dataset.
pub fn run_report<'d>(
    spec: &ReportSpec,
    dataset: &'d Dataset,
    options: JoinOptions,
) -> Result<ReportOutput<'d>, ReportError> {
    let table = &dataset.table;
    let output = match spec.source {
        ReportSource::Count {
            column,
            bucket,
            filter,
        } => {
            let mut agg = aggregate_filtered(table, column, bucket, filter)?;
            if let Some(n) = spec.top {
                agg.truncate(n);
                if agg.omitted > 0 {
                    debug!(
                        report = spec.id,
                        groups = agg.omitted_groups,
                        records = agg.omitted,
                        "groups beyond the top {} folded together",
                        n
                    );
                }
            }
            ReportOutput::Series(agg)
        }
        ReportSource::Map { column } => {
            let agg = aggregate(table, column, None)?;
            let join = join_geo(&agg, &dataset.geography, options);
            if !join.unmatched.is_empty() {
                warn!(
                    report = spec.id,
                    count = join.unmatched.len(),
                    names = ?join.unmatched,
                    "municipalities have no geometry"
                );
            }
            ReportOutput::Map(join)
        }
        ReportSource::YearsLost { column, limit } => {
            ReportOutput::YearsLost(potential_years_lost(table, column, limit)?)
        }
        ReportSource::MissingValues => ReportOutput::Missing(audit(table)),
        ReportSource::MissingByGroup { column } => {
            ReportOutput::MissingByGroup(audit_by_group(table, column)?)
        }
    };
    debug!(report = spec.id, rows = output.len(), "report computed");
    Ok(output)
}

pub fn run_report_by_id<'d>(
    id: &str,
    dataset: &'d Dataset,
    options: JoinOptions,
) -> Result<(&'static ReportSpec, ReportOutput<'d>), ReportError> {
    let spec = get_report(id)?;
    Ok((spec, run_report(spec, dataset, options)?))
}

/// Label of the row that stands for every group cut by a top-N limit.
pub const OTHERS_LABEL: &str = "Otros";

/// One row per listed group, then a trailing [`OTHERS_LABEL`] row when a
/// top-N limit cut some groups.
pub fn series_rows(agg: &Aggregation) -> Vec<SeriesRow> {
    let mut rows: Vec<SeriesRow> = agg
        .groups
        .iter()
        .map(|g| SeriesRow {
            label: g.key.clone(),
            count: g.count,
        })
        .collect();
    if agg.omitted > 0 {
        rows.push(SeriesRow {
            label: OTHERS_LABEL.to_string(),
            count: agg.omitted,
        });
    }
    rows
}

pub fn years_lost_rows(table: &YearsLostTable) -> Vec<YearsLostRow> {
    table
        .groups
        .iter()
        .map(|g| YearsLostRow {
            label: g.key.clone(),
            deaths: g.deaths,
            years_lost: g.years,
        })
        .collect()
}

pub fn map_rows(join: &GeoJoin<'_>) -> Vec<MapRow> {
    join.joined
        .iter()
        .map(|j| MapRow {
            municipality: j.name.to_string(),
            count: j.count,
            parts: j.geometry.parts.len(),
            vertices: j.geometry.vertex_count(),
        })
        .collect()
}

pub fn missing_rows(rows: &[MissingCount]) -> Vec<MissingRow> {
    rows.iter()
        .map(|m| MissingRow {
            column: m.column.clone(),
            missing: m.missing,
        })
        .collect()
}

pub fn group_quality_rows(rows: &[GroupQuality]) -> Vec<GroupQualityRow> {
    rows.iter()
        .map(|g| GroupQualityRow {
            group: g.group.clone(),
            rows: g.rows,
            missing_cells: g.missing_cells,
            missing_share: format_percent(g.missing_share),
        })
        .collect()
}

/// Headline indicators for the overview and `summary.json`.
pub fn generate_summary(dataset: &Dataset) -> Result<SummaryStats, ReportError> {
    let agg = aggregate(&dataset.table, MUNICIPALITY, None)?;
    let join = join_geo(&agg, &dataset.geography, JoinOptions::default());
    Ok(SummaryStats {
        total_records: dataset.table.len(),
        parse_errors: dataset.load_report.parse_errors,
        coerced_dates: dataset.table.coerced_dates(),
        unclassified_municipality: agg.unclassified,
        distinct_municipalities: agg.groups.len(),
        municipalities_with_boundary: join.matched_count(),
        unmatched_municipalities: join.unmatched,
        boundary_features: dataset.geo_report.total_features,
        skipped_features: dataset.geo_report.skipped_features,
    })
}
