//! Static table of the dashboard reports.
//!
//! Each entry says which column a report groups by, how it is bucketed or
//! filtered, and how the presentation layer should draw it. Adding a report
//! means adding an entry here.

use crate::aggregate::Bucket;
use crate::error::UnknownReportError;
use crate::table::{
    RecordFilter, CAUSE, CERTIFIER, DEATH_DATE, HEALTH_CENTER, MUNICIPALITY, SEX,
    VIOLENCE_LOCATION,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Map,
    Table,
}

/// What a report computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSource {
    Count {
        column: &'static str,
        bucket: Option<Bucket>,
        filter: RecordFilter,
    },
    Map {
        column: &'static str,
    },
    /// Potential years of life lost before `limit`, per value of `column`.
    YearsLost {
        column: &'static str,
        limit: i32,
    },
    MissingValues,
    MissingByGroup {
        column: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisLabels {
    pub x: &'static str,
    pub y: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub source: ReportSource,
    pub chart: ChartKind,
    pub axis_labels: AxisLabels,
    /// Show only the first `n` groups.
    pub top: Option<usize>,
}

impl ReportSpec {
    pub fn dimension_column(&self) -> Option<&'static str> {
        match self.source {
            ReportSource::Count { column, .. }
            | ReportSource::Map { column }
            | ReportSource::YearsLost { column, .. }
            | ReportSource::MissingByGroup { column } => Some(column),
            ReportSource::MissingValues => None,
        }
    }

    pub fn bucket(&self) -> Option<Bucket> {
        match self.source {
            ReportSource::Count { bucket, .. } => bucket,
            _ => None,
        }
    }
}

const fn count(column: &'static str) -> ReportSource {
    ReportSource::Count {
        column,
        bucket: None,
        filter: RecordFilter::All,
    }
}

const DEATHS: &str = "Defunciones";

/// Reference age for potential years of life lost.
pub const YEARS_LOST_LIMIT: i32 = 70;

static REPORTS: &[ReportSpec] = &[
    ReportSpec {
        id: "overview",
        title: "Visión general: defunciones por sexo",
        source: count(SEX),
        chart: ChartKind::Bar,
        axis_labels: AxisLabels { x: "Sexo", y: DEATHS },
        top: None,
    },
    ReportSpec {
        id: "municipality",
        title: "Defunciones por municipio",
        source: count(MUNICIPALITY),
        chart: ChartKind::Bar,
        axis_labels: AxisLabels { x: "Municipio", y: DEATHS },
        top: None,
    },
    ReportSpec {
        id: "cause",
        title: "Principales causas de defunción (CIE-10)",
        source: count(CAUSE),
        chart: ChartKind::Bar,
        axis_labels: AxisLabels { x: "Causa", y: DEATHS },
        top: Some(20),
    },
    ReportSpec {
        id: "violence",
        title: "Lugar de ocurrencia de traumas",
        source: count(VIOLENCE_LOCATION),
        chart: ChartKind::Bar,
        axis_labels: AxisLabels { x: "Lugar", y: DEATHS },
        top: None,
    },
    ReportSpec {
        id: "monthly",
        title: "Tendencia mensual de defunciones",
        source: ReportSource::Count {
            column: DEATH_DATE,
            bucket: Some(Bucket::Month),
            filter: RecordFilter::All,
        },
        chart: ChartKind::Line,
        axis_labels: AxisLabels { x: "Mes", y: DEATHS },
        top: None,
    },
    ReportSpec {
        id: "health-center",
        title: "Centros de salud con más certificaciones",
        source: count(HEALTH_CENTER),
        chart: ChartKind::Bar,
        axis_labels: AxisLabels { x: "Centro de salud", y: "Certificaciones" },
        top: Some(15),
    },
    ReportSpec {
        id: "certification",
        title: "Tipo de certificación",
        source: count(CERTIFIER),
        chart: ChartKind::Bar,
        axis_labels: AxisLabels { x: "Certificante", y: DEATHS },
        top: None,
    },
    ReportSpec {
        id: "map",
        title: "Mapa de defunciones por municipio",
        source: ReportSource::Map { column: MUNICIPALITY },
        chart: ChartKind::Map,
        axis_labels: AxisLabels { x: "Municipio", y: DEATHS },
        top: None,
    },
    ReportSpec {
        id: "years-lost",
        title: "Comparativo municipal: años de vida potencialmente perdidos (AVPP)",
        source: ReportSource::YearsLost {
            column: MUNICIPALITY,
            limit: YEARS_LOST_LIMIT,
        },
        chart: ChartKind::Bar,
        axis_labels: AxisLabels { x: "Municipio", y: "AVPP" },
        top: None,
    },
    ReportSpec {
        id: "infant",
        title: "Muertes infantiles por causa",
        source: ReportSource::Count {
            column: CAUSE,
            bucket: None,
            filter: RecordFilter::Infant,
        },
        chart: ChartKind::Bar,
        axis_labels: AxisLabels { x: "Causa", y: DEATHS },
        top: Some(20),
    },
    ReportSpec {
        id: "fertile-age",
        title: "Mujeres en edad fértil fallecidas por municipio",
        source: ReportSource::Count {
            column: MUNICIPALITY,
            bucket: None,
            filter: RecordFilter::FertileAgeWomen,
        },
        chart: ChartKind::Bar,
        axis_labels: AxisLabels { x: "Municipio", y: DEATHS },
        top: None,
    },
    ReportSpec {
        id: "data-quality",
        title: "Calidad del dato: valores faltantes por columna",
        source: ReportSource::MissingValues,
        chart: ChartKind::Table,
        axis_labels: AxisLabels { x: "Columna", y: "Faltantes" },
        top: None,
    },
    ReportSpec {
        id: "quality-by-center",
        title: "Calidad del dato por centro de salud",
        source: ReportSource::MissingByGroup { column: HEALTH_CENTER },
        chart: ChartKind::Table,
        axis_labels: AxisLabels { x: "Centro de salud", y: "Celdas faltantes" },
        top: None,
    },
];

/// Every report, in tab order.
pub fn reports() -> &'static [ReportSpec] {
    REPORTS
}

pub fn get_report(id: &str) -> Result<&'static ReportSpec, UnknownReportError> {
    REPORTS
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| UnknownReportError { id: id.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<&str> = reports().iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), reports().len());
    }

    #[test]
    fn lookup() {
        let spec = get_report("monthly").unwrap();
        assert_eq!(spec.chart, ChartKind::Line);
        assert_eq!(spec.dimension_column(), Some(DEATH_DATE));
        assert_eq!(spec.bucket(), Some(Bucket::Month));

        let spec = get_report("data-quality").unwrap();
        assert_eq!(spec.dimension_column(), None);

        let spec = get_report("years-lost").unwrap();
        assert_eq!(spec.dimension_column(), Some(MUNICIPALITY));
        assert_eq!(spec.bucket(), None);
    }

    #[test]
    fn unknown_id() {
        assert_eq!(
            get_report("tab42"),
            Err(UnknownReportError { id: "tab42".into() })
        );
    }

    #[test]
    fn only_the_date_column_is_bucketed() {
        for spec in reports() {
            if spec.bucket().is_some() {
                assert_eq!(spec.dimension_column(), Some(DEATH_DATE), "{}", spec.id);
            }
        }
    }
}
