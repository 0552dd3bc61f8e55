use serde::Serialize;
use tabled::Tabled;

#[derive(Debug, Serialize, Tabled, Clone, PartialEq, Eq)]
pub struct SeriesRow {
    #[serde(rename = "Label")]
    #[tabled(rename = "Label")]
    pub label: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq, Eq)]
pub struct YearsLostRow {
    #[serde(rename = "Label")]
    #[tabled(rename = "Label")]
    pub label: String,
    #[serde(rename = "Deaths")]
    #[tabled(rename = "Deaths")]
    pub deaths: usize,
    #[serde(rename = "YearsLost")]
    #[tabled(rename = "YearsLost")]
    pub years_lost: u64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq, Eq)]
pub struct MapRow {
    #[serde(rename = "Municipality")]
    #[tabled(rename = "Municipality")]
    pub municipality: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Parts")]
    #[tabled(rename = "Parts")]
    pub parts: usize,
    #[serde(rename = "Vertices")]
    #[tabled(rename = "Vertices")]
    pub vertices: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq, Eq)]
pub struct MissingRow {
    #[serde(rename = "Column")]
    #[tabled(rename = "Column")]
    pub column: String,
    #[serde(rename = "Missing")]
    #[tabled(rename = "Missing")]
    pub missing: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq, Eq)]
pub struct GroupQualityRow {
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub group: String,
    #[serde(rename = "Rows")]
    #[tabled(rename = "Rows")]
    pub rows: usize,
    #[serde(rename = "MissingCells")]
    #[tabled(rename = "MissingCells")]
    pub missing_cells: usize,
    #[serde(rename = "MissingShare")]
    #[tabled(rename = "MissingShare")]
    pub missing_share: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SummaryStats {
    pub total_records: usize,
    pub parse_errors: usize,
    pub coerced_dates: usize,
    pub unclassified_municipality: usize,
    pub distinct_municipalities: usize,
    pub municipalities_with_boundary: usize,
    pub unmatched_municipalities: Vec<String>,
    pub boundary_features: usize,
    pub skipped_features: usize,
}
