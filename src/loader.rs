use crate::error::{LoadError, Result};
use crate::geography::{Coord, Geography, Geometry, Ring};
use crate::table::Table;
use csv::ReaderBuilder;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, warn};

/// Property keys tried, in order, for the municipality name of a feature.
pub const NAME_PROPERTIES: &[&str] = &[
    "MUNICIPIO",
    "municipio",
    "NOMBRE",
    "nombre",
    "TOPONIMIA",
    "NAME",
    "name",
    "shapeName",
];

/// One CSV row with every cell optional; blank fields deserialize to `None`.
type RawRow = Vec<Option<String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub parse_errors: usize,
    pub coerced_dates: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoLoadReport {
    pub total_features: usize,
    pub skipped_features: usize,
    pub merged_features: usize,
}

#[derive(Debug, Deserialize)]
struct RawCollection {
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Load the death records CSV into a [`Table`].
///
/// Rows the reader cannot decode are skipped and counted; unparseable death
/// dates are coerced to missing and counted. Fails when the file cannot be
/// read or yields no rows.
pub fn load_records(path: impl AsRef<Path>) -> Result<(Table, LoadReport)> {
    let path = path.as_ref();
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(open(path)?);
    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut rows: Vec<RawRow> = Vec::new();
    for result in rdr.deserialize::<RawRow>() {
        total_rows += 1;
        match result {
            Ok(r) => rows.push(r),
            Err(e) => {
                debug!(row = total_rows, error = %e, "skipping undecodable row");
                parse_errors += 1;
            }
        }
    }

    if rows.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let table = Table::from_rows(headers, rows);
    let report = LoadReport {
        total_rows,
        parse_errors,
        coerced_dates: table.coerced_dates(),
    };
    info!(
        path = %path.display(),
        rows = table.len(),
        parse_errors,
        coerced_dates = report.coerced_dates,
        "records loaded"
    );
    if report.coerced_dates > 0 {
        warn!(count = report.coerced_dates, "unparseable death dates coerced to missing");
    }
    Ok((table, report))
}

/// Load a GeoJSON feature collection of municipal boundaries.
///
/// Features without a name property or without a polygon geometry are
/// skipped and counted. Fails only when the file is unreadable, not a feature
/// collection, or has no usable feature at all.
pub fn load_geography(path: impl AsRef<Path>) -> Result<(Geography, GeoLoadReport)> {
    let path = path.as_ref();
    let raw: RawCollection =
        serde_json::from_reader(open(path)?).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let total_features = raw.features.len();
    let mut skipped_features = 0usize;
    let mut merged_features = 0usize;
    let mut geography = Geography::default();

    for (idx, feature) in raw.features.into_iter().enumerate() {
        let name = feature.properties.as_ref().and_then(feature_name);
        let geometry = feature.geometry.and_then(parse_geometry);
        match (name, geometry) {
            (Some(name), Some(geometry)) => {
                if geography.insert(&name, geometry) {
                    debug!(feature = idx, name = %name, "merged into existing municipality");
                    merged_features += 1;
                }
            }
            _ => {
                debug!(feature = idx, "skipping malformed feature");
                skipped_features += 1;
            }
        }
    }

    if total_features == 0 {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    if geography.is_empty() {
        return Err(LoadError::AllFeaturesMalformed {
            path: path.to_path_buf(),
            skipped: skipped_features,
        });
    }

    info!(
        path = %path.display(),
        municipalities = geography.len(),
        skipped_features,
        "geography loaded"
    );
    Ok((
        geography,
        GeoLoadReport {
            total_features,
            skipped_features,
            merged_features,
        },
    ))
}

fn feature_name(props: &Map<String, Value>) -> Option<String> {
    NAME_PROPERTIES
        .iter()
        .filter_map(|key| props.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(str::to_string)
}

fn parse_ring(positions: Vec<Vec<f64>>) -> Option<Ring> {
    let ring: Ring = positions
        .into_iter()
        .map(|p| match p.as_slice() {
            [lon, lat, ..] => Some::<Coord>([*lon, *lat]),
            _ => None,
        })
        .collect::<Option<_>>()?;
    (!ring.is_empty()).then_some(ring)
}

/// Keep the outer ring of each polygon part; holes are dropped.
fn parse_geometry(value: Value) -> Option<Geometry> {
    let polygons = match serde_json::from_value::<RawGeometry>(value).ok()? {
        RawGeometry::Polygon { coordinates } => vec![coordinates],
        RawGeometry::MultiPolygon { coordinates } => coordinates,
    };
    let parts = polygons
        .into_iter()
        .map(|rings| rings.into_iter().next().and_then(parse_ring))
        .collect::<Option<Vec<_>>>()?;
    (!parts.is_empty()).then_some(Geometry { parts })
}

/// Records and boundaries loaded once at startup.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub table: Table,
    pub geography: Geography,
    pub load_report: LoadReport,
    pub geo_report: GeoLoadReport,
}

impl Dataset {
    pub fn load(records: impl AsRef<Path>, geography: impl AsRef<Path>) -> Result<Dataset> {
        let (table, load_report) = load_records(records)?;
        let (geography, geo_report) = load_geography(geography)?;
        Ok(Dataset {
            table,
            geography,
            load_report,
            geo_report,
        })
    }
}
