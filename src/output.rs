use crate::error::OutputError;
use crate::registry::ReportSpec;
use crate::reports::{
    group_quality_rows, map_rows, missing_rows, series_rows, years_lost_rows, ReportOutput,
    OTHERS_LABEL,
};
use crate::util::format_int;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

/// Write `rows` with a header line. The header comes from the row type, so an
/// empty report still produces a header-only file.
pub fn write_csv<T: Serialize + Tabled>(path: &Path, rows: &[T]) -> Result<(), OutputError> {
    let csv_err = |source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;
    if rows.is_empty() {
        let headers = T::headers();
        wtr.write_record(headers.iter().map(|h| h.as_bytes())).map_err(csv_err)?;
    }
    for r in rows {
        wtr.serialize(r).map_err(csv_err)?;
    }
    wtr.flush().map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), OutputError> {
    let s = serde_json::to_string_pretty(value).map_err(|source| OutputError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, s).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Render the first `max_rows` rows as a markdown table.
pub fn render_table_rows<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

/// Write `<out_dir>/<id>.csv` for a computed report and return the path plus
/// a markdown preview of its first rows.
pub fn export_report(
    out_dir: &Path,
    spec: &ReportSpec,
    output: &ReportOutput<'_>,
    max_rows: usize,
) -> Result<(PathBuf, String), OutputError> {
    let path = out_dir.join(format!("{}.csv", spec.id));
    let preview = match output {
        ReportOutput::Series(agg) => {
            let rows = series_rows(agg);
            write_csv(&path, &rows)?;
            let mut preview = render_table_rows(&rows, max_rows);
            if agg.omitted > 0 {
                preview.push_str(&format!(
                    "\n({} records in {} further groups counted as {})",
                    format_int(agg.omitted),
                    format_int(agg.omitted_groups),
                    OTHERS_LABEL
                ));
            }
            if agg.unclassified > 0 {
                preview.push_str(&format!(
                    "\n({} records without a value)",
                    format_int(agg.unclassified)
                ));
            }
            preview
        }
        ReportOutput::YearsLost(table) => {
            let rows = years_lost_rows(table);
            write_csv(&path, &rows)?;
            let mut preview = render_table_rows(&rows, max_rows);
            preview.push_str(&format!(
                "\n({} years lost in total)",
                format_int(table.total_years())
            ));
            if table.unclassified > 0 {
                preview.push_str(&format!(
                    "\n({} records without a municipality or an age)",
                    format_int(table.unclassified)
                ));
            }
            preview
        }
        ReportOutput::Map(join) => {
            let rows = map_rows(join);
            write_csv(&path, &rows)?;
            let mut preview = render_table_rows(&rows, max_rows);
            if !join.unmatched.is_empty() {
                preview.push_str(&format!(
                    "\n({} municipalities have no geometry: {})",
                    join.unmatched.len(),
                    join.unmatched.join(", ")
                ));
            }
            preview
        }
        ReportOutput::Missing(rows) => {
            let rows = missing_rows(rows);
            write_csv(&path, &rows)?;
            render_table_rows(&rows, max_rows)
        }
        ReportOutput::MissingByGroup(rows) => {
            let rows = group_quality_rows(rows);
            write_csv(&path, &rows)?;
            render_table_rows(&rows, max_rows)
        }
    };
    Ok((path, preview))
}

pub fn print_preview(spec: &ReportSpec, preview: &str, path: &Path) {
    println!("{}", spec.title);
    println!("({} / {})\n", spec.axis_labels.x, spec.axis_labels.y);
    println!("{}\n", preview);
    println!("(Full table exported to {})\n", path.display());
}
