//! In-memory mortality table.
//!
//! Cells are kept as raw text so unknown categorical values survive for the
//! quality audit. Only the death date is parsed up front, plus the age as an
//! optional integer for the age filters.

use chrono::NaiveDate;

use crate::util::{is_blank, normalize_name, parse_date_safe, parse_i32_safe};

pub const DEATH_DATE: &str = "FECHA_DEF";
pub const MUNICIPALITY: &str = "MUNICIPIO_MUERTE";
pub const CAUSE: &str = "CIECAUSADEF1";
pub const VIOLENCE_LOCATION: &str = "LUGAR_OCURRIO_VIOLENCIA";
pub const HEALTH_CENTER: &str = "CENTRO_SALUD";
pub const CERTIFIER: &str = "CERTIFICANTE_MUERTE";
pub const AGE_YEARS: &str = "EDAD_ANO";
pub const SEX: &str = "SEXO";

/// One death record.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    cells: Vec<Option<String>>,
    death_date: Option<NaiveDate>,
    age_years: Option<i32>,
}

impl Record {
    pub fn death_date(&self) -> Option<NaiveDate> {
        self.death_date
    }

    pub fn age_years(&self) -> Option<i32> {
        self.age_years
    }

    /// Raw text of the cell at `idx`, `None` when absent or blank.
    pub fn cell(&self, idx: usize) -> Option<&str> {
        self.cells
            .get(idx)
            .and_then(|c| c.as_deref())
            .filter(|v| !v.trim().is_empty())
    }
}

/// Sex as recorded in `SEXO`; anything unrecognised stays `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Female,
    Male,
    Other,
}

impl Sex {
    pub fn parse(raw: &str) -> Sex {
        match normalize_name(raw).as_str() {
            "f" | "fem" | "femenino" | "mujer" | "female" => Sex::Female,
            "m" | "masc" | "masculino" | "hombre" | "male" => Sex::Male,
            _ => Sex::Other,
        }
    }
}

/// Row filter applied before counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordFilter {
    #[default]
    All,
    /// Deaths under one year of age (`EDAD_ANO < 1`).
    Infant,
    /// Women aged 15 to 49 inclusive.
    FertileAgeWomen,
}

impl RecordFilter {
    pub fn accepts(self, table: &Table, record: &Record) -> bool {
        match self {
            RecordFilter::All => true,
            RecordFilter::Infant => record.age_years.is_some_and(|age| (0..1).contains(&age)),
            RecordFilter::FertileAgeWomen => {
                let female = table
                    .column_index(SEX)
                    .and_then(|idx| record.cell(idx))
                    .is_some_and(|raw| Sex::parse(raw) == Sex::Female);
                female && record.age_years.is_some_and(|age| (15..=49).contains(&age))
            }
        }
    }
}

/// The loaded dataset: header plus records, immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Record>,
    coerced_dates: usize,
}

impl Table {
    /// Build a table from raw rows. Short rows are padded with missing cells.
    ///
    /// Non-blank death dates that fail to parse are coerced to `None` and
    /// counted in [`Table::coerced_dates`].
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Table {
        let date_idx = headers.iter().position(|h| h == DEATH_DATE);
        let age_idx = headers.iter().position(|h| h == AGE_YEARS);
        let width = headers.len();
        let mut coerced_dates = 0usize;

        let rows = rows
            .into_iter()
            .map(|mut cells| {
                cells.resize(width.max(cells.len()), None);
                let raw_date = date_idx.and_then(|i| cells[i].as_deref());
                let death_date = parse_date_safe(raw_date);
                if death_date.is_none() && !is_blank(raw_date) {
                    coerced_dates += 1;
                }
                let age_years = parse_i32_safe(age_idx.and_then(|i| cells[i].as_deref()));
                Record {
                    cells,
                    death_date,
                    age_years,
                }
            })
            .collect();

        Table {
            headers,
            rows,
            coerced_dates,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Number of non-blank death dates that could not be parsed.
    pub fn coerced_dates(&self) -> usize {
        self.coerced_dates
    }

    /// Whether the cell at `idx` counts as missing. The death date column is
    /// judged on its parsed value, so coerced dates are missing too.
    pub fn is_missing(&self, record: &Record, idx: usize) -> bool {
        if self.headers.get(idx).is_some_and(|h| h == DEATH_DATE) {
            record.death_date.is_none()
        } else {
            record.cell(idx).is_none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
            .collect()
    }

    fn headers() -> Vec<String> {
        [DEATH_DATE, MUNICIPALITY, AGE_YEARS, SEX]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn from_rows_counts_coerced_dates() {
        let table = Table::from_rows(
            headers(),
            vec![
                row(&["2024-01-05", "Moca", "70", "M"]),
                row(&["no registrada", "Moca", "", "F"]),
                row(&["", "Cayetano Germosén", "0", "F"]),
            ],
        );
        assert_eq!(table.len(), 3);
        assert_eq!(table.coerced_dates(), 1);
        assert_eq!(
            table.records()[0].death_date(),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert!(table.is_missing(&table.records()[1], 0));
        assert!(table.is_missing(&table.records()[2], 0));
        assert!(table.is_missing(&table.records()[1], 2));
    }

    #[test]
    fn short_rows_are_padded() {
        let table = Table::from_rows(headers(), vec![row(&["2024-02-01"])]);
        let rec = &table.records()[0];
        assert_eq!(rec.cell(3), None);
        assert!(table.is_missing(rec, 1));
    }

    #[test]
    fn whitespace_cells_are_missing_but_text_is_kept_raw() {
        let table = Table::from_rows(headers(), vec![row(&["", "MOCA ", "  ", "M"])]);
        let rec = &table.records()[0];
        assert_eq!(rec.cell(1), Some("MOCA "));
        assert_eq!(rec.cell(2), None);
    }

    #[test]
    fn filters_use_age_and_sex() {
        let table = Table::from_rows(
            headers(),
            vec![
                row(&["", "Moca", "0", "M"]),
                row(&["", "Moca", "1", "F"]),
                row(&["", "Moca", "15", "Femenino"]),
                row(&["", "Moca", "49", "F"]),
                row(&["", "Moca", "50", "F"]),
                row(&["", "Moca", "30", "M"]),
            ],
        );
        let infant: Vec<bool> = table
            .records()
            .iter()
            .map(|r| RecordFilter::Infant.accepts(&table, r))
            .collect();
        assert_eq!(infant, vec![true, false, false, false, false, false]);

        let fertile: Vec<bool> = table
            .records()
            .iter()
            .map(|r| RecordFilter::FertileAgeWomen.accepts(&table, r))
            .collect();
        assert_eq!(fertile, vec![false, false, true, true, false, false]);
    }

    #[test]
    fn sex_parse() {
        assert_eq!(Sex::parse(" MUJER"), Sex::Female);
        assert_eq!(Sex::parse("m"), Sex::Male);
        assert_eq!(Sex::parse("Indeterminado"), Sex::Other);
    }
}
