//! Command-line arguments, with environment fallbacks for deployment.

use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_PORT: u16 = 10000;

#[derive(Debug, Parser)]
#[command(
    name = "mortality-report",
    version,
    about = "Provincial mortality reports (Espaillat 2024)",
    long_about = "Load the death records and municipal boundaries once, then compute \
                  the dashboard reports and export them as CSV."
)]
pub struct Cli {
    /// Death records exported from the source spreadsheet as CSV.
    #[arg(
        long,
        env = "MORTALITY_RECORDS",
        value_name = "CSV",
        default_value = "data/defunciones_2024.csv"
    )]
    pub records: PathBuf,

    /// Municipal boundaries as a GeoJSON feature collection.
    #[arg(
        long,
        env = "MORTALITY_GEOGRAPHY",
        value_name = "GEOJSON",
        default_value = "data/municipios_espaillat.geojson"
    )]
    pub geography: PathBuf,

    /// Directory for exported report files.
    #[arg(long = "out-dir", value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Bind address of the presentation host.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Listening port of the presentation host.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Verbose diagnostics (same as -v).
    #[arg(long, env = "DEBUG", value_parser = clap::builder::FalseyValueParser::new())]
    pub debug: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Generate a single report by id and exit.
    #[arg(long, value_name = "ID", conflicts_with = "all")]
    pub report: Option<String>,

    /// Generate every report and exit.
    #[arg(long)]
    pub all: bool,

    /// List report ids and exit.
    #[arg(long)]
    pub list: bool,

    /// Include municipalities without records on the map, with count 0.
    #[arg(long = "zero-fill")]
    pub zero_fill: bool,

    /// Rows shown in each console preview.
    #[arg(long, default_value_t = 5)]
    pub preview_rows: usize,
}

impl Cli {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Effective verbosity, with `--debug` counting as one `-v`.
    pub fn verbosity(&self) -> u8 {
        if self.debug {
            self.verbose.max(1)
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_report_flags() {
        let cli = Cli::try_parse_from([
            "mortality-report",
            "--records",
            "d.csv",
            "--geography",
            "g.geojson",
            "--port",
            "8050",
            "--report",
            "map",
            "--zero-fill",
        ])
        .unwrap();
        assert_eq!(cli.report.as_deref(), Some("map"));
        assert!(cli.zero_fill);
        assert_eq!(cli.bind_addr(), format!("{}:8050", cli.host));
    }

    #[test]
    fn debug_implies_verbose() {
        let cli = Cli::try_parse_from(["mortality-report", "--debug"]).unwrap();
        assert_eq!(cli.verbosity(), 1);
        let cli = Cli::try_parse_from(["mortality-report", "-vv"]).unwrap();
        assert_eq!(cli.verbosity(), 2);
    }

    #[test]
    fn report_and_all_conflict() {
        assert!(Cli::try_parse_from(["mortality-report", "--all", "--report", "map"]).is_err());
    }
}
