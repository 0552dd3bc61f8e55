// Entry point and high-level CLI flow.
//
// - Both sources are loaded once at startup; a load failure ends the process.
// - `--list`, `--report <id>` and `--all` run without prompting.
// - Otherwise a menu lets the user pick reports until they choose to exit.
use clap::Parser;
use mortality_report::cli::Cli;
use mortality_report::geojoin::JoinOptions;
use mortality_report::loader::Dataset;
use mortality_report::logging::{init_logging, LogConfig};
use mortality_report::registry::{get_report, reports, ReportSpec};
use mortality_report::reports::{generate_summary, run_report};
use mortality_report::{output, util};
use once_cell::sync::OnceCell;
use std::io::{self, Write};
use std::path::Path;
use tracing::{error, info};

// Read-only after startup; every report borrows from it.
static DATASET: OnceCell<Dataset> = OnceCell::new();

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the report selection menu.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        if io::stdin().read_line(&mut buf).unwrap_or(0) == 0 {
            return false;
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn print_report_list() {
    for (idx, spec) in reports().iter().enumerate() {
        println!("[{}] {:<18} {}", idx + 1, spec.id, spec.title);
    }
}

/// Compute, export and preview one report. Failures are reported and do not
/// stop the remaining reports.
fn generate(spec: &ReportSpec, data: &Dataset, cli: &Cli) -> bool {
    let options = JoinOptions {
        zero_fill: cli.zero_fill,
        ..JoinOptions::default()
    };
    let result = run_report(spec, data, options);
    let out = match result {
        Ok(out) => out,
        Err(e) => {
            error!(report = spec.id, error = %e, "report failed");
            return false;
        }
    };
    match output::export_report(&cli.out_dir, spec, &out, cli.preview_rows) {
        Ok((path, preview)) => {
            output::print_preview(spec, &preview, &path);
            true
        }
        Err(e) => {
            eprintln!("Write error: {}", e);
            false
        }
    }
}

fn write_summary(data: &Dataset, out_dir: &Path) {
    let summary = match generate_summary(data) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "summary failed");
            return;
        }
    };
    let path = out_dir.join("summary.json");
    if let Err(e) = output::write_json(&path, &summary) {
        eprintln!("Write error: {}", e);
        return;
    }
    println!("Summary Stats ({}):", path.display());
    println!(
        "{} records, {} coerced dates, {} of {} municipalities mapped\n",
        util::format_int(summary.total_records),
        util::format_int(summary.coerced_dates),
        summary.municipalities_with_boundary,
        summary.distinct_municipalities
    );
}

fn generate_all(data: &Dataset, cli: &Cli) -> bool {
    println!("Generating reports...\n");
    let mut ok = true;
    for spec in reports() {
        ok &= generate(spec, data, cli);
    }
    write_summary(data, &cli.out_dir);
    ok
}

fn interactive(data: &Dataset, cli: &Cli) {
    loop {
        println!("Select Report:");
        print_report_list();
        println!("[A] All reports");
        println!("[Q] Quit\n");
        let choice = read_choice();
        match choice.to_uppercase().as_str() {
            "Q" | "" => break,
            "A" => {
                generate_all(data, cli);
            }
            other => {
                let spec = other
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|idx| reports().get(idx))
                    .map_or_else(|| get_report(&choice), Ok);
                match spec {
                    Ok(spec) => {
                        println!();
                        generate(spec, data, cli);
                    }
                    Err(e) => {
                        println!("{}. Choose a listed number or id.\n", e);
                        continue;
                    }
                }
            }
        }
        if !prompt_back_to_menu() {
            break;
        }
    }
    println!("Exiting the program.");
}

fn main() {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbosity()));

    if cli.list {
        print_report_list();
        return;
    }

    let data = match Dataset::load(&cli.records, &cli.geography) {
        Ok(data) => DATASET.get_or_init(|| data),
        Err(e) => {
            eprintln!("Failed to load data: {}", e);
            std::process::exit(1);
        }
    };
    info!(bind = %cli.bind_addr(), "dataset ready for the presentation host");
    println!(
        "Processing dataset... ({} rows loaded, {} municipalities with boundaries)",
        util::format_int(data.table.len()),
        util::format_int(data.geography.len())
    );
    if data.table.coerced_dates() > 0 {
        println!(
            "Note: {} death dates could not be parsed and are treated as missing.",
            util::format_int(data.table.coerced_dates())
        );
    }
    println!();

    let ok = if let Some(id) = cli.report.as_deref() {
        match get_report(id) {
            Ok(spec) => generate(spec, data, &cli),
            Err(e) => {
                eprintln!("{}", e);
                false
            }
        }
    } else if cli.all {
        generate_all(data, &cli)
    } else {
        interactive(data, &cli);
        true
    };
    if !ok {
        std::process::exit(1);
    }
}
