use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::{ScenarioFile, SolverSettings};
use crate::data::loader::load_listings;
use crate::data::validate::{validate_listings, ValidationSeverity};
use crate::optimizer::solve_scenarios;
use crate::report::{build_reports, render_json, render_table};

const USAGE: &str = "usage: listing-optimizer <solve|scenarios|validate>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Solve,
    Scenarios,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("solve") => Some(Command::Solve),
        Some("scenarios") => Some(Command::Scenarios),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

/// Route logs to stderr so stdout only carries reports. `RUST_LOG` overrides the level.
pub fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Solve) => handle_solve(args),
        Some(Command::Scenarios) => handle_scenarios(),
        Some(Command::Validate) => handle_validate(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Arguments after the command word that are not `--flags`.
fn positional(args: &[String]) -> Vec<&str> {
    args.iter()
        .skip(2)
        .map(String::as_str)
        .filter(|arg| !arg.starts_with("--"))
        .collect()
}

fn handle_solve(args: &[String]) -> i32 {
    let positional = positional(args);
    let Some(listings_path) = positional.first() else {
        eprintln!("usage: listing-optimizer solve <listings.csv> [scenarios.yaml] [--table]");
        return 2;
    };
    let as_table = args.iter().any(|arg| arg == "--table");

    let scenario_file = match positional.get(1) {
        Some(path) => match ScenarioFile::load(path) {
            Ok(file) => file,
            Err(err) => {
                eprintln!("failed to load scenarios '{path}': {err}");
                return 1;
            }
        },
        None => ScenarioFile::builtin(),
    };
    let settings: SolverSettings = scenario_file.solver.with_env_overrides();

    let loaded = match load_listings(listings_path) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("load failed: {err}");
            return 1;
        }
    };

    let results = solve_scenarios(&loaded.listings, &scenario_file.scenarios, &settings);
    let reports = build_reports(&scenario_file.scenarios, &results);
    info!(
        optimal = reports.iter().filter(|r| r.is_optimal()).count(),
        total = reports.len(),
        "scenarios finished"
    );

    if as_table {
        print!("{}", render_table(&reports));
        return 0;
    }
    match render_json(&reports) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize scenario reports: {err}");
            1
        }
    }
}

fn handle_scenarios() -> i32 {
    match ScenarioFile::builtin().to_yaml_string() {
        Ok(yaml) => {
            print!("{yaml}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize scenarios: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let positional = positional(args);
    let Some(path) = positional.first() else {
        eprintln!("usage: listing-optimizer validate <listings.csv>");
        return 2;
    };

    let loaded = match load_listings(path) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };
    let report = validate_listings(&loaded);
    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }

    if report.has_errors() {
        eprintln!(
            "validation failed: {} error(s)",
            report.count(ValidationSeverity::Error)
        );
        1
    } else {
        println!(
            "validation passed: {path} ({} listings, {} warning(s))",
            loaded.listings.len(),
            report.count(ValidationSeverity::Warning)
        );
        0
    }
}
