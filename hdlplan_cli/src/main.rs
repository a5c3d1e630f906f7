//! hdlplan CLI
//!
//! Loads library manifests, assembles the build plan and prints it for the
//! downstream toolchain driver.

mod args;

use std::process::ExitCode;

use clap::Parser;
use hdlplan_resolver::{BuildPlan, PlanError, Planner};
use tracing::info;

use args::{Args, OutputFormat};

/// Runs the planner over the manifests named on the command line.
///
/// Warnings and errors go to stderr; the plan goes to stdout.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(plan) => {
            for warning in &plan.warnings {
                eprintln!("warning: {warning}");
            }
            if let Err(e) = print_plan(&args, &plan) {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        },
        Err(PlanError::Warnings(warnings)) => {
            for warning in &warnings {
                eprintln!("error: {warning}");
            }
            eprintln!("error: {} warning(s) denied", warnings.len());
            ExitCode::FAILURE
        },
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    }
}

fn run(args: &Args) -> Result<BuildPlan, PlanError> {
    let mut planner = Planner::new(args.to_options());
    for manifest in &args.manifests {
        info!("Loading manifest: {}", manifest.display());
        planner.load_manifest(manifest)?;
    }
    planner.assemble()
}

fn print_plan(args: &Args, plan: &BuildPlan) -> Result<(), serde_json::Error> {
    match (args.format, args.order_only) {
        (OutputFormat::Text, true) => {
            for name in plan.order() {
                println!("{name}");
            }
        },
        (OutputFormat::Text, false) => print!("{plan}"),
        (OutputFormat::Json, true) => println!("{}", serde_json::to_string_pretty(&plan.order())?),
        (OutputFormat::Json, false) => println!("{}", serde_json::to_string_pretty(plan)?),
    }
    Ok(())
}
