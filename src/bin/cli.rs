//! Command-line interface for the PathwayML library
//!
//! This binary provides a CLI interface to inspect model files, including:
//! - Checking a model file against the JSON schema and for consistency
//! - Printing the entities of a model as tables
//! - Printing the JSON schema of model files
//!
//! # Usage
//!
//! ```bash
//! # Check a model file, including the units of all quantities
//! pathwayml check --units model.json
//!
//! # Show the contents of a model
//! pathwayml info model.json
//!
//! # Write the JSON schema to a file
//! pathwayml schema --output schema.json
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use colored::Colorize;
use log::error;
use pathwayml::{
    io::load_model,
    validation::{
        consistency::{check_consistency, check_unit_consistency},
        model_schema, validate_json,
    },
};

/// Main CLI configuration struct
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Check a model file against the schema and for consistency
    Check {
        /// Path to the model file
        path: PathBuf,

        /// Treat warnings as errors
        #[arg(long, default_value_t = false)]
        strict: bool,

        /// Also check that all quantities have consistent units
        #[arg(long, default_value_t = false)]
        units: bool,
    },
    /// Print the entities of a model as tables
    Info {
        /// Path to the model file
        path: PathBuf,
    },
    /// Print the JSON schema of model files
    Schema {
        /// Path to save the schema to
        #[arg(short, long, help = "Path to save the schema to.")]
        output: Option<PathBuf>,
    },
}

/// Main entry point for the CLI application
pub fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Check {
            path,
            strict,
            units,
        } => check(path, *strict, *units),
        Commands::Info { path } => info(path),
        Commands::Schema { output } => schema(output.as_deref()),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err}");
            eprintln!("{} {}", "Error:".bold().red(), err);
            ExitCode::FAILURE
        }
    }
}

fn check(path: &Path, strict: bool, units: bool) -> Result<bool, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let schema_report = validate_json(&content)?;

    if !schema_report.valid {
        println!("{}", "Schema validation failed".bold().red());
        for error in &schema_report.errors {
            println!("{error}");
        }
        return Ok(false);
    }

    let model = load_model(path)?;
    let mut report = check_consistency(&model);
    if units {
        report.merge(check_unit_consistency(&model));
    }

    for result in &report.errors {
        println!("{result}");
    }

    let passed = report.is_valid && (!strict || report.errors.is_empty());
    if passed {
        println!(
            "{} Model '{}' is consistent",
            "✓".bold().green(),
            model.id()
        );
    } else {
        println!(
            "{} Model '{}' has {} issue(s)",
            "✗".bold().red(),
            model.id(),
            report.errors.len()
        );
    }

    Ok(passed)
}

fn info(path: &Path) -> Result<bool, Box<dyn std::error::Error>> {
    let model = load_model(path)?;
    println!("{model}");
    Ok(true)
}

fn schema(output: Option<&Path>) -> Result<bool, Box<dyn std::error::Error>> {
    let schema = serde_json::to_string_pretty(&model_schema())?;

    match output {
        Some(path) => fs::write(path, schema)?,
        None => println!("{schema}"),
    }

    Ok(true)
}
