//! petcheck CLI - functional checks against a Petstore deployment

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use petcheck_core::{Config, RunReport, schema};
use petcheck_runner::{Harness, Logger, Suite};

const CONFIG_FILE: &str = ".petcheck.toml";

#[derive(Parser)]
#[command(name = "petcheck")]
#[command(about = "Functional test suite for the Petstore REST API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "terminal")]
    output: OutputFormat,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenario suite
    Run {
        /// Config file (default: .petcheck.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the configured API root
        #[arg(long)]
        base_url: Option<String>,

        /// Only run scenarios whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,

        /// Also write the report here (JSON if the name ends in .json)
        #[arg(long)]
        report_file: Option<PathBuf>,
    },

    /// List scenario names
    List {
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Initialize config file
    Init,

    /// Export a JSON Schema
    Schema {
        #[arg(value_enum)]
        target: SchemaTarget,
    },
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq, Debug)]
enum OutputFormat {
    Terminal,
    Json,
    Silent,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq, Debug)]
enum SchemaTarget {
    Pet,
    User,
    Order,
    Inventory,
    ApiResponse,
    /// The run report
    Report,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(3)
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Run {
            config,
            base_url,
            filter,
            report_file,
        } => {
            let mut cfg = match config {
                Some(path) => Config::load(&path)?,
                None => Config::load_default()?,
            };
            if let Some(url) = base_url {
                cfg.base_url = url;
            }
            if cli.verbose {
                cfg.log_level = "debug".to_string();
            }

            let mut harness =
                Harness::from_config(&cfg).context("cannot build the Petstore client")?;
            if cli.output == OutputFormat::Silent {
                harness.logger = Logger::silent();
            }

            let suite = select(filter.as_deref());
            if suite.is_empty() {
                bail!(
                    "no scenario matches {:?}; see `petcheck list`",
                    filter.unwrap_or_default()
                );
            }

            if cli.output == OutputFormat::Terminal {
                eprintln!("Config:");
                eprintln!("  base_url:  {}", cfg.base_url);
                if !cfg.headers.is_empty() {
                    eprintln!("  headers:   {} configured", cfg.headers.len());
                }
                eprintln!("  scenarios: {}", suite.len());
                eprintln!();
            }

            let report = suite.run(&harness);

            match cli.output {
                OutputFormat::Terminal => println!("\n{}", report.to_terminal()),
                OutputFormat::Json => println!("{}", to_json(&report)?),
                OutputFormat::Silent => {}
            }

            if let Some(path) = report_file {
                write_report(&report, &path)?;
                if cli.output != OutputFormat::Silent {
                    eprintln!("Report saved: {}", path.display());
                }
            }

            Ok(report.exit_code())
        }

        Commands::List { filter } => {
            let suite = select(filter.as_deref());
            match cli.output {
                OutputFormat::Terminal => {
                    for name in suite.names() {
                        println!("{name}");
                    }
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&suite.names())?),
                OutputFormat::Silent => {}
            }
            Ok(if suite.is_empty() { 3 } else { 0 })
        }

        Commands::Init => {
            if Path::new(CONFIG_FILE).exists() {
                eprintln!("{CONFIG_FILE} already exists");
                return Ok(1);
            }

            std::fs::write(CONFIG_FILE, Config::example())
                .with_context(|| format!("cannot write {CONFIG_FILE}"))?;
            println!("Created {CONFIG_FILE}");
            println!("\nEdit the file to configure:");
            println!("  - base_url: API root to test");
            println!("  - headers: API keys");
            println!("  - response_time_limit: optional latency bound");
            Ok(0)
        }

        Commands::Schema { target } => {
            println!("{}", schema_for(target)?);
            Ok(0)
        }
    }
}

fn select(filter: Option<&str>) -> Suite {
    let suite = Suite::standard();
    match filter {
        Some(pattern) => suite.filter(pattern),
        None => suite,
    }
}

/// Report plus verdict, as printed by `--output json`.
fn to_json(report: &RunReport) -> Result<String> {
    let output = serde_json::json!({
        "verdict": {
            "status": report.status().to_string(),
            "exit_code": report.exit_code(),
            "reason": report.reason(),
        },
        "report": report,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    let content = if path.extension().is_some_and(|ext| ext == "json") {
        to_json(report)?
    } else {
        report.to_terminal()
    };
    std::fs::write(path, content)
        .with_context(|| format!("cannot write report to {}", path.display()))
}

fn schema_for(target: SchemaTarget) -> Result<String> {
    let resource = match target {
        SchemaTarget::Pet => schema::pet_schema(),
        SchemaTarget::User => schema::user_schema(),
        SchemaTarget::Order => schema::order_schema(),
        SchemaTarget::Inventory => schema::inventory_schema(),
        SchemaTarget::ApiResponse => schema::api_response_schema(),
        SchemaTarget::Report => return Ok(petcheck_core::report::generate_schema()),
    };
    Ok(serde_json::to_string_pretty(&resource.to_json_schema())?)
}
