//! Command-line browser for the medref content library.
//!
//! # Examples
//!
//! ```bash
//! medref get oncology breast-cancer
//! medref search labs "blood sugar"
//! medref level condition-dialysis 2
//! medref --json find kidney
//! ```
//!
//! `MEDREF_EMPTY_QUERY` and `MEDREF_DEFAULT_LEVEL` may be set in the
//! environment or a `.env` file. Logging is controlled by `RUST_LOG`.

mod browse;
mod commands;
mod render;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use commands::Context;
use medref_core::content::labs::Sex;
use medref_core::{Domain, LibraryConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "medref")]
#[command(about = "Bilingual medical-education content browser")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one entry
    Get {
        /// oncology, labs, lab-panels, education or regions
        domain: Domain,
        id: String,
    },
    /// Case-insensitive substring search in one domain
    Search {
        domain: Domain,
        query: String,
        /// Restrict the search to one designated field
        #[arg(long)]
        field: Option<String>,
    },
    /// Ranked full-text search in one domain
    Rank { domain: Domain, query: String },
    /// List entries in any of the given categories
    Category {
        domain: Domain,
        #[arg(required = true)]
        categories: Vec<String>,
    },
    /// List the categories in use in a domain
    Categories { domain: Domain },
    /// Count entries in one domain, or in every domain
    Count { domain: Option<Domain> },
    /// Search every domain
    Find { query: String },
    /// Show an educational topic at one complexity level
    Level {
        id: String,
        /// 1 (child) to 5 (physician); defaults to MEDREF_DEFAULT_LEVEL
        level: Option<u8>,
    },
    /// Show an anatomical region
    Region { region_id: String },
    /// Classify a lab result
    Interpret {
        /// Test id or abbreviation
        test: String,
        #[arg(value_parser = parse_finite)]
        value: f64,
        /// Picks sex-specific reference ranges
        #[arg(long, value_enum, default_value_t = SexArg::Female)]
        sex: SexArg,
    },
    /// Check every built-in entry for content problems
    Validate,
    /// Write one domain to a JSON snapshot
    Export { domain: Domain, path: PathBuf },
    /// Load and validate a JSON snapshot
    Import {
        path: PathBuf,
        /// Fail unless the snapshot holds this domain
        #[arg(long)]
        domain: Option<Domain>,
    },
    /// Interactive line-oriented browser
    Browse,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SexArg {
    Male,
    Female,
}

impl From<SexArg> for Sex {
    fn from(sex: SexArg) -> Self {
        match sex {
            SexArg::Male => Sex::Male,
            SexArg::Female => Sex::Female,
        }
    }
}

fn parse_finite(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{s} is not a finite number"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("medref=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = LibraryConfig::from_env().context("Invalid configuration")?;
    let ctx = Context {
        config,
        json: cli.json,
    };

    match cli.command {
        Commands::Get { domain, id } => commands::get(&ctx, domain, &id)?,
        Commands::Search { domain, query, field } => {
            commands::search(&ctx, domain, &query, field.as_deref())?
        }
        Commands::Rank { domain, query } => commands::rank(&ctx, domain, &query)?,
        Commands::Category { domain, categories } => commands::category(&ctx, domain, &categories)?,
        Commands::Categories { domain } => commands::categories(&ctx, domain)?,
        Commands::Count { domain } => commands::count(&ctx, domain)?,
        Commands::Find { query } => commands::find(&ctx, &query)?,
        Commands::Level { id, level } => commands::level(&ctx, &id, level)?,
        Commands::Region { region_id } => commands::region(&ctx, &region_id)?,
        Commands::Interpret { test, value, sex } => commands::interpret(&ctx, &test, value, sex.into())?,
        Commands::Validate => {
            if !commands::validate(&ctx)? {
                std::process::exit(1);
            }
        }
        Commands::Export { domain, path } => commands::export(&ctx, domain, &path).await?,
        Commands::Import { path, domain } => {
            if !commands::import(&ctx, domain, &path).await? {
                std::process::exit(1);
            }
        }
        Commands::Browse => browse::run_browse(ctx)?,
    }

    Ok(())
}
