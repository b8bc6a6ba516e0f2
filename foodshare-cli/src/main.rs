#![warn(clippy::dbg_macro)]

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use foodshare_store_db::{FoodDb, NewListing, OpenMode, QueryDef, QueryParams, Table, catalog};

use config::Config;
use error::{IoErrorContext, Result};

mod config;
mod error;
mod render;

/// Query and maintain the food donation database
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (defaults to $FOODSHARE_CONFIG, then ./settings.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overriding the settings file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Create the dataset tables if they are missing
    Init,
    /// List the analytics queries
    Queries,
    /// Print every row of a table
    Table {
        /// providers, receivers, food_listings or claims
        table: Table,
    },
    /// Run one analytics query by name or label (e.g. Q4)
    Query {
        name: String,
        /// Bound parameter, as key=value
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Run every analytics query in dashboard order
    Report {
        /// City for the provider contact query
        #[arg(long)]
        city: Option<String>,
    },
    /// Add a food listing
    Add {
        #[arg(long)]
        provider_id: i64,
        #[arg(long)]
        food_name: String,
        #[arg(long)]
        food_type: String,
        #[arg(long)]
        meal_type: String,
        #[arg(long)]
        quantity: i64,
        #[arg(long)]
        location: String,
    },
    /// Change the quantity of a food listing
    Update {
        #[arg(long)]
        food_id: i64,
        #[arg(long)]
        quantity: i64,
    },
    /// Delete a food listing
    Delete {
        #[arg(long)]
        food_id: i64,
    },
}

fn parse_param(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}

fn open(config: &Config, mode: OpenMode) -> Result<FoodDb> {
    let mode = if config.read_only && mode != OpenMode::ReadOnly {
        OpenMode::ReadOnly
    } else {
        mode
    };
    let db = FoodDb::open(&config.database, mode)?;
    db.set_foreign_keys(config.enforce_foreign_keys)?;
    Ok(db)
}

fn print_result(
    out: &mut impl Write,
    format: Format,
    def: &QueryDef,
    db: &FoodDb,
    params: &QueryParams,
) -> Result<()> {
    let rs = db.run(def, params)?;
    match format {
        Format::Text => render::write_text(out, def, &rs).io_context("Failed to write output")?,
        Format::Json => render::write_json(out, def, &rs)?,
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let mut config = config::load(args.config.as_deref())?;
    if let Some(db) = args.db {
        config.database = db;
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();
    log::debug!("using database {}", config.database.display());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Init => {
            let db = open(&config, OpenMode::Create)?;
            db.create_schema()?;
            db.close()?;
            log::info!("initialized {}", config.database.display());
        }
        Command::Queries => {
            for def in &catalog::ANALYTICS {
                let params = if def.params.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", def.params.join(", "))
                };
                writeln!(out, "{:<4} {:<38} {}{params}", def.label, def.name, def.title)
                    .io_context("Failed to write output")?;
            }
        }
        Command::Table { table } => {
            let db = open(&config, OpenMode::ReadOnly)?;
            print_result(&mut out, args.format, table.dump(), &db, &QueryParams::new())?;
            db.close()?;
        }
        Command::Query { name, params } => {
            let def = catalog::lookup(&name)
                .ok_or(foodshare_store_db::Error::UnknownQuery(name))?;
            let params = params
                .into_iter()
                .fold(QueryParams::new(), |acc, (k, v)| acc.with(k, v));
            let db = open(&config, OpenMode::ReadOnly)?;
            print_result(&mut out, args.format, def, &db, &params)?;
            db.close()?;
        }
        Command::Report { city } => {
            let city = city.unwrap_or_else(|| config.default_city.clone());
            let db = open(&config, OpenMode::ReadOnly)?;
            let mut results = Vec::with_capacity(catalog::ANALYTICS.len());
            for def in &catalog::ANALYTICS {
                let params = if def.params.contains(&"city") {
                    QueryParams::new().with("city", city.as_str())
                } else {
                    QueryParams::new()
                };
                results.push((def, db.run(def, &params)?));
            }
            db.close()?;
            match args.format {
                Format::Text => {
                    for (def, rs) in &results {
                        render::write_text(&mut out, def, rs)
                            .io_context("Failed to write output")?;
                    }
                }
                Format::Json => render::write_json_all(&mut out, &results)?,
            }
        }
        Command::Add {
            provider_id,
            food_name,
            food_type,
            meal_type,
            quantity,
            location,
        } => {
            let mut db = open(&config, OpenMode::ReadWrite)?;
            let food_id = db.add_listing(&NewListing {
                provider_id,
                food_name,
                food_type,
                meal_type,
                quantity,
                location,
            })?;
            db.close()?;
            writeln!(out, "Food listing added (Food_ID {food_id})")
                .io_context("Failed to write output")?;
        }
        Command::Update { food_id, quantity } => {
            let mut db = open(&config, OpenMode::ReadWrite)?;
            db.update_quantity(food_id, quantity)?;
            db.close()?;
            writeln!(out, "Food listing updated").io_context("Failed to write output")?;
        }
        Command::Delete { food_id } => {
            let mut db = open(&config, OpenMode::ReadWrite)?;
            db.delete_listing(food_id)?;
            db.close()?;
            writeln!(out, "Food listing deleted").io_context("Failed to write output")?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
