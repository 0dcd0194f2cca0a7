#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for nakgo-algo.
//!
//! ```text
//! nakgo check <species> <length> [--date 2026-07-01]
//! nakgo species
//! nakgo regulations [east|west|south|jeju]
//! nakgo fines
//! nakgo zones visible --bbox 126.8,37.4,127.2,37.7 --zoom 7 [--rendered 1,2]
//! nakgo zones optimize --input raw.json --output zones.json [--max-points 25]
//! nakgo zones fetch --output water.json [--url https://overpass-api.de/api/interpreter]
//! nakgo zones merge --zones zones.json --water water.json --output merged.json
//! nakgo serve [--bind 0.0.0.0] [--port 8080]
//! ```
//!
//! Running `nakgo` with no subcommand enters interactive mode.

mod menu;
mod report;

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use nakgo_regulation::RegulationTable;
use nakgo_regulation_models::Region;
use nakgo_server::ServerConfig;
use nakgo_zone::overpass::DEFAULT_OVERPASS_URL;
use nakgo_zone::{ZoneTable, loader, maintenance::DEFAULT_MAX_RING_POINTS};
use nakgo_zone_models::{ViewportState, ZoneId};

#[derive(Parser)]
#[command(name = "nakgo", about = "Korean recreational fishing rules at hand")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a catch may be kept
    Check {
        /// Species name (e.g. 광어)
        species: String,
        /// Measured total length in centimetres
        length: f64,
        /// Day of the catch, for the closed-season note (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List species with their limits
    Species,
    /// Show regional rule sheets
    Regulations {
        /// Region (east, west, south, jeju); lists regions when omitted
        region: Option<Region>,
    },
    /// Show the fine schedule
    Fines,
    /// Fishing zone tools
    Zones {
        #[command(subcommand)]
        command: ZoneCommands,
    },
    /// Start the API server
    Serve {
        /// Address to bind (overrides `BIND_ADDR`)
        #[arg(long)]
        bind: Option<String>,
        /// Port to bind (overrides `PORT`)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
enum ZoneCommands {
    /// List the zones to draw for a map viewport
    Visible {
        /// Viewport as west,south,east,north
        #[arg(long, allow_hyphen_values = true)]
        bbox: String,
        /// Map level (higher is more zoomed out)
        #[arg(long)]
        zoom: u8,
        /// Ids of zones already drawn
        #[arg(long, value_delimiter = ',')]
        rendered: Vec<ZoneId>,
    },
    /// Simplify, deduplicate, and renumber a zone data file
    Optimize {
        /// Zone JSON to read
        #[arg(long)]
        input: PathBuf,
        /// Where to write the cleaned zone JSON
        #[arg(long)]
        output: PathBuf,
        /// Vertex budget per ring
        #[arg(long, default_value_t = DEFAULT_MAX_RING_POINTS)]
        max_points: usize,
    },
    /// Download named reservoirs and lakes from `OpenStreetMap`
    Fetch {
        /// Where to write the water bodies (JSON)
        #[arg(long)]
        output: PathBuf,
        /// Overpass interpreter endpoint
        #[arg(long, default_value = DEFAULT_OVERPASS_URL)]
        url: String,
    },
    /// Add fetched water bodies to a zone data file as prohibited zones
    Merge {
        /// Existing zone JSON
        #[arg(long)]
        zones: PathBuf,
        /// Water bodies written by `zones fetch`
        #[arg(long)]
        water: PathBuf,
        /// Where to write the merged zone JSON
        #[arg(long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return menu::run().await;
    };

    match command {
        Commands::Check {
            species,
            length,
            date,
        } => {
            let table = RegulationTable::embedded();
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            print!("{}", report::check(&table, &species, length, Some(date))?);
        }
        Commands::Species => print!("{}", report::species(&RegulationTable::embedded())),
        Commands::Regulations { region } => print!("{}", report::regulations(region)),
        Commands::Fines => print!("{}", report::fines()),
        Commands::Zones {
            command:
                ZoneCommands::Visible {
                    bbox,
                    zoom,
                    rendered,
                },
        } => {
            let viewport = ViewportState::from_bbox(&bbox, zoom)
                .ok_or_else(|| format!("Invalid bbox '{bbox}', expected west,south,east,north"))?;
            let rendered: BTreeSet<ZoneId> = rendered.into_iter().collect();
            let table = ZoneTable::embedded();
            let delta = loader::compute_visible_zones(&viewport, table.zones(), &rendered);
            print!("{}", report::zone_delta(&delta, zoom));
        }
        Commands::Zones {
            command:
                ZoneCommands::Optimize {
                    input,
                    output,
                    max_points,
                },
        } => {
            let (before, after) = report::optimize(&input, &output, max_points)?;
            println!("{before} -> {after} zones written to {}", output.display());
        }
        Commands::Zones {
            command: ZoneCommands::Fetch { output, url },
        } => {
            let count = report::fetch(&url, &output).await?;
            println!("{count} water bodies written to {}", output.display());
        }
        Commands::Zones {
            command:
                ZoneCommands::Merge {
                    zones,
                    water,
                    output,
                },
        } => {
            let (before, after) = report::merge(&zones, &water, &output)?;
            println!("{before} -> {after} zones written to {}", output.display());
        }
        Commands::Serve { bind, port } => {
            let mut config = ServerConfig::from_env();
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            // The server uses actix-web's runtime, so run it on a blocking
            // thread rather than nesting it inside tokio's.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(nakgo_server::run_server_with(config))
            })
            .await??;
        }
    }

    Ok(())
}
