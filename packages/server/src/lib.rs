#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the nakgo-algo fishing assistant.
//!
//! Serves the REST API behind the mobile front-end: species list and catch
//! verdicts, regional rule sheets, the fine schedule, and fishing zones
//! (all zones as `GeoJSON`, or the incremental set to draw for a map
//! viewport). All reference data is embedded and read-only, so handlers
//! share it through [`AppState`] without locking. The built front-end is
//! served from `app/dist` when present.

mod handlers;
pub mod interactive;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use nakgo_regulation::{RegulationTable, registry};
use nakgo_regulation_models::{Fine, RegionRegulations};
use nakgo_zone::ZoneTable;

/// Default bind address when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default port when `PORT` is unset or invalid.
pub const DEFAULT_PORT: u16 = 8080;

/// Shared application state.
pub struct AppState {
    /// Species regulations used for catch verdicts.
    pub regulations: Arc<RegulationTable>,
    /// Regional rule sheets.
    pub regions: Arc<Vec<RegionRegulations>>,
    /// Fine schedule.
    pub fines: Arc<Vec<Fine>>,
    /// Prohibited and restricted fishing zones.
    pub zones: Arc<ZoneTable>,
}

impl AppState {
    /// Builds the state from the embedded reference tables.
    #[must_use]
    pub fn embedded() -> Self {
        Self {
            regulations: Arc::new(RegulationTable::embedded()),
            regions: Arc::new(registry::all_regions()),
            fines: Arc::new(registry::all_fines()),
            zones: Arc::new(ZoneTable::embedded()),
        }
    }
}

/// Server settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to bind (`PORT`).
    pub port: u16,
    /// Directory holding the built front-end (`STATIC_DIR`).
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT`, and `STATIC_DIR`, falling back to
    /// `127.0.0.1`, `8080`, and `app/dist`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let static_dir = lookup("STATIC_DIR").map_or_else(|| PathBuf::from("app/dist"), PathBuf::from);
        Self {
            bind_addr,
            port,
            static_dir,
        }
    }
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/fish/species", web::get().to(handlers::species))
            .route("/fish/check", web::post().to(handlers::check))
            .route("/regulations", web::get().to(handlers::regions))
            .route("/regulations/{region}", web::get().to(handlers::region))
            .route("/fines", web::get().to(handlers::fines))
            .route("/zones", web::get().to(handlers::zones))
            .route("/zones/visible", web::get().to(handlers::visible_zones))
            .route("/zones/{id}", web::get().to(handlers::zone)),
    );
}

/// Starts the API server with settings from the environment.
///
/// Logging must already be initialised by the caller. This is a regular
/// async function; the caller provides the runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    run_server_with(ServerConfig::from_env()).await
}

/// Starts the API server with explicit settings.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server_with(config: ServerConfig) -> std::io::Result<()> {
    log::info!("Loading reference tables...");
    let state = web::Data::new(AppState::embedded());
    log::info!(
        "Loaded {} species, {} regions, {} fines, {} zones",
        state.regulations.len(),
        state.regions.len(),
        state.fines.len(),
        state.zones.len()
    );

    let static_dir = config.static_dir.is_dir().then(|| config.static_dir.clone());
    if static_dir.is_none() {
        log::warn!(
            "Front-end directory {} not found, serving API only",
            config.static_dir.display()
        );
    }

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        let app = App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api);

        match &static_dir {
            Some(dir) => app.service(Files::new("/", dir).index_file("index.html")),
            None => app,
        }
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}
