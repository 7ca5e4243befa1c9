//! rpg-gen server
//!
//! Serves random picks from named, weighted generators loaded from a YAML
//! data file. Provides endpoints for:
//!
//! - Listing categories and drawing random values (HTML fragments or JSON)
//! - A page per generator
//! - Replacing the whole dataset at runtime (`PUT /admin/upload`, key protected)
//!
//! Static frontend files are served from `--static-dir`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rpg_gen_core::{Catalog, CompilePolicy, DuplicatePolicy, SampleBounds, UnknownKindPolicy};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod auth;
mod error;
mod render;
mod source;

use api::AppState;
use source::DataSource;

/// Command-line arguments for the rpg-gen server
#[derive(Parser, Debug)]
#[command(name = "rpg-gen-server")]
#[command(about = "Random generator server with hot-swappable data")]
struct Args {
    /// Data file to load: a local path or an http(s) URL
    #[arg(long, env = "RPG_DATA", default_value = "data/demo.yaml")]
    data: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Directory of static frontend files
    #[arg(long, default_value = "static")]
    static_dir: PathBuf,

    /// Smallest number of picks returned per request
    #[arg(long, default_value_t = rpg_gen_core::config::DEFAULT_MIN_COUNT)]
    min_count: usize,

    /// Largest number of picks returned per request
    #[arg(long, default_value_t = rpg_gen_core::config::DEFAULT_MAX_COUNT)]
    max_count: usize,

    /// Timeout for fetching a remote data file, in seconds
    #[arg(long, default_value = "30")]
    fetch_timeout_secs: u64,

    /// Shared secret for the admin routes (sent as `Authorization: Bearer <key>`)
    #[arg(long, env = "RPG_ADMIN_KEY", hide_env_values = true)]
    admin_key: Option<String>,

    /// Serve a placeholder entry for unknown generator types instead of rejecting the document
    #[arg(long)]
    legacy_unknown_kind: bool,

    /// Let a later generator replace an earlier one with the same name
    #[arg(long)]
    allow_duplicate_names: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn compile_policy(&self) -> CompilePolicy {
        let mut policy = CompilePolicy::strict();
        if self.legacy_unknown_kind {
            policy.unknown_kind = UnknownKindPolicy::Placeholder;
        }
        if self.allow_duplicate_names {
            policy.duplicates = DuplicatePolicy::LastWins;
        }
        policy
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bounds = SampleBounds::new(args.min_count, args.max_count)?;
    let policy = args.compile_policy();

    // Load the initial dataset; any failure here is fatal
    let source = DataSource::parse(&args.data);
    info!("Loading generators from {}", source);
    let set = source
        .load(&policy, Duration::from_secs(args.fetch_timeout_secs))
        .await
        .with_context(|| format!("Failed to load generators from {}", source))?;
    info!("Loaded {} generators", set.len());

    let state = AppState::new(Catalog::new(set, bounds), policy, args.admin_key.clone());
    if state.admin_key.is_none() {
        warn!("No admin key configured; PUT /admin/upload will reject every request");
    }

    let static_dir = args.static_dir.is_dir().then_some(args.static_dir.as_path());
    if static_dir.is_none() {
        warn!(
            "Static directory {} not found; serving API only",
            args.static_dir.display()
        );
    }

    let app = api::router(state, static_dir);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Picks per request: {}..={}", bounds.min(), bounds.max());

    axum::serve(listener, app).await?;

    Ok(())
}
