//! CLI entry point for the fibergis server

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use fibergis::api::{self, AppState};
use fibergis::db::{self, SslMode};
use fibergis::store::buildings::BUILDINGS_TABLE;
use fibergis::{DatabaseConfig, SchemaCache, ServerConfig};

// Load .env at startup
fn load_env() {
    // Look for .env in the current directory, then next to the binary
    if dotenvy::dotenv().is_err() {
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

/// Serve the fiber-readiness API over a PostGIS cadastre
#[derive(Parser)]
#[command(name = "fibergis")]
#[command(author, version)]
#[command(about = "REST API for fiber-readiness tracking over a municipal cadastre")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode
    #[arg(short, long)]
    quiet: bool,

    /// Listener address (default: env BIND_ADDR / 127.0.0.1)
    #[arg(long)]
    bind: Option<String>,

    /// Listener port (default: env PORT / 8000)
    #[arg(long)]
    port: Option<u16>,

    /// PostgreSQL host (default: env PGHOST / localhost)
    #[arg(long)]
    host: Option<String>,

    /// PostgreSQL database name (default: env PGDATABASE / fibergis)
    #[arg(long)]
    database: Option<String>,

    /// PostgreSQL user (default: env PGUSER / postgres)
    #[arg(long)]
    user: Option<String>,

    /// PostgreSQL password (default: env PGPASSWORD)
    #[arg(long)]
    password: Option<String>,

    /// PostgreSQL port (default: env PGPORT / 5432)
    #[arg(long)]
    pg_port: Option<u16>,

    /// SSL mode: disable, prefer, require (default: env PGSSLMODE / disable)
    #[arg(long)]
    ssl: Option<SslMode>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment
    load_env();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let db_config = DatabaseConfig::from_env().apply_overrides(
        cli.host,
        cli.database,
        cli.user,
        cli.password,
        cli.pg_port,
        cli.ssl,
    );

    let mut server_config = ServerConfig::from_env();
    if let Some(bind) = cli.bind {
        server_config.bind = bind;
    }
    if let Some(port) = cli.port {
        server_config.port = port;
    }

    info!(
        host = %db_config.host,
        dbname = %db_config.dbname,
        "Connecting to PostgreSQL"
    );

    let pool = db::create_pool(&db_config).await?;
    db::test_connection(&pool).await?;

    // Warm the schema cache eagerly; an unreachable or empty building
    // table is a startup failure, not a per-request surprise
    let schema = Arc::new(SchemaCache::new(BUILDINGS_TABLE));
    {
        let client = pool.get().await.context("Failed to get connection from pool")?;
        let descriptor = schema
            .get(&client)
            .await
            .context("Failed to introspect building table schema")?;
        info!(
            table = %descriptor.table,
            columns = descriptor.columns.len(),
            srid = descriptor.srid,
            "Building table ready"
        );
    }

    let app = api::router(AppState { pool, schema });

    let addr = server_config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {addr}"))?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
