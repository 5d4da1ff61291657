//! Study Assistant - AI tutor backend
//!
//! Serves the HTTP API for sessions, materials, homework and mind maps.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use study_assistant::{build_app, config::StudyAssistantConfig, db, AppServices};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "study-assistant")]
#[command(author = "Study Assistant Team")]
#[command(version)]
#[command(about = "AI tutor backend for sessions, materials, homework and mind maps")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "STUDY_ASSISTANT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Apply pending database migrations and exit
    Migrate,

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    let config = StudyAssistantConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Serve { host, port } => run_server(config, host, port).await?,
        Commands::Migrate => run_migrations(config).await?,
        Commands::Config { default } => show_config(if default { None } else { Some(&config) })?,
    }

    Ok(())
}

fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        "study_assistant=debug,tower_http=debug"
    } else {
        "study_assistant=info,tower_http=debug"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

async fn run_server(
    mut config: StudyAssistantConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    tracing::info!("Starting Study Assistant");

    let db = db::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    let services = AppServices::from_config(db, &config)?;
    let app = build_app(services, &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "Study Assistant is listening. Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutting down...");
        })
        .await?;
    Ok(())
}

async fn run_migrations(mut config: StudyAssistantConfig) -> Result<()> {
    config.database.run_migrations = false;
    let db = db::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    db::migrate(&db).await?;
    Ok(())
}

fn show_config(config: Option<&StudyAssistantConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
