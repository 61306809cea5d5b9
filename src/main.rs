use anyhow::Result;
use clap::{Parser, Subcommand};
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions};
use time::OffsetDateTime;

/// chefbook - chef booking marketplace
#[derive(Parser)]
#[command(name = "chefbook")]
#[command(about = "Chef booking marketplace", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Soft-delete past bookings older than the retention window
    CleanupBookings {
        /// Retention period in days (overrides config file)
        #[arg(long)]
        retention_days: Option<u32>,

        /// Report the eligible count without archiving anything
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = chefbook::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    chefbook::observability::init_observability(
        "chefbook",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => serve_command(config, host, port).await,
        Commands::Migrate => migrate_command(config).await,
        Commands::Reset => reset_command(config).await,
        Commands::CleanupBookings {
            retention_days,
            dry_run,
        } => cleanup_command(config, retention_days, dry_run).await,
    }
}

#[tracing::instrument(skip(config))]
async fn serve_command(
    config: chefbook::config::Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting chefbook server...");

    let host = host_override.unwrap_or_else(|| config.server.host.clone());
    let port = port_override.unwrap_or(config.server.port);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    // Periodic booking cleanup runs in-process when enabled
    if config.booking.cleanup_enabled {
        let sched = chefbook::cleanup::scheduler(&pool, &config.booking).await?;
        sched.start().await?;
        tracing::info!(
            schedule = %config.booking.cleanup_schedule,
            retention_days = config.booking.retention_days,
            "Booking cleanup job scheduled"
        );
    } else {
        tracing::warn!("Booking cleanup is disabled by configuration");
    }

    let app = chefbook::create_app(pool, config);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: chefbook::config::Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    if !sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::info!("Database does not exist, creating: {}", config.database.url);
        sqlx::Sqlite::create_database(&config.database.url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn reset_command(config: chefbook::config::Config) -> Result<()> {
    tracing::info!("Resetting database...");

    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        sqlx::Sqlite::drop_database(&config.database.url).await?;
        tracing::info!("Database dropped successfully");
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate_command(config).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn cleanup_command(
    config: chefbook::config::Config,
    retention_override: Option<u32>,
    dry_run: bool,
) -> Result<()> {
    if !config.booking.cleanup_enabled {
        tracing::warn!("Booking cleanup is disabled by configuration.");
        return Ok(());
    }

    let retention_days = retention_override.unwrap_or(config.booking.retention_days);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await?;

    let report =
        chefbook::cleanup::run(&pool, retention_days, dry_run, OffsetDateTime::now_utc()).await?;

    if report.dry_run {
        tracing::info!(
            "Dry run: {} booking(s) eligible for cleanup.",
            report.eligible
        );
    } else {
        tracing::info!("Soft-deleted {} booking(s).", report.archived);
    }

    Ok(())
}
