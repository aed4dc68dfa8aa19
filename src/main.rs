use anyhow::{Context, Result};
use cabinet_core::application::{
    commands::mahakim::SyncRequest,
    ports::{
        browser::BrowserLauncher,
        security::{PasswordHasher, TokenGenerator},
        time::Clock,
    },
    services::{Adapters, ApplicationServices, Repositories},
};
use cabinet_core::config::AppConfig;
use cabinet_core::domain::cases::{AlerteData, AlerteIndex};
use cabinet_core::infrastructure::{
    browser::WebDriverLauncher,
    database,
    repositories::{
        PgRecordRepository, PostgresAuditLogRepository, PostgresAuthTokenRepository,
        PostgresSyncResultRepository, PostgresUserRepository,
    },
    security::{password::Argon2PasswordHasher, token::OpaqueTokenGenerator},
    time::SystemClock,
};
use cabinet_core::presentation::http::{routes::build_router, state::HttpState};
use clap::{Parser, Subcommand};
use sqlx::PgPool;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cabinet", version, about = "Case management backend for a law office")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Create the admin account and sample records on an empty database.
    SeedDemo {
        #[arg(long, env = "SEED_ADMIN_USERNAME")]
        username: Option<String>,
    },
    /// Pull case status from the court portal for open affaires.
    SyncMahakim {
        #[arg(long)]
        limit: Option<u32>,
        /// Sync a single affaire by id.
        #[arg(long = "affaire")]
        affaire_id: Option<i64>,
        #[arg(long, conflicts_with = "no_headless")]
        headless: bool,
        #[arg(long)]
        no_headless: bool,
        /// Seconds to wait for the result fragment.
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Create reminders for deadlines due within the horizon.
    ScanDeadlines {
        #[arg(long)]
        days: Option<u32>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err:#}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let pool = database::init_pool(config.database_url())
        .await
        .context("cannot connect to the database")?;
    database::run_migrations(&pool).await?;

    let services = Arc::new(build_services(&pool, &config)?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(services, &config).await,
        Command::SeedDemo { username } => {
            let username = username.unwrap_or_else(|| config.seed_admin_username().to_string());
            let report = services
                .seeder
                .seed(&username, config.seed_admin_password()?)
                .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::SyncMahakim {
            limit,
            affaire_id,
            headless,
            no_headless,
            timeout,
        } => {
            let headless = match (headless, no_headless) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let request = SyncRequest {
                limit,
                affaire_id,
                headless,
                timeout: timeout.map(Duration::from_secs),
            };
            let report = services.mahakim.sync_batch(request).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::ScanDeadlines { days } => {
            let days = days.unwrap_or_else(|| config.alert_horizon_days());
            let report = services.deadlines.scan(days).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

fn build_services(pool: &PgPool, config: &AppConfig) -> Result<ApplicationServices> {
    let alertes = Arc::new(PgRecordRepository::<AlerteData>::new(pool.clone()));
    let alerte_index: Arc<dyn AlerteIndex> = alertes.clone();

    let repos = Repositories {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        tokens: Arc::new(PostgresAuthTokenRepository::new(pool.clone())),
        audit_logs: Arc::new(PostgresAuditLogRepository::new(pool.clone())),
        sync_results: Arc::new(PostgresSyncResultRepository::new(pool.clone())),
        affaires: Arc::new(PgRecordRepository::new(pool.clone())),
        audiences: Arc::new(PgRecordRepository::new(pool.clone())),
        decisions: Arc::new(PgRecordRepository::new(pool.clone())),
        recours: Arc::new(PgRecordRepository::new(pool.clone())),
        executions: Arc::new(PgRecordRepository::new(pool.clone())),
        avertissements: Arc::new(PgRecordRepository::new(pool.clone())),
        alertes,
        alerte_index,
    };

    // the driver must outlive the in-page wait
    let driver_timeout = config.mahakim_timeout() + Duration::from_secs(30);
    let browser: Arc<dyn BrowserLauncher> =
        Arc::new(WebDriverLauncher::new(config.webdriver_url(), driver_timeout)?);
    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher);
    let token_generator: Arc<dyn TokenGenerator> = Arc::new(OpaqueTokenGenerator);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let adapters = Adapters {
        password_hasher,
        token_generator,
        clock,
        browser,
    };

    Ok(ApplicationServices::new(
        repos,
        adapters,
        config.service_settings()?,
    ))
}

async fn serve(services: Arc<ApplicationServices>, config: &AppConfig) -> Result<()> {
    let state = HttpState {
        services,
        session: config.session().clone(),
    };

    let app = build_router(state);
    let service = app.into_make_service_with_connect_info::<SocketAddr>();

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
