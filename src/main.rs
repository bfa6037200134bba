//!
//! Gate control service: REST API + MQTT command dispatch.
//! Reads configuration from TOML file (~/.config/gate-central/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use gate_central::application::identity::UserService;
use gate_central::auth::jwt::JwtConfig;
use gate_central::config::AppConfig;
use gate_central::domain::{CreateUserDto, UserRole};
use gate_central::infrastructure::database::migrator::Migrator;
use gate_central::infrastructure::database::repositories::UserRepository;
use gate_central::infrastructure::{CommandPublisher, MqttConfig, MqttPublisher};
use gate_central::{create_api_router, default_config_path, DatabaseConfig, RouterDeps};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("GATE_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Gate Central...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = match metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
    {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Failed to install Prometheus recorder, /metrics disabled: {}", e);
            None
        }
    };

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "gate-central".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    let timezone = app_cfg.access.tz();
    info!("Access windows evaluated in {}", timezone);

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.url.clone(),
    };
    let db = match gate_central::init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // Create default admin user if no users exist
    create_default_admin(&db, &app_cfg, &jwt_config).await;

    // ── MQTT ───────────────────────────────────────────────────
    let mqtt_config = MqttConfig {
        broker_host: app_cfg.mqtt.broker_host.clone(),
        broker_port: app_cfg.mqtt.broker_port,
        client_id: app_cfg.mqtt.client_id.clone(),
        keep_alive_secs: app_cfg.mqtt.keep_alive_secs,
        ca_cert_path: app_cfg.mqtt.ca_cert_path.clone(),
        client_cert_path: app_cfg.mqtt.client_cert_path.clone(),
        client_key_path: app_cfg.mqtt.client_key_path.clone(),
        alpn: app_cfg.mqtt.alpn.clone(),
    };
    let publisher: Arc<dyn CommandPublisher> = match MqttPublisher::connect(&mqtt_config) {
        Ok(publisher) => {
            info!(
                "MQTT client started for {}:{}",
                mqtt_config.broker_host, mqtt_config.broker_port
            );
            Arc::new(publisher)
        }
        Err(e) => {
            error!("Failed to start MQTT client: {}", e);
            return Err(e.into());
        }
    };

    // ── REST API ───────────────────────────────────────────────
    let api_router = create_api_router(RouterDeps {
        db: db.clone(),
        jwt_config,
        timezone,
        publisher,
        upload_dir: app_cfg.uploads.dir.clone().into(),
        metrics_handle: prometheus_handle,
        rate_limit: Some(app_cfg.rate_limit.clone()),
    });

    let api_addr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    axum::serve(
        listener,
        api_router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // Perform final cleanup
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Gate Central shutdown complete");
    Ok(())
}

/// Resolve on SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Create the bootstrap admin account when the users table is empty.
async fn create_default_admin(
    db: &sea_orm::DatabaseConnection,
    app_cfg: &AppConfig,
    jwt_config: &JwtConfig,
) {
    use gate_central::domain::UserRepositoryInterface;

    let repo = Arc::new(UserRepository::new(db.clone()));
    let users_count = match repo.count().await {
        Ok(count) => count,
        Err(e) => {
            error!("Failed to count users: {}", e);
            return;
        }
    };
    if users_count > 0 {
        return;
    }

    info!("Creating default admin user...");
    let service = UserService::new(repo, jwt_config.clone());
    match service
        .create_user(CreateUserDto {
            username: app_cfg.admin.username.clone(),
            password: app_cfg.admin.password.clone(),
            role: UserRole::Admin,
            access_start: None,
            access_end: None,
        })
        .await
    {
        Ok(user) => {
            info!("Default admin created: {}", user.username);
            warn!("Please change the admin password immediately!");
        }
        Err(e) => error!("Failed to create admin user: {}", e),
    }
}
