//! `openhomed` — the openhome server binary.
//!
//! Usage:
//!   openhomed [-c <context-name-or-path>] [--listen <addr>]
//!
//! The context name resolves to `/etc/openhome/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.
//! Without `-c`, built-in development defaults apply.

mod auth_middleware;
mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use jsonwebtoken::{DecodingKey, Validation};
use tracing::info;

use openhome_core::Module;

use auth_middleware::JwtState;
use config::ServerConfig;

/// openhome server.
#[derive(Parser, Debug)]
#[command(name = "openhomed", about = "openhome server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config")]
    config: Option<String>,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let server_config = match &cli.config {
        Some(name) => {
            let config_path = ServerConfig::resolve_path(name);
            info!("Loading configuration from {}", config_path.display());
            ServerConfig::load(&config_path)?
        }
        None => {
            info!("No configuration given, using development defaults");
            ServerConfig::default()
        }
    };
    server_config.verify()?;

    // Initialize storage.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = openhome_core::ServiceConfig {
        data_dir: Some(data_dir.clone()),
        listen: cli.listen.clone(),
        ..Default::default()
    };

    // Embedded stores (shared by all modules).
    let sql: Arc<dyn openhome_sql::SQLStore> = Arc::new(
        openhome_sql::SqliteStore::open(&core_config.resolve_sqlite_path())
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );
    let kv: Arc<dyn openhome_kv::KVStore> = Arc::new(
        openhome_kv::RedbStore::open(&core_config.resolve_kv_path())
            .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?,
    );

    // The content store doubles as the notify module's target resolver,
    // so both modules must share one instance.
    let content = Arc::new(
        social::store::ContentStore::new(Arc::clone(&sql))
            .map_err(|e| anyhow::anyhow!("failed to init content store: {}", e))?,
    );

    let notify_module = notify::NotifyModule::new(
        Arc::clone(&sql),
        content.clone(),
        notify::service::NotifyConfig {
            suppress_self_reply: server_config.notify.suppress_self_reply,
        },
    )?;
    info!("Notify module initialized");

    let social_module = social::SocialModule::new(
        Arc::clone(&sql),
        Arc::clone(&kv),
        content,
        Arc::clone(notify_module.service()),
    )?;
    info!("Social module initialized");

    let module_routes = vec![
        (social_module.name(), social_module.routes()),
        (notify_module.name(), notify_module.routes()),
    ];

    // Build JWT state for middleware.
    let jwt_state = Arc::new(JwtState {
        decoding_key: DecodingKey::from_secret(server_config.jwt.secret.as_bytes()),
        validation: Validation::default(),
    });

    // Build router.
    let app = routes::build_router(jwt_state, module_routes);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("openhome server listening on {}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
