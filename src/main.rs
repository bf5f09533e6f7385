use blog_api::app::{AppState, router};
use blog_api::core::config::Config;
use blog_api::core::db::{DbConfig, create_pool_with_migrations, pool::health_check};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Config loaded: {:?}", config);

    let state = if config.uses_memory_store() {
        tracing::warn!("Using the in-memory store; records are lost on shutdown");
        AppState::in_memory(&config.jwt_secret, config.bcrypt_cost)
    } else {
        let pool = match create_pool_with_migrations(&DbConfig::from_config(&config)).await {
            Ok(pool) => pool,
            Err(e) => {
                tracing::error!("Database setup failed: {}", e);
                std::process::exit(1);
            }
        };

        if let Err(e) = health_check(&pool).await {
            tracing::error!("Database health check failed: {}", e);
            std::process::exit(1);
        }

        AppState::postgres(pool, &config)
    };

    let app = router(state);

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server started on {}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutting down");
}
