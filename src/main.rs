mod app;
mod auth;
mod config;
mod db;
mod dto;
mod error;
mod handlers;
mod services;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{AppState, build_router};
use auth::cache::MemorySessionCache;
use auth::password::PasswordHasher;
use auth::service::AuthService;
use auth::token::JwtManager;
use config::Config;
use db::repositories::contact_repository::ContactRepository;
use db::repositories::user_repository::UserRepository;
use services::avatar::GravatarLookup;
use services::email::SmtpMailer;
use services::rate_limit::RateLimiter;

fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,contacts_api=debug,tower_http=info")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();
    tracing::info!("Starting contacts-api...");

    let config = Config::from_env()?;
    tracing::info!("running in {} mode", config.environment.as_str());
    db::connection::init_pool(&config.database_url)?;

    let jwt_manager = JwtManager::new(&config.jwt_secret, config.jwt_algorithm);
    let mailer = SmtpMailer::from_config(&config)?;

    let auth_service = AuthService::new(
        Arc::new(UserRepository),
        Arc::new(MemorySessionCache::new()),
        PasswordHasher::new(),
        jwt_manager,
        Arc::new(mailer),
        Arc::new(GravatarLookup::new()),
    );

    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit,
        config.rate_limit_window_secs,
    ));
    let addr = format!("{}:{}", config.server_host, config.server_port);

    // Keep idle limiter keys from accumulating.
    let sweeper = Arc::clone(&limiter);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(600));
        loop {
            interval.tick().await;
            sweeper.cleanup_stale();
        }
    });

    let state = AppState {
        auth: Arc::new(auth_service),
        contacts: Arc::new(ContactRepository),
        limiter,
        config: Arc::new(config),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
