//! # Orbit API Server
//!
//! The main entry point for the Actix-web HTTP server and, with the
//! `websocket` feature, the socket.io live channel.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use orbit_core::ports::{LiveNotifier, TokenService};
use orbit_infra::{Argon2PasswordService, JwtTokenService};

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;
#[cfg(feature = "websocket")]
mod websocket;

use config::AppConfig;
use state::{AppState, Repositories};
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Orbit API Server on {}:{}",
        config.host,
        config.port
    );

    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

    let live = live_notifier(&config, tokens.clone()).await?;

    #[cfg(feature = "postgres")]
    let repos = Repositories::from_config(config.database.as_ref()).await;
    #[cfg(not(feature = "postgres"))]
    let repos = Repositories::in_memory();

    let state = AppState::build(repos, tokens, Arc::new(Argon2PasswordService::new()), live);

    #[cfg(feature = "rate-limit")]
    let limiter = {
        let limiter = Arc::new(orbit_infra::InMemoryRateLimiter::new(
            config.rate_limit.clone(),
        ));
        spawn_limiter_pruning(limiter.clone());
        limiter
    };

    HttpServer::new(move || {
        let app = App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_app);

        #[cfg(feature = "rate-limit")]
        let app = app.wrap(middleware::rate_limit::RateLimitMiddleware::new(
            limiter.clone(),
        ));

        app
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}

#[cfg(feature = "websocket")]
async fn live_notifier(
    config: &AppConfig,
    tokens: Arc<dyn TokenService>,
) -> anyhow::Result<Arc<dyn LiveNotifier>> {
    let addr = format!("{}:{}", config.host, config.socket_port).parse()?;
    Ok(websocket::start(addr, tokens).await?)
}

#[cfg(not(feature = "websocket"))]
async fn live_notifier(
    _config: &AppConfig,
    _tokens: Arc<dyn TokenService>,
) -> anyhow::Result<Arc<dyn LiveNotifier>> {
    tracing::info!("Websocket feature disabled. Live events stay in-process.");
    Ok(Arc::new(orbit_infra::InMemoryLiveNotifier::default()))
}

#[cfg(feature = "rate-limit")]
fn spawn_limiter_pruning(limiter: Arc<orbit_infra::InMemoryRateLimiter>) {
    actix_rt::spawn(async move {
        let mut interval = actix_rt::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            limiter.prune();
        }
    });
}
