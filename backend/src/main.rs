//! Service entry-point: loads settings, prepares adapters, and serves HTTP.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use activation_backend::domain::ConfirmationPolicy;
use activation_backend::inbound::http::health::HealthState;
use activation_backend::outbound::paystack::{GatewaySecret, PaystackHttpGateway};
use activation_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use activation_backend::settings::AppSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let bind_addr = settings.bind_addr()?;
    let policy = ConfirmationPolicy {
        welcome_bonus: settings.welcome_bonus()?,
    };
    let mut config = ServerConfig::new(bind_addr, policy);

    if let Some(database_url) = settings.database_url() {
        if settings.run_migrations {
            run_pending_migrations(database_url)
                .await
                .wrap_err("failed to apply database migrations")?;
        }
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections),
        )
        .await
        .wrap_err("failed to create database pool")?;
        config = config.with_db_pool(pool);
    }

    if let Some(secret) = settings.gateway_secret_key() {
        let gateway = PaystackHttpGateway::new(
            settings.gateway_base_url()?,
            GatewaySecret::new(secret),
            settings.gateway_timeout()?,
        )
        .wrap_err("failed to build payment gateway client")?;
        config = config.with_gateway(Arc::new(gateway));
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to bind HTTP server")?;
    info!(%bind_addr, "activation service listening");
    server.await.wrap_err("HTTP server terminated with an error")
}
