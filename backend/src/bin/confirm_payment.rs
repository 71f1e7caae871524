//! Re-run a payment confirmation against the configured gateway and database.
//!
//! Operators use this to reconcile payments whose HTTP confirmation failed
//! with a retryable error. The outcome is printed as the same JSON envelope
//! the HTTP endpoint returns; failures exit non-zero.
//!
//! Re-running is safe: the payment entry is recorded before the account is
//! credited, so an activated account always has it. A welcome bonus entry
//! lost to a ledger outage is not re-created; an already activated account
//! is reported as such without further writes.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::process::ExitCode;
use std::sync::Arc;

use activation_backend::domain::ports::PaymentConfirmationCommand;
use activation_backend::domain::{
    ConfirmationPolicy, ConfirmationRequest, PaymentConfirmationService,
};
use activation_backend::inbound::http::payments::ConfirmPaymentResponse;
use activation_backend::outbound::paystack::{GatewaySecret, PaystackHttpGateway};
use activation_backend::outbound::persistence::{
    DbPool, DieselLedgerRepository, DieselUserAccountRepository, PoolConfig,
};
use activation_backend::settings::AppSettings;
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `confirm-payment` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "confirm-payment",
    about = "Verify an activation payment and activate the account",
    version
)]
struct CliArgs {
    /// Gateway transaction reference.
    #[arg(long, value_name = "reference")]
    reference: String,
    /// Account to activate.
    #[arg(long = "user-id", value_name = "uuid")]
    user_id: String,
    /// Database connection URL. Falls back to `ACTIVATION_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::try_parse()?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: CliArgs) -> Result<ExitCode> {
    let settings = AppSettings::load_from_iter([OsString::from("confirm-payment")])
        .map_err(|err| eyre!("failed to load settings: {err}"))?;

    let database_url = args
        .database_url
        .as_deref()
        .or_else(|| settings.database_url())
        .ok_or_else(|| eyre!("a database URL is required (--database-url or ACTIVATION_DATABASE_URL)"))?;
    let secret = settings
        .gateway_secret_key()
        .ok_or_else(|| eyre!("ACTIVATION_GATEWAY_SECRET_KEY is required"))?;

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(2))
        .await
        .wrap_err("failed to create database pool")?;
    let gateway = PaystackHttpGateway::new(
        settings.gateway_base_url()?,
        GatewaySecret::new(secret),
        settings.gateway_timeout()?,
    )
    .wrap_err("failed to build payment gateway client")?;

    let service = PaymentConfirmationService::new(
        Arc::new(gateway),
        Arc::new(DieselUserAccountRepository::new(pool.clone())),
        Arc::new(DieselLedgerRepository::new(pool)),
        Arc::new(DefaultClock),
        ConfirmationPolicy {
            welcome_bonus: settings.welcome_bonus()?,
        },
    );

    let request = ConfirmationRequest::try_from_parts(
        Some(args.reference.as_str()),
        Some(args.user_id.as_str()),
    );
    let (response, code) = match request {
        Err(err) => (ConfirmPaymentResponse::failure(&err), ExitCode::FAILURE),
        Ok(request) => match service.confirm(request).await {
            Ok(outcome) => (ConfirmPaymentResponse::success(&outcome), ExitCode::SUCCESS),
            Err(err) => (ConfirmPaymentResponse::failure(&err), ExitCode::FAILURE),
        },
    };

    let rendered =
        serde_json::to_string_pretty(&response).wrap_err("failed to render the outcome")?;
    println!("{rendered}");
    Ok(code)
}
