//! HTTP inbound adapter exposing the confirmation endpoint and health checks.

use actix_web::web;

pub mod error;
pub mod health;
pub mod payments;
pub mod preflight;
pub mod schemas;
pub mod state;

pub use error::ApiResult;

/// Register the versioned API, the health checks, and the fallback handler.
///
/// Callers supply [`state::HttpState`] and [`health::HealthState`] as app
/// data and wrap the app in the trace and CORS middleware.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::{App, web};
/// use activation_backend::domain::ports::FixturePaymentConfirmationCommand;
/// use activation_backend::inbound::http::{self, health::HealthState, state::HttpState};
///
/// let state = HttpState::new(Arc::new(FixturePaymentConfirmationCommand));
/// let _app = App::new()
///     .app_data(web::Data::new(state))
///     .app_data(web::Data::new(HealthState::new()))
///     .configure(http::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(payments::json_config())
            .service(payments::confirm_payment),
    )
    .service(health::ready)
    .service(health::live)
    .default_service(web::to(preflight::preflight_or_not_found));
}
