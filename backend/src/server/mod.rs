//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::warn;

#[cfg(debug_assertions)]
use activation_backend::doc::ApiDoc;
use activation_backend::domain::PaymentConfirmationService;
use activation_backend::domain::ports::{
    FixtureLedgerRepository, FixturePaymentGateway, FixtureUserAccountRepository,
    LedgerRepository, PaymentConfirmationCommand, PaymentGateway, UserAccountRepository,
};
use activation_backend::inbound::http::{self, health::HealthState, state::HttpState};
use activation_backend::middleware::{Trace, cors_headers};
use activation_backend::outbound::persistence::{
    DieselLedgerRepository, DieselUserAccountRepository,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Assemble the confirmation service from whichever adapters are configured.
fn build_confirmation_service(config: &ServerConfig) -> Arc<dyn PaymentConfirmationCommand> {
    let gateway: Arc<dyn PaymentGateway> = match &config.gateway {
        Some(gateway) => Arc::clone(gateway),
        None => {
            warn!("no payment gateway configured; all payments will be declined");
            Arc::new(FixturePaymentGateway)
        }
    };

    let (accounts, ledger): (Arc<dyn UserAccountRepository>, Arc<dyn LedgerRepository>) =
        match &config.db_pool {
            Some(pool) => (
                Arc::new(DieselUserAccountRepository::new(pool.clone())),
                Arc::new(DieselLedgerRepository::new(pool.clone())),
            ),
            None => {
                warn!("no database configured; using fixture stores");
                (
                    Arc::new(FixtureUserAccountRepository),
                    Arc::new(FixtureLedgerRepository),
                )
            }
        };

    Arc::new(PaymentConfirmationService::new(
        gateway,
        accounts,
        ledger,
        Arc::new(DefaultClock),
        config.policy,
    ))
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(cors_headers())
        .wrap(Trace);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.configure(http::configure)
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(HttpState::new(build_confirmation_service(&config)));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
