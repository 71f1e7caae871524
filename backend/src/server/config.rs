//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use activation_backend::domain::ConfirmationPolicy;
use activation_backend::domain::ports::PaymentGateway;
use activation_backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) policy: ConfirmationPolicy,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) gateway: Option<Arc<dyn PaymentGateway>>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, policy: ConfirmationPolicy) -> Self {
        Self {
            bind_addr,
            policy,
            db_pool: None,
            gateway: None,
        }
    }

    /// Attach a database pool. Without one the stores are fixtures that hold
    /// no accounts.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach the payment gateway. Without one every payment is declined.
    #[must_use]
    pub fn with_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }
}
