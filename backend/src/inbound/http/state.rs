//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and depend only on
//! driving ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::PaymentConfirmationCommand;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub confirmation: Arc<dyn PaymentConfirmationCommand>,
}

impl HttpState {
    /// Construct state from the confirmation port.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use activation_backend::domain::ports::FixturePaymentConfirmationCommand;
    /// use activation_backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(Arc::new(FixturePaymentConfirmationCommand));
    /// let _confirmation = state.confirmation.clone();
    /// ```
    pub fn new(confirmation: Arc<dyn PaymentConfirmationCommand>) -> Self {
        Self { confirmation }
    }
}
