//! Driven port for verifying transactions with the payment processor.
//!
//! The domain owns the verified transaction shape so the confirmation
//! workflow stays independent of any one gateway's wire format.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{GatewayTransaction, PaymentReference, TransactionStatus};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while calling the payment gateway.
    pub enum PaymentGatewayError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "payment gateway transport failed: {message}",
        /// Gateway call exceeded the client timeout.
        Timeout { message: String } =>
            "payment gateway timeout: {message}",
        /// Gateway rejected the configured credentials.
        Unauthorized { message: String } =>
            "payment gateway rejected credentials: {message}",
        /// Gateway rate-limited the request.
        RateLimited { message: String } =>
            "payment gateway rate limited request: {message}",
        /// Gateway does not know the reference.
        UnknownReference { reference: String } =>
            "payment gateway has no transaction for reference {reference}",
        /// Gateway answered with an unexpected status.
        Upstream { status: u16, message: String } =>
            "payment gateway returned status {status}: {message}",
        /// Gateway response could not be decoded.
        Decode { message: String } =>
            "payment gateway response decode failed: {message}",
    }
}

impl PaymentGatewayError {
    /// Return whether retrying this error is expected to help.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } | Self::RateLimited { .. } => true,
            Self::Upstream { status, .. } => *status >= 500,
            Self::Unauthorized { .. } | Self::UnknownReference { .. } | Self::Decode { .. } => {
                false
            }
        }
    }
}

/// Port for looking up a transaction by its gateway reference.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Fetch the gateway's current view of the transaction.
    ///
    /// Implementations return the transaction whatever its status; deciding
    /// whether the status counts as paid is the caller's job.
    async fn verify_transaction(
        &self,
        reference: &PaymentReference,
    ) -> Result<GatewayTransaction, PaymentGatewayError>;
}

/// Fixture gateway used when no gateway credentials are configured.
///
/// Every reference reports as `abandoned`, so nothing is ever activated
/// through it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixturePaymentGateway;

#[async_trait]
impl PaymentGateway for FixturePaymentGateway {
    async fn verify_transaction(
        &self,
        reference: &PaymentReference,
    ) -> Result<GatewayTransaction, PaymentGatewayError> {
        Ok(GatewayTransaction {
            reference: reference.clone(),
            status: TransactionStatus::Abandoned,
            amount: Decimal::ZERO,
            currency: "NGN".to_owned(),
            paid_at: None,
            raw_payload: serde_json::Value::Null,
        })
    }
}
