//! Driving port for confirming activation payments.
//!
//! HTTP handlers and the operator CLI call this port; the domain service
//! implements it.

use async_trait::async_trait;

use crate::domain::{ConfirmationError, ConfirmationOutcome, ConfirmationRequest};

/// Driving port for the confirmation workflow.
///
/// # Idempotency
///
/// Confirming the same reference for an already-activated account returns
/// [`ConfirmationOutcome::AlreadyActivated`] and never credits twice. A
/// reference that already activated a different account is rejected with
/// `ReferenceAlreadyUsed`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentConfirmationCommand: Send + Sync {
    /// Verify the payment and activate the account.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfirmationError`] describing which step failed. None of
    /// them leave the account credited.
    async fn confirm(
        &self,
        request: ConfirmationRequest,
    ) -> Result<ConfirmationOutcome, ConfirmationError>;
}

/// Fixture command that declines every payment.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePaymentConfirmationCommand;

#[async_trait]
impl PaymentConfirmationCommand for FixturePaymentConfirmationCommand {
    async fn confirm(
        &self,
        _request: ConfirmationRequest,
    ) -> Result<ConfirmationOutcome, ConfirmationError> {
        Err(ConfirmationError::payment_not_successful("abandoned"))
    }
}
