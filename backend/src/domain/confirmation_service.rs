//! Payment confirmation service.
//!
//! Implements [`PaymentConfirmationCommand`]: verify with the gateway, load
//! the account, claim the payment reference in the ledger, apply the
//! activation credit conditionally, then record the welcome bonus on a
//! best-effort basis.
//!
//! The payment entry is written before the credit, and the ledger rejects a
//! second entry with the same reference, so one gateway payment can activate
//! at most one account. A replay for an activated account returns
//! `AlreadyActivated` without writing; a bonus entry lost to a ledger outage
//! is not re-created.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info, warn};

use crate::domain::ports::{
    ActivationCredit, ActivationWrite, LedgerRepository, LedgerRepositoryError, PaymentGateway,
    PaymentGatewayError, PaymentConfirmationCommand, UserAccountRepository,
    UserAccountRepositoryError,
};
use crate::domain::{
    ConfirmationError, ConfirmationOutcome, ConfirmationPolicy, ConfirmationRequest,
    GatewayTransaction, LedgerEntry, LedgerReport, LedgerWriteStatus, PositiveAmount, UserAccount,
};

/// Confirmation workflow over injected gateway and store ports.
///
/// The port parameters may be trait objects, so the server can pick adapters
/// at start-up.
pub struct PaymentConfirmationService<G: ?Sized, U: ?Sized, L: ?Sized> {
    gateway: Arc<G>,
    accounts: Arc<U>,
    ledger: Arc<L>,
    clock: Arc<dyn Clock>,
    policy: ConfirmationPolicy,
}

impl<G: ?Sized, U: ?Sized, L: ?Sized> Clone for PaymentConfirmationService<G, U, L> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            accounts: Arc::clone(&self.accounts),
            ledger: Arc::clone(&self.ledger),
            clock: Arc::clone(&self.clock),
            policy: self.policy,
        }
    }
}

impl<G: ?Sized, U: ?Sized, L: ?Sized> PaymentConfirmationService<G, U, L> {
    /// Create a service with the given collaborators and policy.
    pub fn new(
        gateway: Arc<G>,
        accounts: Arc<U>,
        ledger: Arc<L>,
        clock: Arc<dyn Clock>,
        policy: ConfirmationPolicy,
    ) -> Self {
        Self {
            gateway,
            accounts,
            ledger,
            clock,
            policy,
        }
    }
}

impl<G, U, L> PaymentConfirmationService<G, U, L>
where
    G: PaymentGateway + ?Sized,
    U: UserAccountRepository + ?Sized,
    L: LedgerRepository + ?Sized,
{
    fn map_gateway_error(
        request: &ConfirmationRequest,
        err: PaymentGatewayError,
    ) -> ConfirmationError {
        match err {
            PaymentGatewayError::UnknownReference { .. } => {
                warn!(
                    reference = %request.reference,
                    user_id = %request.user_id,
                    "gateway does not know payment reference"
                );
                ConfirmationError::payment_not_successful("unknown")
            }
            other => {
                warn!(
                    reference = %request.reference,
                    user_id = %request.user_id,
                    retryable = other.is_retryable(),
                    error = %other,
                    "payment verification failed"
                );
                ConfirmationError::gateway_unavailable(other.to_string())
            }
        }
    }

    fn map_account_error(
        request: &ConfirmationRequest,
        err: UserAccountRepositoryError,
    ) -> ConfirmationError {
        match err {
            UserAccountRepositoryError::Missing { .. } => {
                error!(
                    reference = %request.reference,
                    user_id = %request.user_id,
                    "account disappeared after verified payment"
                );
                ConfirmationError::user_not_found(&request.user_id)
            }
            other => {
                error!(
                    reference = %request.reference,
                    user_id = %request.user_id,
                    error = %other,
                    "account activation failed after verified payment"
                );
                ConfirmationError::activation_failed(other.to_string())
            }
        }
    }

    async fn verify(
        &self,
        request: &ConfirmationRequest,
    ) -> Result<GatewayTransaction, ConfirmationError> {
        let transaction = self
            .gateway
            .verify_transaction(&request.reference)
            .await
            .map_err(|err| Self::map_gateway_error(request, err))?;

        if transaction.reference != request.reference {
            warn!(
                requested = %request.reference,
                returned = %transaction.reference,
                "gateway returned a different transaction"
            );
            return Err(ConfirmationError::gateway_unavailable(format!(
                "gateway returned reference {} for {}",
                transaction.reference, request.reference
            )));
        }

        if !transaction.status.is_success() {
            warn!(
                reference = %request.reference,
                user_id = %request.user_id,
                status = %transaction.status,
                "payment not successful"
            );
            return Err(ConfirmationError::payment_not_successful(
                transaction.status.as_str(),
            ));
        }

        Ok(transaction)
    }

    async fn load_account(
        &self,
        request: &ConfirmationRequest,
    ) -> Result<UserAccount, ConfirmationError> {
        match self.accounts.find_by_id(&request.user_id).await {
            Ok(Some(account)) => Ok(account),
            Ok(None) => {
                error!(
                    reference = %request.reference,
                    user_id = %request.user_id,
                    "no account for verified payment"
                );
                Err(ConfirmationError::user_not_found(&request.user_id))
            }
            Err(err) => Err(Self::map_account_error(request, err)),
        }
    }

    /// Record the payment entry as this account's claim on the reference.
    ///
    /// A duplicate owned by the same account means an earlier attempt
    /// claimed it and failed before crediting, so the flow may continue.
    async fn claim_reference(
        &self,
        request: &ConfirmationRequest,
        transaction: &GatewayTransaction,
    ) -> Result<LedgerWriteStatus, ConfirmationError> {
        let amount = PositiveAmount::new(transaction.amount).map_err(|err| {
            warn!(
                reference = %request.reference,
                user_id = %request.user_id,
                error = %err,
                "verified payment carries no positive amount"
            );
            ConfirmationError::payment_not_successful("invalid_amount")
        })?;
        let entry = LedgerEntry::activation_payment(&request.user_id, amount, &request.reference);

        match self.ledger.append(&entry).await {
            Ok(()) => Ok(LedgerWriteStatus::Recorded),
            Err(LedgerRepositoryError::DuplicateReference { .. }) => {
                self.check_reference_owner(request).await
            }
            Err(err) => Err(Self::map_claim_error(request, err)),
        }
    }

    async fn check_reference_owner(
        &self,
        request: &ConfirmationRequest,
    ) -> Result<LedgerWriteStatus, ConfirmationError> {
        match self.ledger.reference_owner(&request.reference).await {
            Ok(Some(owner)) if owner == request.user_id => {
                info!(
                    reference = %request.reference,
                    user_id = %request.user_id,
                    "payment reference already claimed by this account"
                );
                Ok(LedgerWriteStatus::AlreadyRecorded)
            }
            Ok(owner) => {
                warn!(
                    reference = %request.reference,
                    user_id = %request.user_id,
                    owner = ?owner.as_ref().map(ToString::to_string),
                    "payment reference already used by another account"
                );
                Err(ConfirmationError::reference_already_used(&request.reference))
            }
            Err(err) => Err(Self::map_claim_error(request, err)),
        }
    }

    fn map_claim_error(
        request: &ConfirmationRequest,
        err: LedgerRepositoryError,
    ) -> ConfirmationError {
        error!(
            reference = %request.reference,
            user_id = %request.user_id,
            error = %err,
            "could not claim payment reference"
        );
        ConfirmationError::activation_failed(err.to_string())
    }

    async fn record_bonus(&self, request: &ConfirmationRequest) -> LedgerWriteStatus {
        let entry = LedgerEntry::welcome_bonus(
            &request.user_id,
            self.policy.welcome_bonus,
            self.clock.utc(),
        );
        match self.ledger.append(&entry).await {
            Ok(()) => LedgerWriteStatus::Recorded,
            Err(LedgerRepositoryError::DuplicateReference { reference }) => {
                info!(%reference, "welcome bonus already recorded");
                LedgerWriteStatus::AlreadyRecorded
            }
            Err(err) => {
                warn!(
                    reference = %entry.reference,
                    user_id = %entry.user_id,
                    error = %err,
                    "welcome bonus ledger write failed"
                );
                LedgerWriteStatus::Failed {
                    message: err.to_string(),
                }
            }
        }
    }
}

#[async_trait]
impl<G, U, L> PaymentConfirmationCommand for PaymentConfirmationService<G, U, L>
where
    G: PaymentGateway + ?Sized,
    U: UserAccountRepository + ?Sized,
    L: LedgerRepository + ?Sized,
{
    async fn confirm(
        &self,
        request: ConfirmationRequest,
    ) -> Result<ConfirmationOutcome, ConfirmationError> {
        let transaction = self.verify(&request).await?;
        let account = self.load_account(&request).await?;

        if account.is_paid {
            info!(
                reference = %request.reference,
                user_id = %request.user_id,
                "account already activated"
            );
            return Ok(ConfirmationOutcome::AlreadyActivated { account });
        }

        let payment = self.claim_reference(&request, &transaction).await?;

        let credit = ActivationCredit::welcome_bonus(&request.user_id, self.policy.welcome_bonus);
        let account = match self.accounts.activate(&credit).await {
            Ok(ActivationWrite::Applied(account)) => account,
            Ok(ActivationWrite::AlreadyActivated(account)) => {
                info!(
                    reference = %request.reference,
                    user_id = %request.user_id,
                    "concurrent confirmation activated the account first"
                );
                return Ok(ConfirmationOutcome::AlreadyActivated { account });
            }
            Err(err) => return Err(Self::map_account_error(&request, err)),
        };

        let bonus = self.record_bonus(&request).await;
        let ledger = LedgerReport { bonus, payment };
        info!(
            reference = %request.reference,
            user_id = %request.user_id,
            amount = %transaction.amount,
            currency = %transaction.currency,
            ledger_complete = ledger.is_complete(),
            "payment confirmed and account activated"
        );

        Ok(ConfirmationOutcome::Activated {
            welcome_bonus: self.policy.welcome_bonus.get(),
            account,
            ledger,
        })
    }
}

#[cfg(test)]
#[path = "confirmation_service_tests.rs"]
mod tests;
