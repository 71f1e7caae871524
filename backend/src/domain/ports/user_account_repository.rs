//! Port for the user account store.
//!
//! Activation is a compare-and-swap: adapters apply the credit only while the
//! account is still unpaid and report which side of the race the caller was
//! on.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{PositiveAmount, UserAccount, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user account repository adapters.
    pub enum UserAccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user account repository query failed: {message}",
        /// No account row exists for the identifier.
        Missing { user_id: String } =>
            "user account {user_id} does not exist",
    }
}

/// Credit applied to an account when it is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationCredit {
    pub user_id: UserId,
    pub balance_delta: Decimal,
    pub total_earned_delta: Decimal,
}

impl ActivationCredit {
    /// Credit the welcome bonus to both balance and lifetime earnings.
    pub fn welcome_bonus(user_id: &UserId, bonus: PositiveAmount) -> Self {
        Self {
            user_id: user_id.clone(),
            balance_delta: bonus.get(),
            total_earned_delta: bonus.get(),
        }
    }
}

/// Result of a conditional activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationWrite {
    /// This call flipped `is_paid` and applied the credit.
    Applied(UserAccount),
    /// The account was already paid; nothing was written.
    AlreadyActivated(UserAccount),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccountRepository: Send + Sync {
    /// Fetch an account by identifier.
    async fn find_by_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserAccount>, UserAccountRepositoryError>;

    /// Set `is_paid` and add the credit deltas in one atomic statement,
    /// conditioned on the account being unpaid.
    ///
    /// Returns [`UserAccountRepositoryError::Missing`] when the row has
    /// disappeared since it was read.
    async fn activate(
        &self,
        credit: &ActivationCredit,
    ) -> Result<ActivationWrite, UserAccountRepositoryError>;
}

/// Fixture implementation for running without a database.
///
/// Holds no accounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserAccountRepository;

#[async_trait]
impl UserAccountRepository for FixtureUserAccountRepository {
    async fn find_by_id(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<UserAccount>, UserAccountRepositoryError> {
        Ok(None)
    }

    async fn activate(
        &self,
        credit: &ActivationCredit,
    ) -> Result<ActivationWrite, UserAccountRepositoryError> {
        Err(UserAccountRepositoryError::missing(credit.user_id.to_string()))
    }
}
