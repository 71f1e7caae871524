//! Request, policy, and tagged result types of the payment confirmation
//! workflow.

use rust_decimal::Decimal;

use crate::domain::{
    DEFAULT_WELCOME_BONUS, PaymentReference, PositiveAmount, UserAccount, UserId,
};

const MISSING_FIELDS_MESSAGE: &str = "Missing reference or userId";

/// Validated confirmation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest {
    /// Gateway transaction reference the client claims to have paid.
    pub reference: PaymentReference,
    /// Account to activate once the payment is verified.
    pub user_id: UserId,
}

impl ConfirmationRequest {
    /// Validate raw request fields.
    ///
    /// Missing or blank fields are rejected before any other check so the
    /// caller sees one message for the common mistake.
    ///
    /// # Examples
    /// ```
    /// use activation_backend::domain::{ConfirmationErrorKind, ConfirmationRequest};
    ///
    /// let request = ConfirmationRequest::try_from_parts(
    ///     Some("T685312322670591"),
    ///     Some("3fa85f64-5717-4562-b3fc-2c963f66afa6"),
    /// )
    /// .expect("valid request");
    /// assert_eq!(request.reference.as_ref(), "T685312322670591");
    ///
    /// let err = ConfirmationRequest::try_from_parts(None, Some("x")).expect_err("missing");
    /// assert_eq!(err.kind(), ConfirmationErrorKind::InvalidRequest);
    /// ```
    pub fn try_from_parts(
        reference: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<Self, ConfirmationError> {
        let (Some(reference), Some(user_id)) = (
            reference.filter(|value| !value.trim().is_empty()),
            user_id.filter(|value| !value.trim().is_empty()),
        ) else {
            return Err(ConfirmationError::invalid_request(MISSING_FIELDS_MESSAGE));
        };

        let reference = PaymentReference::new(reference)
            .map_err(|err| ConfirmationError::invalid_request(err.to_string()))?;
        let user_id = UserId::new(user_id.trim())
            .map_err(|err| ConfirmationError::invalid_request(err.to_string()))?;
        Ok(Self { reference, user_id })
    }
}

/// Fixed business parameters of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    /// Amount added to both balance and lifetime earnings on activation.
    pub welcome_bonus: PositiveAmount,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            welcome_bonus: DEFAULT_WELCOME_BONUS,
        }
    }
}

/// Result of one ledger append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerWriteStatus {
    /// This call inserted the entry.
    Recorded,
    /// An earlier call for the same account already inserted the entry.
    AlreadyRecorded,
    /// The store rejected the write; the message is for logs only.
    Failed {
        /// Adapter error text.
        message: String,
    },
}

impl LedgerWriteStatus {
    /// Whether the ledger now holds the entry.
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded | Self::AlreadyRecorded)
    }
}

/// Which ledger entries an activation produced.
///
/// The payment entry doubles as the claim on the gateway reference and is
/// written before the account is credited, so an activation always reports
/// it as recorded. Only the bonus entry can be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerReport {
    /// Welcome bonus entry, appended after the credit.
    pub bonus: LedgerWriteStatus,
    /// Payment entry holding the gateway reference.
    pub payment: LedgerWriteStatus,
}

impl LedgerReport {
    /// Both entries are present in the ledger.
    pub fn is_complete(&self) -> bool {
        self.bonus.is_recorded() && self.payment.is_recorded()
    }
}

/// Successful outcome of a confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// The account moved from unpaid to paid and the bonus was credited.
    Activated {
        /// Bonus credited by this call.
        welcome_bonus: Decimal,
        /// Account state after the credit.
        account: UserAccount,
        /// Per-entry ledger results.
        ledger: LedgerReport,
    },
    /// The account was already paid; nothing was credited or recorded.
    AlreadyActivated {
        /// Current account state.
        account: UserAccount,
    },
}

impl ConfirmationOutcome {
    /// Bonus credited by this call.
    pub fn welcome_bonus(&self) -> Decimal {
        match self {
            Self::Activated { welcome_bonus, .. } => *welcome_bonus,
            Self::AlreadyActivated { .. } => Decimal::ZERO,
        }
    }

    /// Account state after the call.
    pub fn account(&self) -> &UserAccount {
        match self {
            Self::Activated { account, .. } | Self::AlreadyActivated { account } => account,
        }
    }
}

/// Discriminant of [`ConfirmationError`], for exhaustive branching and
/// stable wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfirmationErrorKind {
    /// Missing or malformed request fields.
    InvalidRequest,
    /// The gateway could not be reached or gave an unusable answer.
    GatewayUnavailable,
    /// The gateway reports the payment as anything other than success.
    PaymentNotSuccessful,
    /// The verified payment names an account that does not exist.
    UserNotFound,
    /// The verified payment is already claimed by another account.
    ReferenceAlreadyUsed,
    /// The payment was verified but the account could not be credited.
    ActivationFailed,
}

impl ConfirmationErrorKind {
    /// Stable snake_case code sent to clients.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::GatewayUnavailable => "gateway_unavailable",
            Self::PaymentNotSuccessful => "payment_not_successful",
            Self::UserNotFound => "user_not_found",
            Self::ReferenceAlreadyUsed => "reference_already_used",
            Self::ActivationFailed => "activation_failed",
        }
    }
}

/// Failure of a confirmation.
///
/// No variant leaves the account credited. `ActivationFailed` means the
/// payment was verified but the account was not credited; the payment entry
/// may already be recorded, which makes a retry by the same account safe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfirmationError {
    /// Missing or malformed request fields.
    #[error("invalid confirmation request: {message}")]
    InvalidRequest {
        /// Message shown to the caller.
        message: String,
    },
    /// The gateway could not be reached or gave an unusable answer.
    #[error("payment gateway unavailable: {message}")]
    GatewayUnavailable {
        /// Adapter error text.
        message: String,
    },
    /// The gateway reports a status other than success.
    #[error("payment not successful (gateway status: {status})")]
    PaymentNotSuccessful {
        /// Gateway status, or `unknown` for an unrecognised reference.
        status: String,
    },
    /// The account named in the request does not exist.
    #[error("user {user_id} not found after verified payment")]
    UserNotFound {
        /// Requested account id.
        user_id: String,
    },
    /// The payment reference is recorded against a different account.
    #[error("payment reference {reference} is already used by another account")]
    ReferenceAlreadyUsed {
        /// Gateway reference that was replayed.
        reference: String,
    },
    /// The payment was verified but the account was not credited.
    #[error("account activation failed after verified payment: {message}")]
    ActivationFailed {
        /// Adapter error text.
        message: String,
    },
}

impl ConfirmationError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn gateway_unavailable(message: impl Into<String>) -> Self {
        Self::GatewayUnavailable {
            message: message.into(),
        }
    }

    pub fn payment_not_successful(status: impl Into<String>) -> Self {
        Self::PaymentNotSuccessful {
            status: status.into(),
        }
    }

    pub fn user_not_found(user_id: &UserId) -> Self {
        Self::UserNotFound {
            user_id: user_id.to_string(),
        }
    }

    pub fn reference_already_used(reference: &PaymentReference) -> Self {
        Self::ReferenceAlreadyUsed {
            reference: reference.to_string(),
        }
    }

    pub fn activation_failed(message: impl Into<String>) -> Self {
        Self::ActivationFailed {
            message: message.into(),
        }
    }

    /// Discriminant without payload.
    pub fn kind(&self) -> ConfirmationErrorKind {
        match self {
            Self::InvalidRequest { .. } => ConfirmationErrorKind::InvalidRequest,
            Self::GatewayUnavailable { .. } => ConfirmationErrorKind::GatewayUnavailable,
            Self::PaymentNotSuccessful { .. } => ConfirmationErrorKind::PaymentNotSuccessful,
            Self::UserNotFound { .. } => ConfirmationErrorKind::UserNotFound,
            Self::ReferenceAlreadyUsed { .. } => ConfirmationErrorKind::ReferenceAlreadyUsed,
            Self::ActivationFailed { .. } => ConfirmationErrorKind::ActivationFailed,
        }
    }

    /// Whether the caller may retry the whole confirmation.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::GatewayUnavailable { .. } | Self::ActivationFailed { .. }
        )
    }

    /// Message safe to show to end users. Internal detail stays in logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidRequest { message } => message.clone(),
            Self::GatewayUnavailable { .. } => "Payment gateway unavailable".to_owned(),
            Self::PaymentNotSuccessful { .. } => "Payment not successful".to_owned(),
            Self::UserNotFound { .. } => "User not found".to_owned(),
            Self::ReferenceAlreadyUsed { .. } => "Payment reference already used".to_owned(),
            Self::ActivationFailed { .. } => "Failed to update user status".to_owned(),
        }
    }
}
