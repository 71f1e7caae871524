//! Domain primitives, the confirmation workflow, and its ports.
//!
//! Purpose: define strongly typed entities for activation payments and the
//! service that confirms them. Types are immutable once validated; adapters
//! reach the domain only through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: generic API error payload and stable code.
//! - UserId / UserAccount: account identity and balances.
//! - PaymentReference / TransactionStatus / GatewayTransaction: verified
//!   gateway snapshot.
//! - LedgerEntry and friends: append-only audit records.
//! - ConfirmationRequest / ConfirmationOutcome / ConfirmationError: the
//!   workflow's tagged input and result.
//! - PaymentConfirmationService: implementation of the driving port.

pub mod confirmation;
pub mod confirmation_service;
pub mod error;
pub mod ledger;
pub mod payment;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::confirmation::{
    ConfirmationError, ConfirmationErrorKind, ConfirmationOutcome, ConfirmationPolicy,
    ConfirmationRequest, LedgerReport, LedgerWriteStatus,
};
pub use self::confirmation_service::PaymentConfirmationService;
pub use self::error::{Error, ErrorCode};
pub use self::ledger::{
    DEFAULT_WELCOME_BONUS, LedgerEntry, LedgerEntryKind, LedgerEntryStatus, NonPositiveAmount,
    PositiveAmount,
};
pub use self::payment::{
    GatewayTransaction, PAYMENT_REFERENCE_MAX, PaymentReference, PaymentReferenceValidationError,
    TransactionStatus,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserAccount, UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use activation_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::invalid_request("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
