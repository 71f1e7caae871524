//! Payment gateway transaction model.
//!
//! The gateway owns transactions; the domain only reads a verified snapshot.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum accepted length of a gateway reference.
pub const PAYMENT_REFERENCE_MAX: usize = 100;

/// Validation errors returned by [`PaymentReference::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentReferenceValidationError {
    Empty,
    TooLong { max: usize },
    InvalidCharacters,
}

impl fmt::Display for PaymentReferenceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "payment reference must not be empty"),
            Self::TooLong { max } => {
                write!(f, "payment reference must be at most {max} characters")
            }
            Self::InvalidCharacters => write!(
                f,
                "payment reference may only contain letters, digits, '-', '_', '.', or '='",
            ),
        }
    }
}

impl std::error::Error for PaymentReferenceValidationError {}

/// Gateway transaction reference.
///
/// The value is embedded in the verification URL path, so the alphabet is
/// restricted to what the gateway issues.
///
/// # Examples
/// ```
/// use activation_backend::domain::PaymentReference;
///
/// let reference = PaymentReference::new("T685312322670591").expect("valid reference");
/// assert_eq!(reference.as_ref(), "T685312322670591");
/// assert!(PaymentReference::new("../admin").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PaymentReference(String);

impl PaymentReference {
    /// Validate and construct a reference.
    pub fn new(reference: impl Into<String>) -> Result<Self, PaymentReferenceValidationError> {
        let reference = reference.into();
        let trimmed = reference.trim();
        if trimmed.is_empty() {
            return Err(PaymentReferenceValidationError::Empty);
        }
        if trimmed.chars().count() > PAYMENT_REFERENCE_MAX {
            return Err(PaymentReferenceValidationError::TooLong {
                max: PAYMENT_REFERENCE_MAX,
            });
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '='))
        {
            return Err(PaymentReferenceValidationError::InvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PaymentReference {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PaymentReference> for String {
    fn from(value: PaymentReference) -> Self {
        value.0
    }
}

impl TryFrom<String> for PaymentReference {
    type Error = PaymentReferenceValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Transaction status as reported by the gateway.
///
/// Only [`TransactionStatus::Success`] counts as a paid transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    Success,
    Failed,
    Pending,
    Abandoned,
    Reversed,
    Ongoing,
    /// Any status string this service does not know about.
    Other(String),
}

impl TransactionStatus {
    /// Parse the gateway's status string. Unknown values are preserved.
    ///
    /// # Examples
    /// ```
    /// use activation_backend::domain::TransactionStatus;
    ///
    /// assert_eq!(TransactionStatus::parse("success"), TransactionStatus::Success);
    /// assert_eq!(
    ///     TransactionStatus::parse("queued"),
    ///     TransactionStatus::Other("queued".to_owned())
    /// );
    /// ```
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "failed" => Self::Failed,
            "pending" => Self::Pending,
            "abandoned" => Self::Abandoned,
            "reversed" => Self::Reversed,
            "ongoing" => Self::Ongoing,
            _ => Self::Other(raw.trim().to_owned()),
        }
    }

    /// Lowercase wire spelling.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Pending => "pending",
            Self::Abandoned => "abandoned",
            Self::Reversed => "reversed",
            Self::Ongoing => "ongoing",
            Self::Other(raw) => raw.as_str(),
        }
    }

    /// Whether the gateway reports the money as collected.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verified snapshot of a gateway transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayTransaction {
    pub reference: PaymentReference,
    pub status: TransactionStatus,
    /// Amount in major currency units.
    pub amount: Decimal,
    pub currency: String,
    pub paid_at: Option<DateTime<Utc>>,
    /// Undecoded gateway payload kept for reconciliation logs.
    pub raw_payload: serde_json::Value,
}
