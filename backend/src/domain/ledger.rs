//! Append-only ledger of financial events tied to a user account.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{PaymentReference, UserId};

const WELCOME_BONUS_DESCRIPTION: &str = "Welcome bonus for account activation";
const ACTIVATION_PAYMENT_DESCRIPTION: &str = "Account activation payment";

/// Kind of financial event recorded in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerEntryKind {
    Bonus,
    Payment,
}

impl LedgerEntryKind {
    /// Stored spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bonus => "bonus",
            Self::Payment => "payment",
        }
    }
}

impl fmt::Display for LedgerEntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement status of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerEntryStatus {
    Completed,
    Pending,
    Failed,
}

impl LedgerEntryStatus {
    /// Stored spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Failed => "failed",
        }
    }
}

/// Rejected amount for a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ledger amounts must be greater than zero, got {0}")]
pub struct NonPositiveAmount(pub Decimal);

/// Welcome bonus credited on activation unless configured otherwise (3.00).
pub const DEFAULT_WELCOME_BONUS: PositiveAmount =
    PositiveAmount(Decimal::from_parts(300, 0, 0, false, 2));

/// Strictly positive monetary amount.
///
/// # Examples
/// ```
/// use activation_backend::domain::PositiveAmount;
/// use rust_decimal::Decimal;
///
/// assert!(PositiveAmount::new(Decimal::new(300, 2)).is_ok());
/// assert!(PositiveAmount::new(Decimal::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositiveAmount(Decimal);

impl PositiveAmount {
    /// Validate that `amount` is greater than zero.
    pub fn new(amount: Decimal) -> Result<Self, NonPositiveAmount> {
        if amount > Decimal::ZERO {
            Ok(Self(amount))
        } else {
            Err(NonPositiveAmount(amount))
        }
    }

    /// The wrapped amount.
    pub fn get(self) -> Decimal {
        self.0
    }
}

/// Immutable audit record of one financial event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub user_id: UserId,
    pub kind: LedgerEntryKind,
    pub amount: PositiveAmount,
    pub description: String,
    /// Unique per logical event; the store rejects duplicates.
    pub reference: String,
    /// Gateway reference for entries that mirror a gateway transaction.
    pub gateway_reference: Option<PaymentReference>,
    pub status: LedgerEntryStatus,
}

impl LedgerEntry {
    /// Bonus entry for an activation, keyed by user and the credit instant.
    ///
    /// # Examples
    /// ```
    /// use activation_backend::domain::{LedgerEntry, LedgerEntryKind, PositiveAmount, UserId};
    /// use chrono::{TimeZone, Utc};
    /// use rust_decimal::Decimal;
    ///
    /// let user_id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    /// let at = Utc.timestamp_millis_opt(1_700_000_000_000).single().expect("valid instant");
    /// let bonus = PositiveAmount::new(Decimal::new(300, 2)).expect("positive");
    /// let entry = LedgerEntry::welcome_bonus(&user_id, bonus, at);
    /// assert_eq!(entry.kind, LedgerEntryKind::Bonus);
    /// assert_eq!(
    ///     entry.reference,
    ///     "WELCOME-3fa85f64-5717-4562-b3fc-2c963f66afa6-1700000000000"
    /// );
    /// ```
    pub fn welcome_bonus(user_id: &UserId, amount: PositiveAmount, at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.clone(),
            kind: LedgerEntryKind::Bonus,
            amount,
            description: WELCOME_BONUS_DESCRIPTION.to_owned(),
            reference: format!("WELCOME-{user_id}-{}", at.timestamp_millis()),
            gateway_reference: None,
            status: LedgerEntryStatus::Completed,
        }
    }

    /// Payment entry mirroring a verified gateway transaction.
    pub fn activation_payment(
        user_id: &UserId,
        amount: PositiveAmount,
        reference: &PaymentReference,
    ) -> Self {
        Self {
            user_id: user_id.clone(),
            kind: LedgerEntryKind::Payment,
            amount,
            description: ACTIVATION_PAYMENT_DESCRIPTION.to_owned(),
            reference: reference.to_string(),
            gateway_reference: Some(reference.clone()),
            status: LedgerEntryStatus::Completed,
        }
    }
}
