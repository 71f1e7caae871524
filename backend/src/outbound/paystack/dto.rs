//! DTOs for decoding Paystack verification responses.
//!
//! The envelope is decoded first so the raw `data` object can be kept for
//! reconciliation, then `data` is mapped into a [`GatewayTransaction`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{GatewayTransaction, PaymentReference, TransactionStatus};

/// Paystack amounts are integers in the currency's minor unit.
const MINOR_UNIT_SCALE: u32 = 2;

#[derive(Debug, Deserialize)]
pub(super) struct VerifyEnvelopeDto {
    pub(super) status: bool,
    #[serde(default)]
    pub(super) message: String,
    #[serde(default)]
    pub(super) data: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TransactionDto {
    pub(super) reference: String,
    pub(super) status: String,
    pub(super) amount: i64,
    #[serde(default)]
    pub(super) currency: Option<String>,
    #[serde(default)]
    pub(super) paid_at: Option<DateTime<Utc>>,
}

impl TransactionDto {
    pub(super) fn into_domain(self, raw_payload: Value) -> Result<GatewayTransaction, String> {
        let reference = PaymentReference::new(self.reference.as_str())
            .map_err(|err| format!("gateway reference {:?} is invalid: {err}", self.reference))?;
        if self.amount < 0 {
            return Err(format!("gateway amount {} is negative", self.amount));
        }

        Ok(GatewayTransaction {
            reference,
            status: TransactionStatus::parse(&self.status),
            amount: Decimal::new(self.amount, MINOR_UNIT_SCALE),
            currency: self.currency.unwrap_or_default(),
            paid_at: self.paid_at,
            raw_payload,
        })
    }
}
