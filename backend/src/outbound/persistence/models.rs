//! Diesel row structs. Internal to the persistence adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{UserAccount, UserId};

use super::schema::{transactions, users};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub is_paid: bool,
    pub balance: Option<Decimal>,
    pub total_earned: Option<Decimal>,
    #[expect(dead_code, reason = "selected for completeness; not surfaced to the domain")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "selected for completeness; not surfaced to the domain")]
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserAccount {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            email: row.email,
            is_paid: row.is_paid,
            balance: row.balance.unwrap_or(Decimal::ZERO),
            total_earned: row.total_earned.unwrap_or(Decimal::ZERO),
        }
    }
}

/// Insertable ledger row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transactions)]
pub(crate) struct NewTransactionRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: &'a str,
    pub amount: Decimal,
    pub description: &'a str,
    pub reference: &'a str,
    pub paystack_reference: Option<&'a str>,
    pub status: &'a str,
}
