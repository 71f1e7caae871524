//! PostgreSQL-backed `LedgerRepository`. Inserts only; the unique
//! `reference` column turns replays into `DuplicateReference`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::{LedgerEntry, PaymentReference, UserId};
use crate::domain::ports::{LedgerRepository, LedgerRepositoryError};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::NewTransactionRow;
use super::pool::DbPool;
use super::schema::transactions;

/// Diesel implementation of the ledger port.
#[derive(Clone)]
pub struct DieselLedgerRepository {
    pool: DbPool,
}

impl DieselLedgerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_insert_error(error: &diesel::result::Error, reference: &str) -> LedgerRepositoryError {
    match classify_diesel_error(error, "append ledger entry") {
        DieselFailure::Connection(message) => LedgerRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => {
            LedgerRepositoryError::duplicate_reference(reference)
        }
        DieselFailure::Query(message) => LedgerRepositoryError::query(message),
    }
}

fn new_row(entry: &LedgerEntry) -> NewTransactionRow<'_> {
    NewTransactionRow {
        id: Uuid::new_v4(),
        user_id: *entry.user_id.as_uuid(),
        kind: entry.kind.as_str(),
        amount: entry.amount.get(),
        description: entry.description.as_str(),
        reference: entry.reference.as_str(),
        paystack_reference: entry.gateway_reference.as_ref().map(AsRef::as_ref),
        status: entry.status.as_str(),
    }
}

#[async_trait]
impl LedgerRepository for DieselLedgerRepository {
    async fn append(&self, entry: &LedgerEntry) -> Result<(), LedgerRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| LedgerRepositoryError::connection(err.into_message()))?;

        diesel::insert_into(transactions::table)
            .values(&new_row(entry))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_insert_error(&err, &entry.reference))
    }

    async fn reference_owner(
        &self,
        reference: &PaymentReference,
    ) -> Result<Option<UserId>, LedgerRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| LedgerRepositoryError::connection(err.into_message()))?;

        let owner: Option<Uuid> = transactions::table
            .filter(transactions::reference.eq(reference.as_ref()))
            .select(transactions::user_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| match classify_diesel_error(&err, "look up reference owner") {
                DieselFailure::Connection(message) => LedgerRepositoryError::connection(message),
                DieselFailure::Query(message) => LedgerRepositoryError::query(message),
                DieselFailure::UniqueViolation { .. } => {
                    LedgerRepositoryError::query("unexpected unique violation")
                }
            })?;

        Ok(owner.map(UserId::from_uuid))
    }
}
