//! Port for the append-only transaction ledger.

use async_trait::async_trait;

use crate::domain::{LedgerEntry, PaymentReference, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ledger repository adapters.
    pub enum LedgerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "ledger repository connection failed: {message}",
        /// Insert failed during execution.
        Query { message: String } =>
            "ledger repository query failed: {message}",
        /// An entry with the same reference already exists.
        DuplicateReference { reference: String } =>
            "ledger already holds an entry with reference {reference}",
    }
}

/// Port for appending ledger entries.
///
/// Entries are never updated or deleted. Adapters must reject a second entry
/// with the same `reference` with
/// [`LedgerRepositoryError::DuplicateReference`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Append one entry.
    async fn append(&self, entry: &LedgerEntry) -> Result<(), LedgerRepositoryError>;

    /// Account that owns the entry recorded under `reference`, if any.
    async fn reference_owner(
        &self,
        reference: &PaymentReference,
    ) -> Result<Option<UserId>, LedgerRepositoryError>;
}

/// Fixture ledger that discards entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLedgerRepository;

#[async_trait]
impl LedgerRepository for FixtureLedgerRepository {
    async fn append(&self, _entry: &LedgerEntry) -> Result<(), LedgerRepositoryError> {
        Ok(())
    }

    async fn reference_owner(
        &self,
        _reference: &PaymentReference,
    ) -> Result<Option<UserId>, LedgerRepositoryError> {
        Ok(None)
    }
}
