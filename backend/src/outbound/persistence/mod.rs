//! PostgreSQL adapters for the user account and ledger ports.
//!
//! Row structs and table definitions stay private to this module; only the
//! repositories, the pool, and the migration runner are exported.

mod diesel_error_mapping;
mod diesel_ledger_repository;
mod diesel_user_account_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_ledger_repository::DieselLedgerRepository;
pub use diesel_user_account_repository::DieselUserAccountRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
