//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **paystack**: payment gateway verification over HTTPS (reqwest)
//! - **persistence**: PostgreSQL user account and ledger stores (Diesel)
//!
//! Adapters translate between domain types and wire or storage
//! representations. They contain no business logic.

pub mod paystack;
pub mod persistence;
