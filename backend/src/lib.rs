//! Account activation payment confirmation service.
//!
//! Verifies a payment with the gateway, activates the account with a welcome
//! bonus, and records both events in the ledger.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
