//! Request middleware: trace identifiers and cross-origin headers.

pub mod cors;
pub mod trace;

pub use cors::cors_headers;
pub use trace::Trace;
