//! Paystack outbound adapter.
//!
//! A thin reqwest implementation of the `PaymentGateway` port against the
//! transaction verification endpoint.

mod dto;
mod http_gateway;

pub use http_gateway::{GatewaySecret, PaystackConfigError, PaystackHttpGateway};
