//! Reqwest-backed Paystack gateway adapter.
//!
//! This adapter owns transport details only: URL construction, bearer
//! authentication, timeout and HTTP error mapping, and JSON decoding into a
//! domain transaction.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use zeroize::Zeroizing;

use super::dto::{TransactionDto, VerifyEnvelopeDto};
use crate::domain::ports::{PaymentGateway, PaymentGatewayError};
use crate::domain::{GatewayTransaction, PaymentReference};

const USER_AGENT: &str = concat!("activation-backend/", env!("CARGO_PKG_VERSION"));

/// Secret API key, wiped from memory on drop and never printed.
#[derive(Clone)]
pub struct GatewaySecret(Zeroizing<String>);

impl GatewaySecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Zeroizing::new(secret.into()))
    }

    fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for GatewaySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GatewaySecret(<redacted>)")
    }
}

/// Errors raised while building the adapter.
#[derive(Debug, thiserror::Error)]
pub enum PaystackConfigError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("gateway base URL {0} cannot carry path segments")]
    BaseUrl(String),
    #[error("gateway secret key must not be empty")]
    EmptySecret,
}

/// Gateway adapter calling `GET {base}/transaction/verify/{reference}`.
pub struct PaystackHttpGateway {
    client: Client,
    base_url: Url,
    secret: GatewaySecret,
}

impl PaystackHttpGateway {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is unusable, the secret is blank, or
    /// the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        secret: GatewaySecret,
        timeout: Duration,
    ) -> Result<Self, PaystackConfigError> {
        if base_url.cannot_be_a_base() {
            return Err(PaystackConfigError::BaseUrl(base_url.to_string()));
        }
        if secret.expose().trim().is_empty() {
            return Err(PaystackConfigError::EmptySecret);
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url,
            secret,
        })
    }

    fn verify_url(&self, reference: &PaymentReference) -> Result<Url, PaymentGatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| PaymentGatewayError::transport("gateway base URL cannot be a base"))?
            .pop_if_empty()
            .extend(["transaction", "verify", reference.as_ref()]);
        Ok(url)
    }
}

#[async_trait]
impl PaymentGateway for PaystackHttpGateway {
    async fn verify_transaction(
        &self,
        reference: &PaymentReference,
    ) -> Result<GatewayTransaction, PaymentGatewayError> {
        let response = self
            .client
            .get(self.verify_url(reference)?)
            .bearer_auth(self.secret.expose())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, reference, body.as_ref()));
        }

        parse_transaction(body.as_ref())
    }
}

fn parse_transaction(body: &[u8]) -> Result<GatewayTransaction, PaymentGatewayError> {
    let envelope: VerifyEnvelopeDto = serde_json::from_slice(body).map_err(|error| {
        PaymentGatewayError::decode(format!("invalid verification payload: {error}"))
    })?;
    if !envelope.status {
        return Err(PaymentGatewayError::decode(format!(
            "gateway reported failure: {}",
            envelope.message
        )));
    }
    let data = envelope
        .data
        .ok_or_else(|| PaymentGatewayError::decode("verification payload has no data"))?;
    let transaction: TransactionDto = serde_json::from_value(data.clone()).map_err(|error| {
        PaymentGatewayError::decode(format!("invalid transaction payload: {error}"))
    })?;
    transaction
        .into_domain(data)
        .map_err(PaymentGatewayError::decode)
}

fn map_transport_error(error: reqwest::Error) -> PaymentGatewayError {
    if error.is_timeout() {
        PaymentGatewayError::timeout(error.to_string())
    } else {
        PaymentGatewayError::transport(error.to_string())
    }
}

fn map_status_error(
    status: StatusCode,
    reference: &PaymentReference,
    body: &[u8],
) -> PaymentGatewayError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            PaymentGatewayError::unauthorized(message)
        }
        StatusCode::TOO_MANY_REQUESTS => PaymentGatewayError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PaymentGatewayError::timeout(message)
        }
        StatusCode::NOT_FOUND => PaymentGatewayError::unknown_reference(reference.as_ref()),
        StatusCode::BAD_REQUEST if preview.to_ascii_lowercase().contains("not found") => {
            PaymentGatewayError::unknown_reference(reference.as_ref())
        }
        _ => PaymentGatewayError::upstream(status.as_u16(), preview),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
