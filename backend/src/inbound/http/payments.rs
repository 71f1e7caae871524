//! Payment confirmation handler.
//!
//! ```text
//! POST /api/v1/payments/confirm {"reference":"T685312322670591","userId":"3fa85f64-..."}
//! ```

use actix_web::{HttpRequest, post, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{ConfirmationError, ConfirmationOutcome, ConfirmationRequest, Error};
use crate::inbound::http::state::HttpState;

const ACTIVATED_MESSAGE: &str = "Payment confirmed and account activated";
const ALREADY_ACTIVATED_MESSAGE: &str = "Account already activated";

/// Confirmation request body.
///
/// Both fields are optional at the wire level so a missing field produces the
/// workflow's own validation message rather than a JSON decode error.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    /// Gateway transaction reference.
    #[schema(example = "T685312322670591")]
    pub reference: Option<String>,
    /// Identifier of the account to activate.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: Option<String>,
}

/// Confirmation response envelope shared by success and failure.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Payment confirmed and account activated")]
    pub message: Option<String>,
    /// Bonus credited by this call, in major currency units.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    #[schema(value_type = Option<f64>, example = 3.0)]
    pub welcome_bonus: Option<Decimal>,
    /// Human-readable failure message, safe to display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Stable failure code such as `payment_not_successful`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Set when the account had already been activated by an earlier call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub already_activated: Option<bool>,
}

impl ConfirmPaymentResponse {
    /// Render a successful outcome.
    pub fn success(outcome: &ConfirmationOutcome) -> Self {
        let (message, already_activated) = match outcome {
            ConfirmationOutcome::Activated { .. } => (ACTIVATED_MESSAGE, None),
            ConfirmationOutcome::AlreadyActivated { .. } => (ALREADY_ACTIVATED_MESSAGE, Some(true)),
        };
        Self {
            success: true,
            message: Some(message.to_owned()),
            welcome_bonus: Some(outcome.welcome_bonus()),
            error: None,
            code: None,
            already_activated,
        }
    }

    /// Render a failure. Activation failures state explicitly that no bonus
    /// was applied.
    pub fn failure(error: &ConfirmationError) -> Self {
        let welcome_bonus = matches!(error, ConfirmationError::ActivationFailed { .. })
            .then_some(Decimal::ZERO);
        Self {
            success: false,
            message: None,
            welcome_bonus,
            error: Some(error.public_message()),
            code: Some(error.kind().as_str().to_owned()),
            already_activated: None,
        }
    }
}

/// JSON extractor configuration for the confirmation endpoint.
///
/// Undecodable bodies become `invalid_request` errors carrying the trace id.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(4 * 1024)
        .error_handler(|err, _req: &HttpRequest| {
            Error::invalid_request(format!("invalid JSON body: {err}"))
                .with_details(json!({ "code": "invalid_json" }))
                .into()
        })
}

/// Verify a payment with the gateway and activate the account.
#[utoipa::path(
    post,
    path = "/api/v1/payments/confirm",
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "Payment confirmed, or account already active", body = ConfirmPaymentResponse),
        (status = 400, description = "Invalid request, payment not successful, or unknown user", body = ConfirmPaymentResponse),
        (status = 409, description = "Payment reference already used to activate another account", body = ConfirmPaymentResponse),
        (status = 500, description = "Payment verified but the account could not be credited", body = ConfirmPaymentResponse),
        (status = 503, description = "Payment gateway unavailable; retry later. Earlier versions of this endpoint answered 500 here; 503 is used deliberately so clients can tell a gateway outage from a failed credit", body = ConfirmPaymentResponse)
    ),
    tags = ["payments"],
    operation_id = "confirmPayment",
    security([])
)]
#[post("/payments/confirm")]
pub async fn confirm_payment(
    state: web::Data<HttpState>,
    payload: web::Json<ConfirmPaymentRequest>,
) -> Result<web::Json<ConfirmPaymentResponse>, ConfirmationError> {
    let payload = payload.into_inner();
    let request = ConfirmationRequest::try_from_parts(
        payload.reference.as_deref(),
        payload.user_id.as_deref(),
    )?;
    let outcome = state.confirmation.confirm(request).await?;
    Ok(web::Json(ConfirmPaymentResponse::success(&outcome)))
}
