//! OpenAPI schema definitions for domain types.
//!
//! Domain types do not derive `ToSchema`; the wrappers here mirror their
//! serialised shape so the adapter layer owns the framework dependency.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No route or resource matches the request.
    #[schema(rename = "not_found")]
    NotFound,
    /// A dependency is temporarily unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "invalid JSON body: EOF while parsing an object")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::ConfirmationErrorKind`] wire codes.
#[derive(ToSchema)]
#[schema(as = crate::domain::ConfirmationErrorKind)]
pub enum ConfirmationErrorCodeSchema {
    /// Missing or malformed `reference` or `userId`.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Gateway unreachable or inconsistent; retry later.
    #[schema(rename = "gateway_unavailable")]
    GatewayUnavailable,
    /// Gateway reports the payment as not successful.
    #[schema(rename = "payment_not_successful")]
    PaymentNotSuccessful,
    /// No account with the given `userId`.
    #[schema(rename = "user_not_found")]
    UserNotFound,
    /// The payment already activated a different account.
    #[schema(rename = "reference_already_used")]
    ReferenceAlreadyUsed,
    /// Payment verified but the account was not credited; retry later.
    #[schema(rename = "activation_failed")]
    ActivationFailed,
}
