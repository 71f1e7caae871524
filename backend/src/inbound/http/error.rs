//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep [`Error`] and [`ConfirmationError`] HTTP-agnostic while
//! letting Actix handlers turn them into JSON responses with stable status
//! codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{
    ConfirmationError, ConfirmationErrorKind, Error, ErrorCode, TRACE_ID_HEADER, TraceId,
};
use crate::inbound::http::payments::ConfirmPaymentResponse;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// Status code for a confirmation failure.
///
/// Client mistakes and terminal payment outcomes are 400. A reference
/// already claimed by another account is 409. An unreachable gateway is 503
/// so callers know a retry may help. A verified payment that could not be
/// credited is 500.
pub fn confirmation_status(kind: ConfirmationErrorKind) -> StatusCode {
    match kind {
        ConfirmationErrorKind::InvalidRequest
        | ConfirmationErrorKind::PaymentNotSuccessful
        | ConfirmationErrorKind::UserNotFound => StatusCode::BAD_REQUEST,
        ConfirmationErrorKind::ReferenceAlreadyUsed => StatusCode::CONFLICT,
        ConfirmationErrorKind::GatewayUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ConfirmationErrorKind::ActivationFailed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for ConfirmationError {
    fn status_code(&self) -> StatusCode {
        confirmation_status(self.kind())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = TraceId::current() {
            builder.insert_header((TRACE_ID_HEADER, id.to_string()));
        }

        builder.json(ConfirmPaymentResponse::failure(self))
    }
}
