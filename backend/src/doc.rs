//! OpenAPI documentation for the confirmation API.
//!
//! Domain types do not derive `ToSchema`; the wrappers in
//! [`crate::inbound::http::schemas`] describe them instead. The document is
//! served by Swagger UI in debug builds and printed by `openapi-dump`.

use crate::inbound::http::payments::{ConfirmPaymentRequest, ConfirmPaymentResponse};
use crate::inbound::http::schemas::{ConfirmationErrorCodeSchema, ErrorCodeSchema, ErrorSchema};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Account activation API",
        description = "Confirms activation payments with the payment gateway and credits the welcome bonus."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::payments::confirm_payment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ConfirmPaymentRequest,
        ConfirmPaymentResponse,
        ConfirmationErrorCodeSchema,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "payments", description = "Activation payment confirmation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
