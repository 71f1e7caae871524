//! Fallback handler: answers CORS preflight requests and 404s the rest.
//!
//! Browsers send `OPTIONS` before the cross-origin `POST` to the confirm
//! endpoint. The CORS headers themselves are added by
//! [`crate::middleware::cors_headers`]; this handler only supplies the no-op
//! body.

use actix_web::http::Method;
use actix_web::{HttpRequest, HttpResponse};

use crate::domain::Error;
use crate::inbound::http::ApiResult;

/// Default service for the application.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use activation_backend::inbound::http::preflight::preflight_or_not_found;
///
/// let _app = App::new().default_service(web::to(preflight_or_not_found));
/// ```
pub async fn preflight_or_not_found(req: HttpRequest) -> ApiResult<HttpResponse> {
    if req.method() == Method::OPTIONS {
        return Ok(HttpResponse::Ok().content_type("text/plain").body("ok"));
    }
    Err(Error::not_found(format!("no route for {} {}", req.method(), req.path())))
}
