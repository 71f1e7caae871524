//! Cross-origin headers applied to every response.
//!
//! The confirmation endpoint is called from browser clients on other
//! origins, so success, error, and preflight responses all carry the same
//! permissive headers.

use actix_web::http::header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN};
use actix_web::middleware::DefaultHeaders;

/// Origins allowed to call the API.
pub const ALLOWED_ORIGIN: &str = "*";

/// Request headers browser clients may send.
pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Middleware inserting the CORS headers unless a handler already set them.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use activation_backend::middleware::cors_headers;
///
/// let _app = App::new().wrap(cors_headers());
/// ```
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((ACCESS_CONTROL_ALLOW_ORIGIN, ALLOWED_ORIGIN))
        .add((ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS))
}
