//! API middleware components

pub mod logging;
pub mod security;
pub mod session;

pub use logging::logging_middleware;
pub use security::{security_headers_middleware, upload_body_limit};
pub use session::{expired_session_cookie, extract_session_token, session_cookie, RequireSession};
