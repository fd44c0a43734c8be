//! Web layer for the transit engine.
//!
//! JSON endpoints over the query engine plus the line and stop listings
//! the front end uses to draw the map.

mod dto;
mod routes;
mod state;

use axum::http::HeaderValue;
use axum::http::header::InvalidHeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, blocking};

/// CORS for the given browser origins, with credentials.
///
/// Methods and headers mirror the preflight request, since a wildcard cannot
/// be combined with credentials.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, InvalidHeaderValue> {
    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CORS_ORIGINS;

    #[test]
    fn cors_accepts_default_origins() {
        let origins: Vec<String> = DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect();
        assert!(cors_layer(&origins).is_ok());
    }

    #[test]
    fn cors_rejects_malformed_origin() {
        assert!(cors_layer(&["http://bad\norigin".to_string()]).is_err());
    }
}
