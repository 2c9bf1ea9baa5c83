//! CORS policy.

use axum::http::{HeaderValue, header::InvalidHeaderValue};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Build the CORS layer.
///
/// An empty allow-list permits any origin. Otherwise only the listed origins
/// get CORS headers.
///
/// # Errors
///
/// Returns `InvalidHeaderValue` if an origin is not a valid header value.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, InvalidHeaderValue> {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins = origins
            .iter()
            .map(|origin| HeaderValue::from_str(origin))
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, header},
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;

    fn app(origins: &[String]) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(origins).unwrap())
    }

    fn request_from(origin: &str) -> Request<Body> {
        Request::builder()
            .uri("/")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_any_origin_when_unconfigured() {
        let response = app(&[]).oneshot(request_from("https://a.example")).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_allow_list() {
        let origins = vec!["https://a.example".to_string()];

        let allowed = app(&origins)
            .oneshot(request_from("https://a.example"))
            .await
            .unwrap();
        assert_eq!(
            allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://a.example"
        );

        let denied = app(&origins)
            .oneshot(request_from("https://b.example"))
            .await
            .unwrap();
        assert!(!denied.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[test]
    fn test_rejects_invalid_origin() {
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
    }
}
