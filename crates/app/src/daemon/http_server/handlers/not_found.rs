use askama::Template;
use askama_axum::IntoResponse;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::Response;
use axum::Json;

#[derive(Template)]
#[template(path = "pages/not_found.html")]
pub struct NotFoundTemplate {
    pub message: String,
}

/// Fallback for requests no route matched.
/// JSON and plain-text clients get what they asked for, everyone else
/// the HTML page.
pub async fn not_found_handler(uri: Uri, headers: HeaderMap) -> Response {
    tracing::debug!(path = uri.path(), "no route matched");

    let accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if accept.contains("application/json") {
        let err_msg = serde_json::json!({"msg": "not found"});
        return (StatusCode::NOT_FOUND, Json(err_msg)).into_response();
    }
    if accept.contains("text/plain") && !accept.contains("text/html") {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    }

    let template = NotFoundTemplate {
        message: format!("Nothing lives at {}", uri.path()),
    };
    (StatusCode::NOT_FOUND, template).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn status_and_type(accept: Option<&str>) -> (StatusCode, String) {
        let mut headers = HeaderMap::new();
        if let Some(accept) = accept {
            headers.insert(header::ACCEPT, accept.parse().unwrap());
        }
        let response = not_found_handler(Uri::from_static("/missing"), headers).await;
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        (response.status(), content_type)
    }

    #[tokio::test]
    async fn test_not_found_negotiates_content_type() {
        let (status, content_type) = status_and_type(Some("application/json")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(content_type.starts_with("application/json"));

        let (status, content_type) = status_and_type(Some("text/plain")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(content_type.starts_with("text/plain"));

        let (status, content_type) = status_and_type(None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(content_type.starts_with("text/html"));
    }
}
