//! Request body extractors.

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Request};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// A JSON body where an absent body means `{}`.
///
/// Partial updates may be sent with no body at all; that is an update of
/// zero fields rather than a missing content type or a syntax error. A
/// non-empty body goes through the regular [`Json`] extractor, so content
/// type and syntax are checked exactly as for other endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalJson(pub Value);

impl<S: Send + Sync> FromRequest<S> for OptionalJson {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let headers = req.headers().clone();
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(Value::Object(Map::new())));
        }

        let mut req = Request::new(Body::from(bytes));
        *req.headers_mut() = headers;
        let Json(value) = Json::<Value>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{self, StatusCode};
    use axum::response::IntoResponse;
    use serde_json::json;

    use super::*;

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<Value, ApiError> {
        let mut builder = http::Request::builder().method("PATCH").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let req = builder.body(Body::from(body)).unwrap();
        OptionalJson::from_request(req, &()).await.map(|OptionalJson(v)| v)
    }

    #[tokio::test]
    async fn empty_body_is_empty_object() {
        assert_eq!(extract(None, "").await.unwrap(), json!({}));
        assert_eq!(extract(Some("application/json"), " \n").await.unwrap(), json!({}));
    }

    #[tokio::test]
    async fn json_body_is_parsed() {
        let value = extract(Some("application/json"), r#"{"name": "Lviv"}"#)
            .await
            .unwrap();
        assert_eq!(value, json!({"name": "Lviv"}));
    }

    #[tokio::test]
    async fn body_without_content_type_is_unsupported() {
        let err = extract(None, r#"{"name": "Lviv"}"#).await.unwrap_err();
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let err = extract(Some("application/json"), "{").await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
