//! JSON response writers.
//!
//! Every failure path answers with the same envelope:
//!
//! ```json
//! {"error": "Not Found", "details": {"id": "no product with id 9"}}
//! ```
//!
//! `details` is omitted when there is nothing to add.
//!
//! | Writer | Status | Default message |
//! |--------|--------|-----------------|
//! | [`bad_request`] | 400 | `Bad Request` |
//! | [`not_found`] | 404 | `Not Found` |
//! | [`method_not_allowed`] | 405 | `Method Not Allowed` |
//! | [`internal_server_error`] | 500 | `Internal Server Error` |

use bytes::Bytes;
use http::{header, HeaderValue, Method, Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use serde_json::{Map, Value};

/// Body type of every response produced by restpack.
pub type ResponseBody = Full<Bytes>;

/// HTTP response type returned by handlers.
pub type HttpResponse = Response<ResponseBody>;

const JSON: &str = "application/json";

/// Written when the payload itself cannot be serialized.
const SERIALIZE_FALLBACK: &str = r#"{"error":"internal server error"}"#;

/// Writes `value` as a JSON body with the given status.
///
/// A value that fails to serialize yields a plain 500 envelope instead.
///
/// # Example
///
/// ```rust
/// use restpack_extract::write_json;
/// use http::StatusCode;
/// use serde_json::json;
///
/// let response = write_json(StatusCode::CREATED, &json!({"id": 1}));
/// assert_eq!(response.status(), StatusCode::CREATED);
/// assert_eq!(response.headers()["content-type"], "application/json");
/// ```
pub fn write_json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> HttpResponse {
    match serde_json::to_vec(value) {
        Ok(body) => json_response(status, Bytes::from(body)),
        Err(_) => json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            Bytes::from_static(SERIALIZE_FALLBACK.as_bytes()),
        ),
    }
}

/// Writes the `{"error", "details"?}` envelope.
pub fn write_error_json(status: StatusCode, error: &str, details: Option<Value>) -> HttpResponse {
    let mut envelope = Map::new();
    envelope.insert("error".to_string(), Value::String(error.to_string()));
    if let Some(details) = details.filter(|d| !d.is_null()) {
        envelope.insert("details".to_string(), details);
    }
    write_json(status, &Value::Object(envelope))
}

/// 400 with `message`, or `Bad Request` when empty.
pub fn bad_request(message: &str, details: Option<Value>) -> HttpResponse {
    write_default_error(StatusCode::BAD_REQUEST, message, details)
}

/// 404 with `message`, or `Not Found` when empty.
pub fn not_found(message: &str, details: Option<Value>) -> HttpResponse {
    write_default_error(StatusCode::NOT_FOUND, message, details)
}

/// 500 with `message`, or `Internal Server Error` when empty.
pub fn internal_server_error(message: &str, details: Option<Value>) -> HttpResponse {
    write_default_error(StatusCode::INTERNAL_SERVER_ERROR, message, details)
}

/// 405 listing the bound methods in the `Allow` header.
pub fn method_not_allowed(allowed: &[Method]) -> HttpResponse {
    let mut response = write_default_error(StatusCode::METHOD_NOT_ALLOWED, "", None);
    let allow = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(header::ALLOW, value);
    }
    response
}

fn write_default_error(status: StatusCode, message: &str, details: Option<Value>) -> HttpResponse {
    let message = if message.is_empty() {
        status.canonical_reason().unwrap_or("Error")
    } else {
        message
    };
    write_error_json(status, message, details)
}

fn json_response(status: StatusCode, body: Bytes) -> HttpResponse {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::json;

    async fn body_json(response: HttpResponse) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_write_json() {
        let response = write_json(StatusCode::OK, &json!({"message": "ok"}));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], JSON);
        assert_eq!(body_json(response).await, json!({"message": "ok"}));
    }

    #[tokio::test]
    async fn test_error_envelope_with_details() {
        let response = write_error_json(
            StatusCode::BAD_REQUEST,
            "test error",
            Some(json!({"field": "error detail"})),
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "test error", "details": {"field": "error detail"}})
        );
    }

    #[tokio::test]
    async fn test_error_envelope_omits_null_details() {
        let response = write_error_json(StatusCode::CONFLICT, "taken", Some(Value::Null));
        assert_eq!(body_json(response).await, json!({"error": "taken"}));
    }

    #[tokio::test]
    async fn test_default_messages() {
        assert_eq!(body_json(bad_request("", None)).await, json!({"error": "Bad Request"}));
        assert_eq!(body_json(not_found("", None)).await, json!({"error": "Not Found"}));
        assert_eq!(
            body_json(internal_server_error("", None)).await,
            json!({"error": "Internal Server Error"})
        );
        assert_eq!(
            body_json(not_found("no product", None)).await,
            json!({"error": "no product"})
        );
    }

    #[tokio::test]
    async fn test_method_not_allowed_sets_allow() {
        let response = method_not_allowed(&[Method::GET, Method::POST]);
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, POST");
        assert_eq!(body_json(response).await, json!({"error": "Method Not Allowed"}));
    }

    #[tokio::test]
    async fn test_unserializable_value_falls_back() {
        let mut bad = std::collections::HashMap::new();
        bad.insert(vec![1u8], "non-string key");

        let response = write_json(StatusCode::OK, &bad);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({"error": "internal server error"}));
    }
}
