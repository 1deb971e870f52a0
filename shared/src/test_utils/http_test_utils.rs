use axum::body::Body;
use axum::response::Response;
use http::Request;
use http_body_util::BodyExt;
use serde_json::Value;

/// Builds a request with an optional JSON body.
pub fn create_test_request(method: &str, uri: &str, payload: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    match payload {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Builds a JSON request whose body is sent verbatim, e.g. to exercise
/// malformed input.
pub fn create_raw_request(method: &str, uri: &str, raw_body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(raw_body.to_string()))
        .unwrap()
}

pub async fn response_to_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read response body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("response body is not JSON")
}
