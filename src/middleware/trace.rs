use axum::http::Request;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The request id set by `SetRequestIdLayer`, or `-` when absent or not ASCII.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
}

pub fn request_span<B>(request: &Request<B>) -> tracing::Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request)
    )
}
