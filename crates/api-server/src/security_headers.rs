use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

/// Hardening headers on every response.
///
/// The CSP allows inline styles only, which is what the exported HTML report
/// needs; JSON responses load nothing at all.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static("default-src 'none'; style-src 'unsafe-inline'; frame-ancestors 'none'"),
    );
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));
    // Settings responses carry a (masked) key
    headers.insert("cache-control", HeaderValue::from_static("no-store"));

    response
}
