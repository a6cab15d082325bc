//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of bytes of a body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Some(body) = read_body(body).await else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    log_body("Received request", &parts, &body);

    let response = next.run(Request::from_parts(parts, Body::from(body))).await;

    let (parts, body) = response.into_parts();
    let Some(body) = read_body(body).await else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    log_body("Sending response", &parts, &body);

    Response::from_parts(parts, Body::from(body))
}

async fn read_body(body: Body) -> Option<Bytes> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .inspect_err(|error| tracing::error!("Could not read body: {error}"))
        .ok()
}

fn log_body(message: &str, parts: &impl std::fmt::Debug, body: &[u8]) {
    let text = String::from_utf8_lossy(body);

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "{message}: {parts:#?}\nbody: {}...",
            truncate(&text, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full body: {text:?}");
    } else {
        tracing::info!("{message}: {parts:#?}\nbody: {text:?}");
    }
}

/// Get the longest prefix of `text` that is at most `limit` bytes and ends on
/// a character boundary.
fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }

    let end = (0..=limit)
        .rev()
        .find(|&index| text.is_char_boundary(index))
        .unwrap_or(0);

    &text[..end]
}

#[cfg(test)]
mod tests {
    use axum::{Router, middleware, routing::get};
    use axum_test::TestServer;

    use crate::logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware, truncate};

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("hello", 64), "hello");
    }

    #[test]
    fn truncate_cuts_at_limit() {
        let text = "a".repeat(100);

        assert_eq!(truncate(&text, LOG_BODY_LENGTH_LIMIT).len(), LOG_BODY_LENGTH_LIMIT);
    }

    #[test]
    fn truncate_does_not_split_characters() {
        // "é" is two bytes, so a limit of 3 falls inside the second one.
        assert_eq!(truncate("éé", 3), "é");
    }

    #[tokio::test]
    async fn middleware_passes_body_through() {
        let long_body = "x".repeat(LOG_BODY_LENGTH_LIMIT * 2);
        let expected = long_body.clone();
        let app = Router::new()
            .route("/", get(move || async move { long_body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server.get("/").await;

        response.assert_status_ok();
        response.assert_text(expected);
    }
}
