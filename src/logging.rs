//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{StatusCode, header::CONTENT_TYPE, request, response},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Form fields whose values never reach the logs.
const REDACTED_FIELDS: [&str; 2] = ["password", "confirm_password"];
const REDACTED_VALUE: &str = "********";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Bodies longer than this many bytes are cut short in the `info` log.
const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both are logged at the `info` level with the bodies truncated to
/// [LOG_BODY_LENGTH_LIMIT] bytes; the full bodies go to the `debug` level.
/// Password fields of form submissions are redacted before logging.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Some(body_text) = read_body(body).await else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    if is_form(&parts) {
        log_request(&parts, &redact_form_fields(&body_text));
    } else {
        log_request(&parts, &body_text);
    }

    let response = next.run(Request::from_parts(parts, body_text.into())).await;

    let (parts, body) = response.into_parts();
    let Some(body_text) = read_body(body).await else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    log_response(&parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

fn is_form(parts: &request::Parts) -> bool {
    parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE))
}

async fn read_body(body: Body) -> Option<String> {
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).to_string()),
        Err(error) => {
            tracing::error!("Could not read body for logging: {error}");
            None
        }
    }
}

/// Replace the values of [REDACTED_FIELDS] in URL encoded `form_text`.
fn redact_form_fields(form_text: &str) -> String {
    form_text
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, _)) if REDACTED_FIELDS.contains(&name) => {
                format!("{name}={REDACTED_VALUE}")
            }
            _ => pair.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// The longest prefix of `text` that fits in [LOG_BODY_LENGTH_LIMIT] bytes
/// without splitting a character, or `None` if `text` already fits.
fn truncate_body(text: &str) -> Option<&str> {
    if text.len() <= LOG_BODY_LENGTH_LIMIT {
        return None;
    }

    let end = text
        .char_indices()
        .map(|(index, _)| index)
        .take_while(|index| *index <= LOG_BODY_LENGTH_LIMIT)
        .last()
        .unwrap_or(0);

    Some(&text[..end])
}

fn log_request(parts: &request::Parts, body: &str) {
    match truncate_body(body) {
        Some(prefix) => {
            tracing::info!("Received request: {parts:#?}\nbody: {prefix}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {parts:#?}\nbody: {body:?}"),
    }
}

fn log_response(parts: &response::Parts, body: &str) {
    match truncate_body(body) {
        Some(prefix) => {
            tracing::info!("Sending response: {parts:#?}\nbody: {prefix}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {parts:#?}\nbody: {body:?}"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, middleware, routing::post};
    use axum_test::TestServer;

    use super::{LOG_BODY_LENGTH_LIMIT, logging_middleware, redact_form_fields, truncate_body};

    #[test]
    fn redacts_password_fields_only() {
        let got = redact_form_fields(
            "email=a%40example.com&password=hunter2&confirm_password=hunter2&remember_me=on",
        );

        assert_eq!(
            got,
            "email=a%40example.com&password=********&confirm_password=********&remember_me=on"
        );
    }

    #[test]
    fn leaves_other_forms_alone() {
        let form = "date=2024-05-01&kind=expense&category=%E9%A3%9F%E8%B2%BB&amount=1000";

        assert_eq!(redact_form_fields(form), form);
    }

    #[test]
    fn short_bodies_are_not_truncated() {
        assert_eq!(truncate_body("ok"), None);
        assert_eq!(truncate_body(&"a".repeat(LOG_BODY_LENGTH_LIMIT)), None);
    }

    #[test]
    fn truncates_on_character_boundary() {
        let text = "食費".repeat(LOG_BODY_LENGTH_LIMIT);

        let prefix = truncate_body(&text).expect("want a truncated body");

        assert!(prefix.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(text.starts_with(prefix));
        assert!(!prefix.is_empty());
    }

    #[tokio::test]
    async fn passes_body_through_unchanged() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app);

        let response = server
            .post("/echo")
            .text("email=a%40example.com&password=hunter2")
            .content_type("application/x-www-form-urlencoded")
            .await;

        response.assert_status_ok();
        response.assert_text("email=a%40example.com&password=hunter2");
    }
}
