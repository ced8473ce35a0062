//! Where to send a user after they log in.
//!
//! The auth guard remembers the page a logged out user asked for in a
//! `redirect_url` query parameter on the log in page.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// Accept only same-site paths, and never the log in page itself.
fn is_safe_redirect_url(path_and_query: &str) -> bool {
    let is_local = path_and_query.starts_with('/') && !path_and_query.starts_with("//");
    let path = path_and_query
        .split_once('?')
        .map_or(path_and_query, |(path, _)| path);

    is_local && path != endpoints::LOG_IN_VIEW
}

fn local_path_and_query(uri: &Uri) -> Option<String> {
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// Reduce `raw_url` to a safe path and query, or `None` if it points off site.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;

    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    local_path_and_query(&uri)
}

/// The log in page URL that returns to the page `request` came from.
///
/// API requests are made by htmx, so the page is read from the
/// `HX-Current-URL` header rather than the request URI.
pub fn build_log_in_redirect_url(request: &Request) -> Option<String> {
    let redirect_target = if request.uri().path().starts_with("/api") {
        redirect_target_from_hx_request(request)?
    } else {
        local_path_and_query(request.uri())?
    };

    build_log_in_redirect_url_from_target(&redirect_target)
}

pub(super) fn build_log_in_redirect_url_from_target(redirect_target: &str) -> Option<String> {
    serde_urlencoded::to_string([("redirect_url", redirect_target)])
        .inspect_err(|error| {
            tracing::error!("Could not encode redirect URL {redirect_target}: {error}")
        })
        .ok()
        .map(|query| format!("{}?{query}", endpoints::LOG_IN_VIEW))
}

fn redirect_target_from_hx_request(request: &Request) -> Option<String> {
    let headers = request.headers();
    let is_hx_request = headers
        .get("hx-request")
        .and_then(|header| header.to_str().ok())
        .is_some_and(|header| header.eq_ignore_ascii_case("true"));

    if !is_hx_request {
        tracing::warn!("Missing HX-Request header for /api request.");
        return None;
    }

    let Some(current_url) = headers
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok())
    else {
        tracing::warn!("Missing HX-Current-URL header for /api request.");
        return None;
    };

    let redirect_url = current_url
        .parse::<Uri>()
        .ok()
        .and_then(|uri| local_path_and_query(&uri));

    if redirect_url.is_none() {
        tracing::warn!("Invalid HX-Current-URL header value: {current_url}");
    }

    redirect_url
}
