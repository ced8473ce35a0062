//! The URIs of the pages and API routes.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}',
//! use [format_endpoint].

/// The root route which redirects to the ledger home page or log in page.
pub const ROOT: &str = "/";
/// The ledger home page: this month's summary and the latest transactions.
pub const HOME_VIEW: &str = "/kakeibo";
/// The filtered, paginated transaction list.
pub const LIST_VIEW: &str = "/kakeibo/list";
/// The page for recording a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/kakeibo/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/kakeibo/transactions/{transaction_id}/edit";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to create users.
pub const USERS: &str = "/api/users";
/// The route to create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route that renders the category options for a transaction kind.
pub const CATEGORIES_API: &str = "/api/categories";
/// The route to download the filtered transactions as CSV.
pub const EXPORT_API: &str = "/api/transactions/export";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// A parameter is the text between a left brace and the next right brace,
/// e.g., '{transaction_id}' in '/api/transactions/{transaction_id}'.
///
/// If no parameter is found in `endpoint_path`, the original path is returned.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{id}{}",
        &endpoint_path[..param_start],
        &endpoint_path[param_end..]
    )
}

#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    #[track_caller]
    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::HOME_VIEW,
            endpoints::LIST_VIEW,
            endpoints::NEW_TRANSACTION_VIEW,
            endpoints::EDIT_TRANSACTION_VIEW,
            endpoints::REGISTER_VIEW,
            endpoints::LOG_IN_VIEW,
            endpoints::INTERNAL_ERROR_VIEW,
            endpoints::STATIC,
            endpoints::LOG_IN_API,
            endpoints::LOG_OUT,
            endpoints::USERS,
            endpoints::TRANSACTIONS_API,
            endpoints::TRANSACTION,
            endpoints::CATEGORIES_API,
            endpoints::EXPORT_API,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
        }
    }

    #[test]
    fn replaces_parameter() {
        let formatted_path = format_endpoint(endpoints::TRANSACTION, 42);

        assert_eq!(formatted_path, "/api/transactions/42");
        assert_endpoint_is_valid_uri(&formatted_path);
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, 7);

        assert_eq!(formatted_path, "/kakeibo/transactions/7/edit");
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        assert_eq!(format_endpoint("/kakeibo/list", 1), "/kakeibo/list");
    }
}
