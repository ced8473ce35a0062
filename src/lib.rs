//! Kakeibo is a web app for keeping a personal household ledger.
//!
//! Users record dated income and expense transactions, each tagged with a
//! category, and review totals, per-category breakdowns and CSV exports over
//! a range of months.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod csv_export;
mod dashboard;
mod database_id;
mod db;
mod debounce;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod pagination;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    CookieSession, PasswordHash, Session, SessionProvider, User, UserID, ValidatedPassword,
};
pub use csv_export::to_csv;
pub use database_id::TransactionId;
pub use db::initialize as initialize_db;
pub use debounce::{Debouncer, MEMO_SEARCH_DEBOUNCE};
pub use logging::logging_middleware;
pub use pagination::{PageRequest, PageWindow, PaginationConfig, max_page};
pub use routing::build_router;
pub use transaction::{
    Category, CategoryTotal, DateRange, ExpenseCategory, IncomeCategory, KindFilter,
    ListSnapshot, NewTransaction, RowStore, SqliteRowStore, Summary, Transaction,
    TransactionFilter, TransactionForm, TransactionKind, TransactionListController,
    TransactionPage, TransactionService, YearMonth, month_range_to_date_range, summarize,
};

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction operation was attempted without an authenticated session.
    ///
    /// Callers should send the client to the log-in page. The operation is
    /// never retried automatically.
    #[error("an authenticated session is required")]
    AuthRequired,

    /// The row store rejected a query (validation, transport or backend fault).
    ///
    /// The string is the store's own description of the failure and should
    /// only be logged, not shown to the client.
    #[error("the row store rejected the query: {0}")]
    QueryError(String),

    /// The amount of a transaction was not a whole number of yen in the allowed range.
    #[error("\"{0}\" is not a valid amount, enter a whole number from 1 to 1,000,000,000,000")]
    InvalidAmount(String),

    /// A transaction was submitted without a category.
    #[error("a category is required")]
    MissingCategory,

    /// The category does not belong to the vocabulary of the transaction kind.
    #[error("\"{1}\" is not a valid category for {0} transactions")]
    InvalidCategory(TransactionKind, String),

    /// A transaction kind other than `expense` or `income` was given.
    #[error("\"{0}\" is not a valid transaction type")]
    InvalidKind(String),

    /// A date string that is not of the form `YYYY-MM-DD`.
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A month string that is not of the form `YYYY-MM`.
    #[error("\"{0}\" is not a valid month, expected YYYY-MM")]
    InvalidMonth(String),

    /// The user provided an invalid combination of email and password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The auth token cookie could not be read or has expired.
    #[error("the auth token is invalid or has expired")]
    InvalidToken,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The user provided a string that does not look like an email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// The email address is already registered to another user.
    #[error("the email address is already in use")]
    DuplicateEmail,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// The CSV writer failed to produce an export.
    #[error("could not write CSV: {0}")]
    CsvExportError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,
}

impl Error {
    /// Whether the error was caught by local validation before any store call.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidAmount(_)
                | Error::MissingCategory
                | Error::InvalidCategory(_, _)
                | Error::InvalidKind(_)
                | Error::InvalidDate(_)
                | Error::InvalidMonth(_)
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::QueryError(error.to_string())
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::AuthRequired => Redirect::to(endpoints::LOG_IN_VIEW).into_response(),
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                        ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            error if error.is_validation_error() => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid transaction".to_owned(),
                    details: error.to_string(),
                },
            ),
            Error::AuthRequired => (
                StatusCode::UNAUTHORIZED,
                Alert::Error {
                    message: "Not logged in".to_owned(),
                    details: "Your session has ended. Log in again to continue.".to_owned(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Transaction not found".to_owned(),
                    details: "The transaction could not be found.".to_owned(),
                },
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update transaction".to_owned(),
                    details: "The transaction could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete transaction".to_owned(),
                    details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                        .to_owned(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
