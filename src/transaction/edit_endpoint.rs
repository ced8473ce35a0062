//! Defines the endpoint for saving changes to a transaction.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    auth::CookieSession,
    database_id::TransactionId,
    endpoints,
    transaction::{
        core::{NewTransaction, TransactionForm},
        edit_page::RedirectQuery,
        service::TransactionService,
        store::SqliteRowStore,
    },
};

/// Replace every field of a transaction, then send the client back to
/// `redirect_url` or the list.
pub async fn edit_transaction_endpoint(
    State(store): State<SqliteRowStore>,
    session: CookieSession,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<RedirectQuery>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let transaction = match NewTransaction::try_from(form) {
        Ok(transaction) => transaction,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = TransactionService::new(store, session)
        .update(transaction_id, transaction)
        .await
    {
        tracing::error!("Could not update transaction {transaction_id}: {error}");
        return error.into_alert_response();
    }

    let redirect_url = query
        .safe_redirect_url()
        .unwrap_or_else(|| endpoints::LIST_VIEW.to_owned());

    (HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response()
}
