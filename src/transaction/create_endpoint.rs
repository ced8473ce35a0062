//! Defines the endpoint for recording a new transaction.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    auth::CookieSession,
    endpoints,
    transaction::{
        core::{NewTransaction, TransactionForm},
        service::TransactionService,
        store::SqliteRowStore,
    },
};

/// A route handler for recording a new transaction, redirects to the list on success.
///
/// Invalid input is answered with an alert and never reaches the store.
pub async fn create_transaction_endpoint(
    State(store): State<SqliteRowStore>,
    session: CookieSession,
    Form(form): Form<TransactionForm>,
) -> Response {
    let transaction = match NewTransaction::try_from(form) {
        Ok(transaction) => transaction,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = TransactionService::new(store, session)
        .add(transaction)
        .await
    {
        tracing::error!("could not create transaction: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::LIST_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use time::macros::date;

    use crate::{
        endpoints,
        test_utils::assert_hx_redirect,
        transaction::{
            category::{Category, ExpenseCategory, TransactionKind},
            test_utils::{
                get_sqlite_store, logged_in_session, logged_out_session, raw_form,
                stored_transactions,
            },
        },
    };

    use super::create_transaction_endpoint;

    #[tokio::test]
    async fn creates_transaction_for_session_owner() {
        let (store, owner) = get_sqlite_store();

        let response = create_transaction_endpoint(
            State(store.clone()),
            logged_in_session(owner),
            Form(raw_form("2024-05-01", "expense", "交通費", "1200", " train ")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::LIST_VIEW);
        let transactions = stored_transactions(&store, owner).await;
        assert_eq!(transactions.len(), 1);
        let transaction = &transactions[0];
        assert_eq!(transaction.date, date!(2024 - 05 - 01));
        assert_eq!(transaction.kind, TransactionKind::Expense);
        assert_eq!(
            transaction.category,
            Category::Expense(ExpenseCategory::Transport)
        );
        assert_eq!(transaction.amount, 1200);
        assert_eq!(transaction.memo.as_deref(), Some("train"));
    }

    #[tokio::test]
    async fn rejects_invalid_amount_without_storing() {
        let (store, owner) = get_sqlite_store();

        for amount in ["0", "-5", "12.5", "abc", ""] {
            let response = create_transaction_endpoint(
                State(store.clone()),
                logged_in_session(owner),
                Form(raw_form("2024-05-01", "expense", "食費", amount, "")),
            )
            .await;

            assert_eq!(
                response.status(),
                StatusCode::BAD_REQUEST,
                "want amount {amount:?} rejected"
            );
        }

        assert!(stored_transactions(&store, owner).await.is_empty());
    }

    #[tokio::test]
    async fn rejects_category_of_other_kind() {
        let (store, owner) = get_sqlite_store();

        let response = create_transaction_endpoint(
            State(store.clone()),
            logged_in_session(owner),
            Form(raw_form("2024-05-01", "income", "食費", "1000", "")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(stored_transactions(&store, owner).await.is_empty());
    }

    #[tokio::test]
    async fn rejects_missing_session() {
        let (store, owner) = get_sqlite_store();

        let response = create_transaction_endpoint(
            State(store.clone()),
            logged_out_session(),
            Form(raw_form("2024-05-01", "expense", "食費", "1000", "")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(stored_transactions(&store, owner).await.is_empty());
    }
}
