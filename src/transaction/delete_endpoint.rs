use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    auth::CookieSession,
    database_id::TransactionId,
    transaction::{service::TransactionService, store::SqliteRowStore},
};

/// A route handler for deleting a transaction.
///
/// Responds with nothing but an out-of-band alert, so htmx swaps the table
/// row for an empty body, or with an error alert when the transaction could
/// not be deleted.
pub async fn delete_transaction_endpoint(
    State(store): State<SqliteRowStore>,
    session: CookieSession,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    match TransactionService::new(store, session)
        .delete(transaction_id)
        .await
    {
        // The status code has to be 200 OK or htmx will not remove the table row.
        Ok(()) => Alert::Success {
            message: "Transaction deleted".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use time::macros::date;

    use crate::{
        auth::UserID,
        test_utils::assert_status_ok,
        transaction::{
            category::{Category, ExpenseCategory},
            core::NewTransaction,
            store::RowStore,
            test_utils::{
                get_sqlite_store, logged_in_session, logged_out_session, stored_transactions,
            },
        },
    };

    use super::delete_transaction_endpoint;

    fn lunch() -> NewTransaction {
        NewTransaction::new(
            date!(2025 - 10 - 26),
            800,
            Category::Expense(ExpenseCategory::Food),
            Some("lunch"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn deletes_transaction() {
        let (store, owner) = get_sqlite_store();
        let transaction = store.insert(owner, lunch()).await.unwrap();

        let response = delete_transaction_endpoint(
            State(store.clone()),
            logged_in_session(owner),
            Path(transaction.id),
        )
        .await;

        assert_status_ok(&response);
        assert!(stored_transactions(&store, owner).await.is_empty());
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let (store, owner) = get_sqlite_store();

        let response =
            delete_transaction_endpoint(State(store), logged_in_session(owner), Path(7)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cannot_delete_other_users_transaction() {
        let (store, owner) = get_sqlite_store();
        let transaction = store.insert(owner, lunch()).await.unwrap();

        let response = delete_transaction_endpoint(
            State(store.clone()),
            logged_in_session(UserID::new(owner.as_i64() + 1)),
            Path(transaction.id),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(stored_transactions(&store, owner).await, [transaction]);
    }

    #[tokio::test]
    async fn requires_session() {
        let (store, owner) = get_sqlite_store();
        let transaction = store.insert(owner, lunch()).await.unwrap();

        let response =
            delete_transaction_endpoint(State(store.clone()), logged_out_session(), Path(transaction.id))
                .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(stored_transactions(&store, owner).await.len(), 1);
    }
}
