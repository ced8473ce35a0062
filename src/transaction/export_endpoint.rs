//! Defines the endpoint that downloads the filtered transactions as CSV.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::CookieSession,
    csv_export::to_csv,
    transaction::{
        core::Transaction, query::ListQuery, service::TransactionService,
        transactions_page::TransactionListState,
    },
};

const CSV_HEADER: [&str; 5] = ["Date", "Type", "Category", "Amount", "Memo"];
const CSV_CONTENT_TYPE: &str = "text/csv;charset=utf-8";

fn csv_fields(transaction: &Transaction) -> Vec<String> {
    vec![
        transaction.date.to_string(),
        transaction.kind.label().to_owned(),
        transaction.category.to_string(),
        transaction.amount.to_string(),
        transaction.memo.clone().unwrap_or_default(),
    ]
}

/// Download every transaction matching the list filter, ignoring the page.
pub async fn export_transactions_endpoint(
    State(state): State<TransactionListState>,
    session: CookieSession,
    Query(query): Query<ListQuery>,
) -> Result<Response, Error> {
    let params = state.list_params(query)?;
    let service = TransactionService::new(state.store, session);

    let transactions = service
        .export_all(&params.filter)
        .await
        .inspect_err(|error| tracing::error!("Could not export transactions: {error}"))?;
    let csv = to_csv(&CSV_HEADER, &transactions, csv_fields)?;

    let date_range = params.filter.date_range;
    let filename = format!("kakeibo_{}_{}.csv", date_range.start, date_range.end);
    tracing::debug!("Exporting {} transactions as {filename}", transactions.len());

    Ok((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
