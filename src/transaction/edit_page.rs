//! Defines the route handler for the page for editing a transaction.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    auth::{CookieSession, normalize_redirect_url},
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, link, loading_spinner},
    navigation::NavBar,
    transaction::{
        core::Transaction,
        form::{FormValues, transaction_form_fields},
        service::TransactionService,
        store::SqliteRowStore,
    },
};

/// Where to go once the edit is saved or cancelled.
#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

impl RedirectQuery {
    /// The redirect URL if it stays on this site.
    pub fn safe_redirect_url(&self) -> Option<String> {
        self.redirect_url.as_deref().and_then(normalize_redirect_url)
    }
}

/// The URL of the endpoint that saves `transaction_id`, keeping `redirect_url`.
fn update_url(transaction_id: TransactionId, redirect_url: Option<&str>) -> String {
    let endpoint = format_endpoint(endpoints::TRANSACTION, transaction_id);

    match redirect_url.map(|url| serde_urlencoded::to_string([("redirect_url", url)])) {
        Some(Ok(query)) => format!("{endpoint}?{query}"),
        Some(Err(error)) => {
            tracing::warn!("Could not encode redirect URL: {error}");
            endpoint
        }
        None => endpoint,
    }
}

fn edit_transaction_view(transaction: &Transaction, redirect_url: Option<&str>) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html();
    let fields = transaction_form_fields(&FormValues::from_transaction(transaction));
    let cancel_url = redirect_url.unwrap_or(endpoints::LIST_VIEW);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_url(transaction.id, redirect_url))
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Transaction" }

                (fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (loading_spinner()) }
                    " Save"
                }

                p class="text-sm text-center" { (link(cancel_url, "Cancel")) }
            }
        }
    };

    base("Edit Transaction", &content)
}

/// Renders the page for editing one of the logged in user's transactions.
///
/// Transactions of other users are reported as not found.
pub async fn get_edit_transaction_page(
    State(store): State<SqliteRowStore>,
    session: CookieSession,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<RedirectQuery>,
) -> Result<Response, Error> {
    let transaction = TransactionService::new(store, session)
        .get(transaction_id)
        .await
        .inspect_err(|error| {
            tracing::debug!("Could not get transaction {transaction_id}: {error}")
        })?;
    let redirect_url = query.safe_redirect_url();

    Ok(edit_transaction_view(&transaction, redirect_url.as_deref()).into_response())
}
