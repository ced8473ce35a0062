//! Defines the route handler for the filtered, paginated transaction list.

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxPushUrl;
use maud::{Markup, html};

use crate::{
    AppState, Error,
    auth::CookieSession,
    debounce::MEMO_SEARCH_DEBOUNCE,
    endpoints,
    html::{
        BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
    pagination::{PageRequest, PaginationConfig, create_pagination_indicators, pagination_view},
    timezone::local_today,
    transaction::{
        category::{Category, TransactionKind},
        filter::KindFilter,
        query::{ListParams, ListQuery},
        service::{TransactionPage, TransactionService},
        store::SqliteRowStore,
        summary::Summary,
        view::{totals_view, transaction_table},
    },
};

/// The state needed for the transaction list and its CSV export.
#[derive(Debug, Clone)]
pub struct TransactionListState {
    pub store: SqliteRowStore,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Tokyo".
    pub local_timezone: String,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: SqliteRowStore::from_ref(state),
            local_timezone: state.local_timezone.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

impl TransactionListState {
    /// Apply the defaults of the configured timezone and pagination to `query`.
    pub(super) fn list_params(&self, query: ListQuery) -> Result<ListParams, Error> {
        let today = local_today(&self.local_timezone).ok_or_else(|| {
            tracing::error!("Invalid timezone {}", self.local_timezone);
            Error::InvalidTimezoneError(self.local_timezone.clone())
        })?;

        Ok(ListParams::from_query(
            query,
            today,
            self.pagination_config.default_page,
        ))
    }
}

fn kind_options(selected: KindFilter) -> Markup {
    let options = [
        (KindFilter::All, "All"),
        (KindFilter::Only(TransactionKind::Expense), "Expense"),
        (KindFilter::Only(TransactionKind::Income), "Income"),
    ];

    html! {
        @for (kind, label) in options {
            option value=(kind.as_str()) selected[kind == selected] { (label) }
        }
    }
}

fn filter_form(params: &ListParams) -> Markup {
    let kind = params.kind();
    let selected_category = params.filter.effective_category();
    let trigger = format!(
        "change, input changed delay:{}ms from:#q",
        MEMO_SEARCH_DEBOUNCE.as_millis()
    );

    html! {
        form
            method="get"
            action=(endpoints::LIST_VIEW)
            hx-get=(endpoints::LIST_VIEW)
            hx-trigger=(trigger)
            hx-target="body"
            hx-push-url="true"
            class="grid grid-cols-2 gap-2 w-full"
        {
            div
            {
                label for="from" class=(FORM_LABEL_STYLE) { "From" }
                input type="month" name="from" id="from" value=(params.from) class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="to" class=(FORM_LABEL_STYLE) { "To" }
                input type="month" name="to" id="to" value=(params.to) class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="type" class=(FORM_LABEL_STYLE) { "Type" }
                select name="type" id="type" class=(FORM_TEXT_INPUT_STYLE)
                {
                    (kind_options(params.filter.kind))
                }
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                select name="category" id="category" disabled[kind.is_none()] class=(FORM_TEXT_INPUT_STYLE)
                {
                    @match kind {
                        Some(kind) => {
                            option value="" { "All categories" }
                            @for category in Category::all(kind) {
                                option value=(category) selected[Some(category) == selected_category] { (category) }
                            }
                        }
                        None => option value="" { "Choose a type first" },
                    }
                }
            }

            div class="col-span-2"
            {
                label for="q" class=(FORM_LABEL_STYLE) { "Memo" }
                input
                    type="search"
                    name="q"
                    id="q"
                    placeholder="Search memos"
                    value=[params.filter.memo_query()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            noscript class="col-span-2"
            {
                button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Apply" }
            }
        }
    }
}

fn transactions_list_view(
    params: &ListParams,
    page: &TransactionPage,
    summary: &Summary,
    max_pages: u64,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::LIST_VIEW).into_html();
    let current_url = params.page_url(endpoints::LIST_VIEW, page.page);
    let export_url = params.filter_url(endpoints::EXPORT_API);
    let indicators = create_pagination_indicators(page.page, page.page_count, max_pages);

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    div class="flex gap-4"
                    {
                        a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE) { "Add Transaction" }
                        a href=(export_url) class=(LINK_STYLE) download { "Export CSV" }
                    }
                }

                (filter_form(params))

                h2 class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "Totals for " (params.from) " to " (params.to)
                }

                (totals_view(summary))

                p class="text-sm text-gray-500 dark:text-gray-400" data-page-status="true"
                {
                    (page.total_count) " transactions, page " (page.page) " / " (page.page_count)
                }

                (transaction_table(&page.transactions, Some(&current_url)))

                (pagination_view(&indicators, |page| params.page_url(endpoints::LIST_VIEW, page)))
            }
        }
    };

    base("Transactions", &content)
}

/// Render one page of the logged in user's transactions with the totals of
/// every transaction that matches the filter.
pub async fn get_transactions_page(
    State(state): State<TransactionListState>,
    session: CookieSession,
    Query(query): Query<ListQuery>,
) -> Result<Response, Error> {
    let params = state.list_params(query)?;
    let request = PageRequest::new(params.page, state.pagination_config.default_page_size);
    let service = TransactionService::new(state.store, session);

    let (page, summary) = tokio::join!(
        service.fetch_page(&params.filter, request),
        service.totals(&params.filter)
    );
    let page = page.inspect_err(|error| tracing::error!("Could not fetch transactions: {error}"))?;
    let summary =
        summary.inspect_err(|error| tracing::error!("Could not total transactions: {error}"))?;

    let view = transactions_list_view(
        &params,
        &page,
        &summary,
        state.pagination_config.max_pages,
    );

    if page.corrected {
        tracing::debug!("Page {} is past the end, showing page {}", params.page, page.page);
        let url = params.page_url(endpoints::LIST_VIEW, page.page);
        return Ok((HxPushUrl(url), view).into_response());
    }

    Ok(view.into_response())
}
