//! The home page: this month's totals and the latest transactions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{CookieSession, SessionProvider, get_user_by_id},
    dashboard::cards::month_summary_cards,
    endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    timezone::local_today,
    transaction::{
        SqliteRowStore, Summary, Transaction, TransactionFilter, TransactionService, YearMonth,
        transaction_table,
    },
};

/// How many of the most recent transactions the home page lists.
const LATEST_TRANSACTION_COUNT: u64 = 10;

/// The state needed for displaying the home page.
#[derive(Debug, Clone)]
pub struct HomePageState {
    pub store: SqliteRowStore,
    /// The database connection for looking up the logged in user.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Tokyo".
    pub local_timezone: String,
}

impl FromRef<AppState> for HomePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: SqliteRowStore::from_ref(state),
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn home_view(email: &str, month: YearMonth, summary: &Summary, latest: &[Transaction]) -> Markup {
    let nav_bar = NavBar::new(endpoints::HOME_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="space-y-6 w-full lg:max-w-5xl"
            {
                header
                {
                    h1 class="text-xl font-bold" { "Kakeibo" }
                    p class="text-xs text-gray-500 dark:text-gray-400" data-user-email="true" { (email) }
                }

                (month_summary_cards(month, summary))

                section class="w-full"
                {
                    div class="flex justify-between items-end"
                    {
                        h2 class="text-lg font-semibold" { "Latest transactions" }
                        a href=(endpoints::LIST_VIEW) class=(LINK_STYLE) { "See all" }
                    }

                    (transaction_table(latest, None))
                }
            }
        }
    };

    base("Home", &content)
}

/// Display this month's totals and the latest transactions of the logged in user.
pub async fn get_home_page(
    State(state): State<HomePageState>,
    session: CookieSession,
) -> Result<Response, Error> {
    let Some(current) = session.current_session() else {
        return Err(Error::AuthRequired);
    };

    let today = local_today(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;
    let month = YearMonth::from_date(today);

    let email = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_user_by_id(current.user_id, &connection)?.email.to_string()
    };

    let service = TransactionService::new(state.store, session);
    let filter = TransactionFilter::new(month.date_range());
    let (summary, latest) = tokio::join!(
        service.totals(&filter),
        service.latest(LATEST_TRANSACTION_COUNT)
    );
    let summary =
        summary.inspect_err(|error| tracing::error!("Could not total this month: {error}"))?;
    let latest =
        latest.inspect_err(|error| tracing::error!("Could not get latest transactions: {error}"))?;

    Ok(home_view(&email, month, &summary, &latest).into_response())
}
