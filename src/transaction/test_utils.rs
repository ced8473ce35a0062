//! An in-memory [RowStore] and HTML assertions shared by the transaction tests.

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum_extra::extract::PrivateCookieJar;
use scraper::{ElementRef, Selector};
use time::{OffsetDateTime, macros::date};

use crate::{
    Error,
    app_state::create_cookie_key,
    auth::{CookieSession, DEFAULT_COOKIE_DURATION, UserID, set_auth_cookie},
    database_id::TransactionId,
    pagination::PageWindow,
    test_utils::{get_test_connection, insert_test_user},
    transaction::{
        core::{NewTransaction, Transaction, TransactionForm},
        filter::{DateRange, TransactionFilter},
        store::{RowStore, SqliteRowStore},
    },
};

#[derive(Debug, Default)]
struct FakeState {
    rows: Mutex<Vec<Transaction>>,
    count_calls: AtomicUsize,
    list_calls: AtomicUsize,
    export_calls: AtomicUsize,
    list_offsets: Mutex<Vec<u64>>,
    fail_count: AtomicBool,
    fail_list: AtomicBool,
    count_delay: Mutex<Duration>,
    list_delay: Mutex<Duration>,
}

/// A [RowStore] that keeps rows in memory and records how it was called.
///
/// Clones share the same rows and counters.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeRowStore {
    state: Arc<FakeState>,
}

impl FakeRowStore {
    pub(crate) fn with_rows(rows: Vec<Transaction>) -> Self {
        let store = Self::default();
        *store.state.rows.lock().unwrap() = rows;
        store
    }

    pub(crate) fn count_calls(&self) -> usize {
        self.state.count_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.state.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn export_calls(&self) -> usize {
        self.state.export_calls.load(Ordering::SeqCst)
    }

    /// The offsets of every list call, in call order.
    pub(crate) fn list_offsets(&self) -> Vec<u64> {
        self.state.list_offsets.lock().unwrap().clone()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.count_calls() + self.list_calls() + self.export_calls()
    }

    pub(crate) fn set_fail_count(&self, fail: bool) {
        self.state.fail_count.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn set_fail_list(&self, fail: bool) {
        self.state.fail_list.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn set_count_delay(&self, delay: Duration) {
        *self.state.count_delay.lock().unwrap() = delay;
    }

    pub(crate) fn set_list_delay(&self, delay: Duration) {
        *self.state.list_delay.lock().unwrap() = delay;
    }

    pub(crate) fn rows(&self) -> Vec<Transaction> {
        self.state.rows.lock().unwrap().clone()
    }

    fn matching(&self, owner: UserID, filter: &TransactionFilter) -> Vec<Transaction> {
        let category = filter.effective_category();
        let memo_query = filter.memo_query().map(str::to_lowercase);

        let mut rows = self
            .rows()
            .into_iter()
            .filter(|row| row.owner == owner)
            .filter(|row| filter.date_range.contains(row.date))
            .filter(|row| filter.kind.kind().is_none_or(|kind| row.kind == kind))
            .filter(|row| category.is_none_or(|category| row.category == category))
            .filter(|row| match &memo_query {
                Some(query) => row
                    .memo
                    .as_deref()
                    .is_some_and(|memo| memo.to_lowercase().contains(query)),
                None => true,
            })
            .collect::<Vec<_>>();

        sort_newest_first(&mut rows);
        rows
    }
}

fn sort_newest_first(rows: &mut [Transaction]) {
    rows.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(b.created_at.cmp(&a.created_at))
            .then(b.id.cmp(&a.id))
    });
}

impl RowStore for FakeRowStore {
    async fn count(&self, owner: UserID, filter: &TransactionFilter) -> Result<u64, Error> {
        self.state.count_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.state.count_delay.lock().unwrap();
        tokio::time::sleep(delay).await;

        if self.state.fail_count.load(Ordering::SeqCst) {
            return Err(Error::QueryError("count failed".to_owned()));
        }

        Ok(self.matching(owner, filter).len() as u64)
    }

    async fn list(
        &self,
        owner: UserID,
        filter: &TransactionFilter,
        window: PageWindow,
    ) -> Result<Vec<Transaction>, Error> {
        self.state.list_calls.fetch_add(1, Ordering::SeqCst);
        self.state.list_offsets.lock().unwrap().push(window.offset);
        let delay = *self.state.list_delay.lock().unwrap();
        tokio::time::sleep(delay).await;

        if self.state.fail_list.load(Ordering::SeqCst) {
            return Err(Error::QueryError("list failed".to_owned()));
        }

        Ok(self
            .matching(owner, filter)
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .collect())
    }

    async fn export(
        &self,
        owner: UserID,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, Error> {
        self.state.export_calls.fetch_add(1, Ordering::SeqCst);

        Ok(self.matching(owner, filter))
    }

    async fn latest(&self, owner: UserID, n: u64) -> Result<Vec<Transaction>, Error> {
        let mut rows = self
            .rows()
            .into_iter()
            .filter(|row| row.owner == owner)
            .collect::<Vec<_>>();
        sort_newest_first(&mut rows);
        rows.truncate(n as usize);

        Ok(rows)
    }

    async fn get(&self, owner: UserID, id: TransactionId) -> Result<Transaction, Error> {
        self.rows()
            .into_iter()
            .find(|row| row.id == id && row.owner == owner)
            .ok_or(Error::NotFound)
    }

    async fn insert(
        &self,
        owner: UserID,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let mut rows = self.state.rows.lock().unwrap();
        let id = rows.iter().map(|row| row.id).max().unwrap_or(0) + 1;
        let inserted = build_transaction(id, owner, transaction);
        rows.push(inserted.clone());

        Ok(inserted)
    }

    async fn update(
        &self,
        owner: UserID,
        id: TransactionId,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let mut rows = self.state.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == id && row.owner == owner)
            .ok_or(Error::UpdateMissingTransaction)?;

        *row = Transaction {
            created_at: row.created_at,
            ..build_transaction(id, owner, transaction)
        };

        Ok(row.clone())
    }

    async fn delete(&self, owner: UserID, id: TransactionId) -> Result<(), Error> {
        let mut rows = self.state.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| !(row.id == id && row.owner == owner));

        if rows.len() == before {
            return Err(Error::DeleteMissingTransaction);
        }

        Ok(())
    }
}

/// A stored transaction with the fields of `transaction`.
///
/// Rows are created one second apart by ID so that their order is stable.
pub(crate) fn build_transaction(
    id: TransactionId,
    owner: UserID,
    transaction: NewTransaction,
) -> Transaction {
    Transaction {
        id,
        owner,
        date: transaction.date,
        kind: transaction.kind,
        amount: transaction.amount,
        category: transaction.category,
        memo: transaction.memo,
        created_at: OffsetDateTime::UNIX_EPOCH + time::Duration::seconds(id),
    }
}

/// The session read from a freshly set auth cookie for `user_id`.
pub(crate) fn logged_in_session(user_id: UserID) -> CookieSession {
    let jar = PrivateCookieJar::new(create_cookie_key("foobar"));
    let jar = set_auth_cookie(jar, user_id, DEFAULT_COOKIE_DURATION)
        .expect("Could not set auth cookie");

    CookieSession::from_jar(&jar)
}

/// A session read from a request without an auth cookie.
pub(crate) fn logged_out_session() -> CookieSession {
    CookieSession::from_jar(&PrivateCookieJar::new(create_cookie_key("foobar")))
}

/// A SQLite store over an in-memory database with one registered user.
pub(crate) fn get_sqlite_store() -> (SqliteRowStore, UserID) {
    let connection = get_test_connection();
    let user = insert_test_user("test@example.com", "hunter2", &connection);

    (
        SqliteRowStore::new(Arc::new(Mutex::new(connection))),
        user.id,
    )
}

/// Every transaction `owner` has in `store`, newest first.
pub(crate) async fn stored_transactions(store: &SqliteRowStore, owner: UserID) -> Vec<Transaction> {
    let everything = TransactionFilter::new(DateRange {
        start: date!(1900 - 01 - 01),
        end: date!(2999 - 12 - 31),
    });

    store
        .export(owner, &everything)
        .await
        .expect("Could not export transactions")
}

/// Form data as the browser would submit it.
pub(crate) fn raw_form(
    date: &str,
    kind: &str,
    category: &str,
    amount: &str,
    memo: &str,
) -> TransactionForm {
    TransactionForm {
        date: date.to_owned(),
        kind: kind.to_owned(),
        category: category.to_owned(),
        amount: amount.to_owned(),
        memo: memo.to_owned(),
    }
}

/// Check the two kind radio buttons of a transaction form.
#[track_caller]
pub(crate) fn assert_kind_inputs(form: &ElementRef, checked_kind: &str) {
    let selector = Selector::parse("input[type=radio][name=kind]").unwrap();
    let inputs = form.select(&selector).collect::<Vec<_>>();

    let values = inputs
        .iter()
        .filter_map(|input| input.value().attr("value"))
        .collect::<Vec<_>>();
    assert_eq!(values, ["expense", "income"], "want expense/income radio buttons");

    let checked = inputs
        .iter()
        .filter(|input| input.value().attr("checked").is_some())
        .filter_map(|input| input.value().attr("value"))
        .collect::<Vec<_>>();
    assert_eq!(checked, [checked_kind], "want only {checked_kind} checked");
}

/// Check the options of the category select and which one is selected.
#[track_caller]
pub(crate) fn assert_category_options(form: &ElementRef, want_labels: &[&str], selected: &str) {
    let selector = Selector::parse("select[name=category] option").unwrap();
    let options = form.select(&selector).collect::<Vec<_>>();

    let labels = options
        .iter()
        .filter_map(|option| option.value().attr("value"))
        .collect::<Vec<_>>();
    assert_eq!(labels, want_labels);

    let got_selected = options
        .iter()
        .filter(|option| option.value().attr("selected").is_some())
        .filter_map(|option| option.value().attr("value"))
        .collect::<Vec<_>>();
    assert_eq!(got_selected, [selected], "want {selected} selected");
}
