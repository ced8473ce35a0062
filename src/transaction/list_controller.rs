//! The state behind a filtered, paged transaction list.
//!
//! Every change to the filter or page re-runs the page query and the totals.
//! Each run is tagged with a generation number and only the result of the
//! latest run is published, so a slow response for an old filter can never
//! overwrite the result for the current one.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::watch;

use crate::{
    Error,
    auth::SessionProvider,
    database_id::TransactionId,
    debounce::Debouncer,
    pagination::PageRequest,
    transaction::{
        core::Transaction,
        filter::TransactionFilter,
        service::{TransactionPage, TransactionService},
        store::RowStore,
        summary::Summary,
    },
};

/// What the list currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot {
    /// The generation of the run that produced this snapshot, 0 before the first run.
    pub generation: u64,
    /// The filter the transactions were fetched with.
    pub filter: TransactionFilter,
    /// The transactions on the current page.
    pub transactions: Vec<Transaction>,
    /// The number of transactions matching the filter.
    pub total_count: u64,
    /// The current page, after any correction.
    pub page: u64,
    pub page_count: u64,
    /// Totals over every transaction matching the filter.
    pub summary: Summary,
    /// The error of the latest run, if it failed.
    ///
    /// The other fields keep the data of the last successful run.
    pub error: Option<Error>,
}

impl ListSnapshot {
    fn empty(filter: TransactionFilter, page: u64) -> Self {
        Self {
            generation: 0,
            filter,
            transactions: Vec::new(),
            total_count: 0,
            page,
            page_count: 1,
            summary: Summary::default(),
            error: None,
        }
    }
}

#[derive(Debug)]
struct ListQuery {
    filter: TransactionFilter,
    request: PageRequest,
}

struct Inner<S, P> {
    service: TransactionService<S, P>,
    query: Mutex<ListQuery>,
    generation: AtomicU64,
    snapshot: watch::Sender<ListSnapshot>,
}

impl<S, P> Inner<S, P>
where
    S: RowStore,
    P: SessionProvider + Send + Sync,
{
    fn query(&self) -> MutexGuard<'_, ListQuery> {
        self.query.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn refresh(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (filter, request) = {
            let query = self.query();
            (query.filter.clone(), query.request)
        };

        let (page, summary) = tokio::join!(
            self.service.fetch_page(&filter, request),
            self.service.totals(&filter)
        );
        let result = page.and_then(|page| summary.map(|summary| (page, summary)));

        self.snapshot.send_if_modified(|snapshot| {
            if self.generation.load(Ordering::SeqCst) != generation {
                tracing::debug!("Discarding the result of stale list generation {generation}");
                return false;
            }

            match result {
                Ok((page, summary)) => {
                    if page.corrected {
                        self.query().request = request.with_page(page.page);
                    }

                    *snapshot = snapshot_from(generation, filter, page, summary);
                }
                Err(error) => {
                    tracing::error!("Could not fetch the transaction list: {error}");
                    snapshot.generation = generation;
                    snapshot.error = Some(error);
                }
            }

            true
        });
    }
}

fn snapshot_from(
    generation: u64,
    filter: TransactionFilter,
    page: TransactionPage,
    summary: Summary,
) -> ListSnapshot {
    ListSnapshot {
        generation,
        filter,
        transactions: page.transactions,
        total_count: page.total_count,
        page: page.page,
        page_count: page.page_count,
        summary,
        error: None,
    }
}

/// Drives a transaction list: holds the filter and page, re-fetches when
/// they change, and publishes the results as [ListSnapshot]s.
///
/// Must be used from within a tokio runtime.
pub struct TransactionListController<S, P> {
    inner: Arc<Inner<S, P>>,
    memo_debouncer: Debouncer,
}

impl<S, P> TransactionListController<S, P>
where
    S: RowStore + 'static,
    P: SessionProvider + Send + Sync + 'static,
{
    /// Create a controller for `filter` and the page in `request`.
    ///
    /// Nothing is fetched until [TransactionListController::refresh] or one
    /// of the setters is called.
    pub fn new(
        service: TransactionService<S, P>,
        filter: TransactionFilter,
        request: PageRequest,
    ) -> Self {
        let (snapshot, _) = watch::channel(ListSnapshot::empty(filter.clone(), request.page));

        Self {
            inner: Arc::new(Inner {
                service,
                query: Mutex::new(ListQuery { filter, request }),
                generation: AtomicU64::new(0),
                snapshot,
            }),
            memo_debouncer: Debouncer::default(),
        }
    }

    /// Replace the quiet period of the memo search, e.g. for tests.
    pub fn with_memo_debouncer(mut self, debouncer: Debouncer) -> Self {
        self.memo_debouncer = debouncer;
        self
    }

    /// Watch the published snapshots.
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot> {
        self.inner.snapshot.subscribe()
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> ListSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Re-fetch the current page and totals.
    pub async fn refresh(&self) {
        self.inner.refresh().await;
    }

    /// Change the filter and go back to the first page.
    pub async fn set_filter(&self, filter: TransactionFilter) {
        {
            let mut query = self.inner.query();
            query.filter = filter;
            query.request = query.request.with_page(1);
        }

        self.inner.refresh().await;
    }

    /// Go to `page`. Pages past the end are corrected to the last page.
    pub async fn set_page(&self, page: u64) {
        {
            let mut query = self.inner.query();
            query.request = query.request.with_page(page);
        }

        self.inner.refresh().await;
    }

    /// Change the memo search once typing has stopped for the quiet period.
    ///
    /// Each call cancels the search scheduled by the previous call, so a
    /// burst of keystrokes results in one query with the final text.
    pub fn set_memo_query(&self, memo_query: impl Into<String>) {
        let memo_query = memo_query.into();
        let inner = self.inner.clone();

        self.memo_debouncer.call(async move {
            {
                let mut query = inner.query();
                query.filter.memo_query = Some(memo_query);
                query.request = query.request.with_page(1);
            }

            inner.refresh().await;
        });
    }

    /// Delete the transaction with `id` and refresh the list.
    ///
    /// When the deleted transaction was the only one on a page after the
    /// first, the list steps back one page.
    pub async fn delete(&self, id: TransactionId) -> Result<(), Error> {
        self.inner.service.delete(id).await?;

        let empties_page = {
            let snapshot = self.inner.snapshot.borrow();
            snapshot.transactions.len() == 1 && snapshot.transactions[0].id == id
        };

        {
            let mut query = self.inner.query();

            if empties_page && query.request.page > 1 {
                query.request = query.request.with_page(query.request.page - 1);
            }
        }

        self.inner.refresh().await;

        Ok(())
    }
}
