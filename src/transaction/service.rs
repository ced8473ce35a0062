//! The transaction query service: every read and write of transactions goes
//! through here, scoped to the user of the current session.

use crate::{
    Error,
    auth::{SessionProvider, UserID},
    database_id::TransactionId,
    pagination::{PageRequest, PageWindow, max_page},
    transaction::{
        core::{NewTransaction, Transaction},
        filter::TransactionFilter,
        store::RowStore,
        summary::{Summary, summarize},
    },
};

/// One page of a filtered transaction list.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionPage {
    /// The transactions on the page, newest first.
    pub transactions: Vec<Transaction>,
    /// The number of transactions matching the filter across all pages.
    pub total_count: u64,
    /// The page that was actually fetched, which may differ from the request.
    pub page: u64,
    /// The last page, at least 1.
    pub page_count: u64,
    /// The page size.
    pub limit: u64,
    /// Whether the requested page was past the last page and had to be clamped.
    pub corrected: bool,
}

/// Reads and writes the transactions of the logged in user.
///
/// The session is resolved at the start of every operation. Without a
/// session the operation fails with [Error::AuthRequired] and the store is
/// never called.
#[derive(Debug, Clone)]
pub struct TransactionService<S, P> {
    store: S,
    session: P,
}

impl<S, P> TransactionService<S, P>
where
    S: RowStore,
    P: SessionProvider,
{
    pub fn new(store: S, session: P) -> Self {
        Self { store, session }
    }

    fn owner(&self) -> Result<UserID, Error> {
        self.session
            .current_session()
            .map(|session| session.user_id)
            .ok_or(Error::AuthRequired)
    }

    /// The number of transactions matching `filter`.
    pub async fn count(&self, filter: &TransactionFilter) -> Result<u64, Error> {
        let owner = self.owner()?;

        self.store.count(owner, filter).await
    }

    /// At most `limit` transactions matching `filter`, skipping the first `offset`.
    pub async fn list(
        &self,
        filter: &TransactionFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Transaction>, Error> {
        let owner = self.owner()?;
        let window = PageWindow { limit, offset };

        self.store.list(owner, filter, window).await
    }

    /// Every transaction matching `filter`, in list order.
    pub async fn export_all(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, Error> {
        let owner = self.owner()?;

        self.store.export(owner, filter).await
    }

    /// The `n` most recent transactions of any date.
    pub async fn latest(&self, n: u64) -> Result<Vec<Transaction>, Error> {
        let owner = self.owner()?;

        self.store.latest(owner, n).await
    }

    /// Fetch the requested page of transactions matching `filter`.
    ///
    /// The count and the page are fetched concurrently. If the count shows
    /// that the requested page is past the last page, the page is clamped to
    /// the last page and fetched again. The count is never fetched twice.
    ///
    /// # Errors
    /// Fails if either query fails. A failed count fails the whole fetch
    /// without re-fetching the page.
    pub async fn fetch_page(
        &self,
        filter: &TransactionFilter,
        request: PageRequest,
    ) -> Result<TransactionPage, Error> {
        let owner = self.owner()?;

        let (count, transactions) = tokio::join!(
            self.store.count(owner, filter),
            self.store.list(owner, filter, request.window())
        );

        let total_count = count?;
        let page_count = max_page(total_count, request.limit);

        let (page, transactions, corrected) = if request.page > page_count {
            tracing::debug!(
                "page {} is past the last page {page_count}, fetching page {page_count} instead",
                request.page
            );
            let corrected_request = request.with_page(page_count);
            let transactions = self
                .store
                .list(owner, filter, corrected_request.window())
                .await?;

            (corrected_request.page, transactions, true)
        } else {
            (request.page, transactions?, false)
        };

        Ok(TransactionPage {
            transactions,
            total_count,
            page,
            page_count,
            limit: request.limit,
            corrected,
        })
    }

    /// The totals over every transaction matching `filter`, not just one page.
    pub async fn totals(&self, filter: &TransactionFilter) -> Result<Summary, Error> {
        let transactions = self.export_all(filter).await?;

        Ok(summarize(&transactions))
    }

    /// The transaction with `id`.
    pub async fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        let owner = self.owner()?;

        self.store.get(owner, id).await
    }

    /// Record a new transaction for the current user.
    pub async fn add(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let owner = self.owner()?;
        let inserted = self.store.insert(owner, transaction).await?;
        tracing::info!("User {owner} added transaction {}", inserted.id);

        Ok(inserted)
    }

    /// Replace the fields of the transaction with `id`.
    pub async fn update(
        &self,
        id: TransactionId,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let owner = self.owner()?;
        let updated = self.store.update(owner, id, transaction).await?;
        tracing::info!("User {owner} updated transaction {id}");

        Ok(updated)
    }

    /// Delete the transaction with `id`.
    pub async fn delete(&self, id: TransactionId) -> Result<(), Error> {
        let owner = self.owner()?;
        self.store.delete(owner, id).await?;
        tracing::info!("User {owner} deleted transaction {id}");

        Ok(())
    }
}
