//! The row store that holds transactions, and its SQLite implementation.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, params_from_iter, types::Value};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    database_id::TransactionId,
    pagination::PageWindow,
    transaction::{
        core::{NewTransaction, TRANSACTION_COLUMNS, Transaction, map_transaction_row},
        filter::TransactionFilter,
    },
};

/// Stores transactions and answers filtered queries over them.
///
/// Every operation is scoped to `owner`: rows owned by other users are never
/// counted, returned or modified. Lists are ordered newest first: by date,
/// then by creation time, then by ID.
pub trait RowStore: Send + Sync {
    /// The number of `owner`'s transactions matching `filter`.
    fn count(
        &self,
        owner: UserID,
        filter: &TransactionFilter,
    ) -> impl Future<Output = Result<u64, Error>> + Send;

    /// The transactions matching `filter` within `window`.
    fn list(
        &self,
        owner: UserID,
        filter: &TransactionFilter,
        window: PageWindow,
    ) -> impl Future<Output = Result<Vec<Transaction>, Error>> + Send;

    /// Every transaction matching `filter`.
    fn export(
        &self,
        owner: UserID,
        filter: &TransactionFilter,
    ) -> impl Future<Output = Result<Vec<Transaction>, Error>> + Send;

    /// The `n` most recent transactions, regardless of date.
    fn latest(
        &self,
        owner: UserID,
        n: u64,
    ) -> impl Future<Output = Result<Vec<Transaction>, Error>> + Send;

    /// The transaction with `id`.
    ///
    /// Fails with [Error::NotFound] if it does not exist or belongs to
    /// another user.
    fn get(
        &self,
        owner: UserID,
        id: TransactionId,
    ) -> impl Future<Output = Result<Transaction, Error>> + Send;

    /// Store a new transaction. The store assigns the ID and creation time.
    fn insert(
        &self,
        owner: UserID,
        transaction: NewTransaction,
    ) -> impl Future<Output = Result<Transaction, Error>> + Send;

    /// Replace the editable fields of the transaction with `id`.
    ///
    /// Fails with [Error::UpdateMissingTransaction] if there is no such
    /// transaction for `owner`.
    fn update(
        &self,
        owner: UserID,
        id: TransactionId,
        transaction: NewTransaction,
    ) -> impl Future<Output = Result<Transaction, Error>> + Send;

    /// Delete the transaction with `id`.
    ///
    /// Fails with [Error::DeleteMissingTransaction] if there is no such
    /// transaction for `owner`.
    fn delete(
        &self,
        owner: UserID,
        id: TransactionId,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

const ORDER_NEWEST_FIRST: &str = "ORDER BY date DESC, created_at DESC, id DESC";

/// Stores transactions in a SQLite database.
///
/// The user table must exist in the same database, see [crate::initialize_db].
#[derive(Debug, Clone)]
pub struct SqliteRowStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteRowStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire the database lock: {error}");
            Error::DatabaseLockError
        })
    }

    fn select(
        &self,
        owner: UserID,
        filter: &TransactionFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<Transaction>, Error> {
        let (where_clause, mut parameters) = build_where_clause(owner, filter);
        let mut query = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" {where_clause} {ORDER_NEWEST_FIRST}"
        );

        if let Some(window) = window {
            query.push_str(&format!(
                " LIMIT ?{} OFFSET ?{}",
                parameters.len() + 1,
                parameters.len() + 2
            ));
            parameters.push(to_sql_integer(window.limit));
            parameters.push(to_sql_integer(window.offset));
        }

        self.lock()?
            .prepare(&query)?
            .query_map(params_from_iter(parameters.iter()), map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }
}

fn to_sql_integer(value: u64) -> Value {
    Value::Integer(i64::try_from(value).unwrap_or(i64::MAX))
}

/// Escape the LIKE wildcards in `query` so that they match literally.
///
/// The escape character is `\`, see the `ESCAPE` clause in [build_where_clause].
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());

    for character in query.chars() {
        if matches!(character, '%' | '_' | '\\') {
            escaped.push('\\');
        }

        escaped.push(character);
    }

    escaped
}

/// Translate `filter` into a SQL `WHERE` clause and its positional parameters.
fn build_where_clause(owner: UserID, filter: &TransactionFilter) -> (String, Vec<Value>) {
    let mut where_clause_parts = vec!["user_id = ?1".to_owned()];
    let mut parameters = vec![Value::Integer(owner.as_i64())];

    where_clause_parts.push(format!(
        "date BETWEEN ?{} AND ?{}",
        parameters.len() + 1,
        parameters.len() + 2
    ));
    parameters.push(Value::Text(filter.date_range.start.to_string()));
    parameters.push(Value::Text(filter.date_range.end.to_string()));

    if let Some(kind) = filter.kind.kind() {
        where_clause_parts.push(format!("kind = ?{}", parameters.len() + 1));
        parameters.push(Value::Text(kind.as_str().to_owned()));
    }

    if let Some(category) = filter.effective_category() {
        where_clause_parts.push(format!("category = ?{}", parameters.len() + 1));
        parameters.push(Value::Text(category.as_str().to_owned()));
    }

    if let Some(memo_query) = filter.memo_query() {
        // SQLite's LIKE ignores case for ASCII letters only.
        where_clause_parts.push(format!(
            "memo LIKE ?{} ESCAPE '\\'",
            parameters.len() + 1
        ));
        parameters.push(Value::Text(format!("%{}%", escape_like(memo_query))));
    }

    (
        format!("WHERE {}", where_clause_parts.join(" AND ")),
        parameters,
    )
}

impl RowStore for SqliteRowStore {
    async fn count(&self, owner: UserID, filter: &TransactionFilter) -> Result<u64, Error> {
        let (where_clause, parameters) = build_where_clause(owner, filter);
        let query = format!("SELECT COUNT(*) FROM \"transaction\" {where_clause}");

        let count: i64 = self
            .lock()?
            .prepare(&query)?
            .query_row(params_from_iter(parameters.iter()), |row| row.get(0))?;

        Ok(count.max(0) as u64)
    }

    async fn list(
        &self,
        owner: UserID,
        filter: &TransactionFilter,
        window: PageWindow,
    ) -> Result<Vec<Transaction>, Error> {
        self.select(owner, filter, Some(window))
    }

    async fn export(
        &self,
        owner: UserID,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, Error> {
        self.select(owner, filter, None)
    }

    async fn latest(&self, owner: UserID, n: u64) -> Result<Vec<Transaction>, Error> {
        let query = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE user_id = ?1 \
            {ORDER_NEWEST_FIRST} LIMIT ?2"
        );

        self.lock()?
            .prepare(&query)?
            .query_map(
                params_from_iter([Value::Integer(owner.as_i64()), to_sql_integer(n)]),
                map_transaction_row,
            )?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    async fn get(&self, owner: UserID, id: TransactionId) -> Result<Transaction, Error> {
        let query = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = ?1 AND user_id = ?2"
        );

        let transaction = self
            .lock()?
            .prepare(&query)?
            .query_row((id, owner.as_i64()), map_transaction_row)?;

        Ok(transaction)
    }

    async fn insert(
        &self,
        owner: UserID,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let query = format!(
            "INSERT INTO \"transaction\" (user_id, date, kind, amount, category, memo, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING {TRANSACTION_COLUMNS}"
        );

        let transaction = self.lock()?.prepare(&query)?.query_row(
            (
                owner.as_i64(),
                transaction.date,
                transaction.kind.as_str(),
                transaction.amount,
                transaction.category.as_str(),
                transaction.memo,
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )?;

        Ok(transaction)
    }

    async fn update(
        &self,
        owner: UserID,
        id: TransactionId,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let query = format!(
            "UPDATE \"transaction\"
            SET date = ?1, kind = ?2, amount = ?3, category = ?4, memo = ?5
            WHERE id = ?6 AND user_id = ?7
            RETURNING {TRANSACTION_COLUMNS}"
        );

        self.lock()?
            .prepare(&query)?
            .query_row(
                (
                    transaction.date,
                    transaction.kind.as_str(),
                    transaction.amount,
                    transaction.category.as_str(),
                    transaction.memo,
                    id,
                    owner.as_i64(),
                ),
                map_transaction_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
                error => error.into(),
            })
    }

    async fn delete(&self, owner: UserID, id: TransactionId) -> Result<(), Error> {
        let rows_affected = self.lock()?.execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            (id, owner.as_i64()),
        )?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingTransaction);
        }

        Ok(())
    }
}
