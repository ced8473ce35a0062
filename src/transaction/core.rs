//! Defines the transaction model, its validation and the transaction table.

use rusqlite::{Connection, Row, types::Type};
use serde::Deserialize;
use time::{Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    auth::UserID,
    database_id::TransactionId,
    transaction::category::{Category, TransactionKind},
};

/// The text form of transaction dates, e.g. `2024-05-01`.
pub const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// The largest amount a single transaction may have, one trillion yen.
///
/// Keeps the sum of any realistic number of transactions within `i64`.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// An expense or income recorded by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction, assigned by the store.
    pub id: TransactionId,
    /// The user that recorded the transaction.
    pub owner: UserID,
    /// When the money was spent or earned.
    pub date: Date,
    /// Whether money was spent or earned.
    pub kind: TransactionKind,
    /// The amount in whole yen, from 1 to [MAX_AMOUNT].
    pub amount: i64,
    /// A category from the vocabulary of `kind`.
    pub category: Category,
    /// An optional note.
    pub memo: Option<String>,
    /// When the transaction was recorded, assigned by the store.
    pub created_at: OffsetDateTime,
}

/// The raw form data for adding or editing a transaction.
///
/// Every field is kept as text so that bad input can be reported instead of
/// rejected by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionForm {
    /// The date as `YYYY-MM-DD`.
    pub date: String,
    /// `expense` or `income`.
    pub kind: String,
    /// A label from the vocabulary of `kind`.
    #[serde(default)]
    pub category: String,
    /// The amount in whole yen.
    pub amount: String,
    #[serde(default)]
    pub memo: String,
}

/// Validated transaction fields, ready to be inserted or to replace the
/// fields of an existing transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: Date,
    pub kind: TransactionKind,
    pub amount: i64,
    pub category: Category,
    pub memo: Option<String>,
}

impl NewTransaction {
    /// Create validated transaction fields.
    ///
    /// # Errors
    /// Returns an [Error::InvalidAmount] if `amount` is not between 1 and [MAX_AMOUNT].
    ///
    /// The kind of the transaction is taken from `category`, so the pair is
    /// always consistent.
    pub fn new(
        date: Date,
        amount: i64,
        category: Category,
        memo: Option<&str>,
    ) -> Result<Self, Error> {
        if !(1..=MAX_AMOUNT).contains(&amount) {
            return Err(Error::InvalidAmount(amount.to_string()));
        }

        Ok(Self {
            date,
            kind: category.kind(),
            amount,
            category,
            memo: normalize_memo(memo.unwrap_or_default()),
        })
    }
}

impl TryFrom<TransactionForm> for NewTransaction {
    type Error = Error;

    /// Validate the form before any store call is made.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::InvalidKind] if the kind is not `expense` or `income`,
    /// - [Error::InvalidDate] if the date is not `YYYY-MM-DD`,
    /// - [Error::InvalidAmount] if the amount is not a whole number from 1 to [MAX_AMOUNT],
    /// - [Error::MissingCategory] if the category is empty,
    /// - [Error::InvalidCategory] if the category does not belong to the kind.
    fn try_from(form: TransactionForm) -> Result<Self, Self::Error> {
        let kind = TransactionKind::parse(&form.kind)?;
        let date = parse_date(&form.date)?;
        let amount = parse_amount(&form.amount)?;
        let category = Category::parse(kind, &form.category)?;

        Ok(Self {
            date,
            kind,
            amount,
            category,
            memo: normalize_memo(&form.memo),
        })
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

fn parse_amount(text: &str) -> Result<i64, Error> {
    match text.trim().parse::<i64>() {
        Ok(amount) if (1..=MAX_AMOUNT).contains(&amount) => Ok(amount),
        _ => Err(Error::InvalidAmount(text.to_owned())),
    }
}

fn normalize_memo(memo: &str) -> Option<String> {
    let memo = memo.trim();

    if memo.is_empty() {
        None
    } else {
        Some(memo.to_owned())
    }
}

/// Create the transaction table.
///
/// # Errors
/// Returns an error if the table or its index could not be created.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('expense', 'income')),
            amount INTEGER NOT NULL CHECK (amount BETWEEN 1 AND 1000000000000),
            category TEXT NOT NULL,
            memo TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date
            ON \"transaction\"(user_id, date DESC, created_at DESC);",
    )
}

/// The columns read by [map_transaction_row], in order.
pub const TRANSACTION_COLUMNS: &str = "id, user_id, date, kind, amount, category, memo, created_at";

/// Map a database row to a [Transaction].
///
/// The row must contain the columns in [TRANSACTION_COLUMNS], in that order.
///
/// # Errors
/// Returns an error if a column is missing or if the stored kind or category
/// is not part of the vocabulary.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let kind_text: String = row.get(3)?;
    let kind = TransactionKind::parse(&kind_text)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(error)))?;
    let category_text: String = row.get(5)?;
    let category = Category::parse(kind, &category_text)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(error)))?;

    Ok(Transaction {
        id: row.get(0)?,
        owner: UserID::new(row.get(1)?),
        date: row.get(2)?,
        kind,
        amount: row.get(4)?,
        category,
        memo: row.get(6)?,
        created_at: row.get(7)?,
    })
}
