//! The ledger: dated income and expense transactions, the queries over them,
//! and the pages and endpoints for recording and reviewing them.
//!
//! Every read and write goes through [TransactionService], which scopes the
//! query to the logged in user and hands it to a [RowStore].

mod category;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod export_endpoint;
mod filter;
mod form;
mod list_controller;
mod query;
mod service;
mod store;
mod summary;
mod transactions_page;
mod view;

#[cfg(test)]
pub(crate) mod test_utils;

pub use category::{Category, ExpenseCategory, IncomeCategory, TransactionKind};
pub use core::{NewTransaction, Transaction, TransactionForm, create_transaction_table};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_new_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use export_endpoint::export_transactions_endpoint;
pub use filter::{DateRange, KindFilter, TransactionFilter, YearMonth, month_range_to_date_range};
pub use form::get_category_select;
pub use list_controller::{ListSnapshot, TransactionListController};
pub use service::{TransactionPage, TransactionService};
pub use store::{RowStore, SqliteRowStore};
pub use summary::{CategoryTotal, Summary, summarize};
pub use transactions_page::get_transactions_page;

pub(crate) use view::{category_breakdown_view, totals_view, transaction_table};
