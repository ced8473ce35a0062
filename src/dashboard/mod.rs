//! The ledger home page.
//!
//! Shows the balance, totals and category breakdowns for the current month
//! next to the most recent transactions.

mod cards;
mod handlers;

pub use handlers::{HomePageState, get_home_page};
