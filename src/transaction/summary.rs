//! Totals and per-category breakdowns over a list of transactions.

use crate::transaction::{
    category::{Category, TransactionKind},
    core::Transaction,
};

/// The sum of the transactions in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: Category,
    /// The sum of the amounts, in whole yen.
    pub total: i64,
}

/// Totals derived from a list of transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// The sum of all income.
    pub income_total: i64,
    /// The sum of all expenses.
    pub expense_total: i64,
    /// Income minus expenses, may be negative.
    pub balance: i64,
    /// Income per category, largest first.
    pub income_by_category: Vec<CategoryTotal>,
    /// Expenses per category, largest first.
    pub expense_by_category: Vec<CategoryTotal>,
}

/// Reduce `transactions` to totals and per-category breakdowns.
///
/// Sums saturate at the bounds of `i64` instead of overflowing.
///
/// The order of `transactions` only matters for categories with equal
/// totals, which keep the order in which they were first encountered.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut income_by_category = Vec::new();
    let mut expense_by_category = Vec::new();

    for transaction in transactions {
        let totals = match transaction.kind {
            TransactionKind::Income => &mut income_by_category,
            TransactionKind::Expense => &mut expense_by_category,
        };

        add_to_category(totals, transaction.category, transaction.amount);
    }

    let income_total = saturating_sum(&income_by_category);
    let expense_total = saturating_sum(&expense_by_category);

    // Vec::sort_by is stable, so ties keep encounter order.
    income_by_category.sort_by(|a, b| b.total.cmp(&a.total));
    expense_by_category.sort_by(|a, b| b.total.cmp(&a.total));

    Summary {
        income_total,
        expense_total,
        balance: income_total.saturating_sub(expense_total),
        income_by_category,
        expense_by_category,
    }
}

fn add_to_category(totals: &mut Vec<CategoryTotal>, category: Category, amount: i64) {
    match totals.iter_mut().find(|total| total.category == category) {
        Some(total) => total.total = total.total.saturating_add(amount),
        None => totals.push(CategoryTotal {
            category,
            total: amount,
        }),
    }
}

fn saturating_sum(totals: &[CategoryTotal]) -> i64 {
    totals
        .iter()
        .fold(0, |sum, total| sum.saturating_add(total.total))
}
