//! Cards summarising one month of the ledger.

use maud::{Markup, html};

use crate::transaction::{Summary, YearMonth, category_breakdown_view, totals_view};

/// The month's balance with its income and expense totals, followed by one
/// breakdown card per transaction kind.
pub(super) fn month_summary_cards(month: YearMonth, summary: &Summary) -> Markup {
    html! {
        section class="space-y-4 w-full" data-month=(month)
        {
            h2 class="text-lg font-semibold" { "This month (" (month) ")" }

            (totals_view(summary))

            div class="grid gap-4 md:grid-cols-2"
            {
                (category_breakdown_view("Expenses by category", &summary.expense_by_category))
                (category_breakdown_view("Income by category", &summary.income_by_category))
            }
        }
    }
}
