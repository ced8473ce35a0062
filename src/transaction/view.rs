//! HTML shared by the pages that show transactions and their totals.

use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, LINK_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_yen,
    },
    transaction::{
        category::TransactionKind,
        core::Transaction,
        summary::{CategoryTotal, Summary},
    },
};

fn kind_class(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Expense => "text-red-700 dark:text-red-300",
        TransactionKind::Income => "text-green-700 dark:text-green-300",
    }
}

fn balance_class(balance: i64) -> &'static str {
    if balance < 0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    }
}

/// Income, expense and balance side by side.
pub(crate) fn totals_view(summary: &Summary) -> Markup {
    let cell = "flex flex-col items-center px-4 py-3 rounded bg-white dark:bg-gray-800 shadow-sm";

    html! {
        dl class="grid grid-cols-3 gap-2 w-full" data-totals="true"
        {
            div class=(cell)
            {
                dt class="text-xs text-gray-500 dark:text-gray-400" { "Income" }
                dd class="text-lg font-semibold" data-total="income" { (format_yen(summary.income_total)) }
            }

            div class=(cell)
            {
                dt class="text-xs text-gray-500 dark:text-gray-400" { "Expense" }
                dd class="text-lg font-semibold" data-total="expense" { (format_yen(summary.expense_total)) }
            }

            div class=(cell)
            {
                dt class="text-xs text-gray-500 dark:text-gray-400" { "Balance" }
                dd class={ "text-lg font-semibold " (balance_class(summary.balance)) } data-total="balance"
                {
                    (format_yen(summary.balance))
                }
            }
        }
    }
}

/// One card listing the totals per category, largest first.
pub(crate) fn category_breakdown_view(title: &str, totals: &[CategoryTotal]) -> Markup {
    let grand_total: i64 = totals.iter().map(|total| total.total).sum();

    html! {
        section class="w-full rounded bg-white dark:bg-gray-800 shadow-sm p-4"
        {
            h3 class="text-base font-semibold mb-2" { (title) }

            @if totals.is_empty() {
                p class="text-sm text-gray-500 dark:text-gray-400" { "Nothing recorded yet." }
            } @else {
                ul class="space-y-1"
                {
                    @for total in totals {
                        li class="flex justify-between text-sm" data-category=(total.category)
                        {
                            span class=(CATEGORY_BADGE_STYLE) { (total.category) }
                            span class="tabular-nums"
                            {
                                (format_yen(total.total))
                                @if grand_total > 0 {
                                    span class="ml-2 text-xs text-gray-500"
                                    {
                                        (total.total * 100 / grand_total) "%"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// The edit page URL for `transaction_id` that returns to `redirect_url` when done.
fn edit_url(transaction_id: i64, redirect_url: &str) -> String {
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction_id);

    match serde_urlencoded::to_string([("redirect_url", redirect_url)]) {
        Ok(query) => format!("{edit_url}?{query}"),
        Err(error) => {
            tracing::warn!("Could not encode redirect URL {redirect_url}: {error}");
            edit_url
        }
    }
}

fn transaction_row(transaction: &Transaction, redirect_url: Option<&str>) -> Markup {
    let amount = match transaction.kind {
        TransactionKind::Expense => -transaction.amount,
        TransactionKind::Income => transaction.amount,
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE) { time datetime=(transaction.date) { (transaction.date) } }
            td class=(TABLE_CELL_STYLE) { (transaction.kind.label()) }
            td class=(TABLE_CELL_STYLE) { span class=(CATEGORY_BADGE_STYLE) { (transaction.category) } }
            td class={ "px-6 py-4 text-right tabular-nums " (kind_class(transaction.kind)) }
            {
                (format_yen(amount))
            }
            td class=(TABLE_CELL_STYLE) { (transaction.memo.as_deref().unwrap_or("")) }

            @if let Some(redirect_url) = redirect_url {
                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        a href=(edit_url(transaction.id, redirect_url)) class=(LINK_STYLE) { "Edit" }

                        button
                            type="button"
                            hx-delete=(format_endpoint(endpoints::TRANSACTION, transaction.id))
                            hx-confirm="Are you sure you want to delete this transaction? This cannot be undone."
                            hx-target="closest tr"
                            hx-target-error="#alert-container"
                            hx-swap="outerHTML"
                            class=(BUTTON_DELETE_STYLE)
                        {
                            "Delete"
                        }
                    }
                }
            }
        }
    }
}

/// A table of `transactions`.
///
/// With a `redirect_url` each row gets edit and delete actions, and the edit
/// page returns to `redirect_url`.
pub(crate) fn transaction_table(transactions: &[Transaction], redirect_url: Option<&str>) -> Markup {
    let columns = if redirect_url.is_some() { 6 } else { 5 };

    html! {
        div class="w-full overflow-x-auto"
        {
            table class="w-full my-2 text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-4 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Memo" }
                        @if redirect_url.is_some() {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        (transaction_row(transaction, redirect_url))
                    }

                    @if transactions.is_empty() {
                        tr
                        {
                            td colspan=(columns) data-empty-state="true" class="px-6 py-4 text-center"
                            {
                                "No transactions found."
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        auth::UserID,
        test_utils::{assert_valid_html, select_text},
        transaction::{
            category::{Category, ExpenseCategory, IncomeCategory},
            core::{NewTransaction, Transaction},
            summary::summarize,
            test_utils::build_transaction,
        },
    };

    use super::{category_breakdown_view, totals_view, transaction_table};

    fn transactions() -> Vec<Transaction> {
        vec![
            build_transaction(
                1,
                UserID::new(1),
                NewTransaction::new(
                    date!(2024 - 05 - 02),
                    5000,
                    Category::Income(IncomeCategory::Salary),
                    None,
                )
                .unwrap(),
            ),
            build_transaction(
                2,
                UserID::new(1),
                NewTransaction::new(
                    date!(2024 - 05 - 01),
                    1000,
                    Category::Expense(ExpenseCategory::Food),
                    Some("lunch"),
                )
                .unwrap(),
            ),
        ]
    }

    #[test]
    fn table_rows_show_signed_amounts() {
        let html = Html::parse_fragment(&transaction_table(&transactions(), None).into_string());

        assert_valid_html(&html);
        assert_eq!(
            select_text(&html, "tr[data-transaction-row] td:nth-child(4)"),
            ["¥5,000", "-¥1,000"]
        );
        assert_eq!(
            select_text(&html, "tr[data-transaction-row] td:nth-child(5)"),
            ["", "lunch"]
        );
        assert!(select_text(&html, "button").is_empty());
    }

    #[test]
    fn table_rows_have_actions_with_redirect_url() {
        let markup = transaction_table(&transactions(), Some("/kakeibo/list?page=2"));
        let html = Html::parse_fragment(&markup.into_string());

        let edit_links = html
            .select(&Selector::parse("a").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect::<Vec<_>>();
        assert_eq!(
            edit_links,
            [
                "/kakeibo/transactions/1/edit?redirect_url=%2Fkakeibo%2Flist%3Fpage%3D2",
                "/kakeibo/transactions/2/edit?redirect_url=%2Fkakeibo%2Flist%3Fpage%3D2",
            ]
        );
        let delete_urls = html
            .select(&Selector::parse("button").unwrap())
            .filter_map(|button| button.value().attr("hx-delete"))
            .collect::<Vec<_>>();
        assert_eq!(delete_urls, ["/api/transactions/1", "/api/transactions/2"]);
    }

    #[test]
    fn empty_table_has_empty_state() {
        let html = Html::parse_fragment(&transaction_table(&[], None).into_string());

        assert_eq!(
            select_text(&html, "td[data-empty-state]"),
            ["No transactions found."]
        );
    }

    #[test]
    fn totals_show_negative_balance() {
        let mut transactions = transactions();
        transactions.remove(0);
        let html = Html::parse_fragment(&totals_view(&summarize(&transactions)).into_string());

        assert_eq!(select_text(&html, "dd[data-total=income]"), ["¥0"]);
        assert_eq!(select_text(&html, "dd[data-total=expense]"), ["¥1,000"]);
        assert_eq!(select_text(&html, "dd[data-total=balance]"), ["-¥1,000"]);
    }

    #[test]
    fn breakdown_lists_categories_in_order() {
        let summary = summarize(&transactions());
        let html = Html::parse_fragment(
            &category_breakdown_view("Expenses", &summary.expense_by_category).into_string(),
        );

        assert_eq!(select_text(&html, "li > span:first-child"), ["食費"]);
    }
}
