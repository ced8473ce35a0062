//! The fields shared by the new and edit transaction forms, and the endpoint
//! that swaps the category options when the kind changes.

use axum::{
    extract::Query,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::{
        category::{Category, TransactionKind},
        core::{MAX_AMOUNT, Transaction},
    },
};

/// The id of the element that wraps the category select.
const CATEGORY_SELECT_ID: &str = "category-select";

/// The values a transaction form starts out with.
pub(super) struct FormValues<'a> {
    pub category: Category,
    pub amount: Option<i64>,
    pub date: Date,
    pub memo: Option<&'a str>,
}

impl<'a> FormValues<'a> {
    /// An empty expense on `date`.
    pub fn blank(date: Date) -> Self {
        Self {
            category: Category::default_for(TransactionKind::Expense),
            amount: None,
            date,
            memo: None,
        }
    }

    pub fn from_transaction(transaction: &'a Transaction) -> Self {
        Self {
            category: transaction.category,
            amount: Some(transaction.amount),
            date: transaction.date,
            memo: transaction.memo.as_deref(),
        }
    }
}

fn kind_radio(kind: TransactionKind, checked: bool) -> Markup {
    let id = format!("kind-{kind}");
    let target = format!("#{CATEGORY_SELECT_ID}");

    html! {
        div class="flex items-center gap-3"
        {
            input
                name="kind"
                id=(id)
                type="radio"
                value=(kind.as_str())
                checked[checked]
                required
                hx-get=(endpoints::CATEGORIES_API)
                hx-trigger="change"
                hx-target=(target)
                hx-swap="outerHTML"
                class=(FORM_RADIO_INPUT_STYLE);

            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (kind.label()) }
        }
    }
}

/// The category select for `selected`'s kind, with `selected` chosen.
fn category_select(selected: Category) -> Markup {
    html! {
        div id=(CATEGORY_SELECT_ID)
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            select name="category" id="category" required class=(FORM_TEXT_INPUT_STYLE)
            {
                @for category in Category::all(selected.kind()) {
                    option value=(category) selected[category == selected] { (category) }
                }
            }
        }
    }
}

pub(super) fn transaction_form_fields(values: &FormValues<'_>) -> Markup {
    let kind = values.category.kind();

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                @for option in TransactionKind::ALL {
                    (kind_radio(option, option == kind))
                }
            }
        }

        (category_select(values.category))

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount (¥)" }

            input
                name="amount"
                id="amount"
                type="number"
                inputmode="numeric"
                step="1"
                min="1"
                max=(MAX_AMOUNT)
                placeholder="0"
                required
                autofocus
                value=[values.amount]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                value=(values.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="memo" class=(FORM_LABEL_STYLE) { "Memo" }

            input
                name="memo"
                id="memo"
                type="text"
                placeholder="Memo"
                value=[values.memo]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    kind: String,
}

/// Render the category select for a newly chosen kind.
///
/// The selection resets to the kind's default so the form never pairs a
/// category with the other kind.
pub async fn get_category_select(Query(query): Query<CategoryQuery>) -> Response {
    match TransactionKind::parse(&query.kind) {
        Ok(kind) => category_select(Category::default_for(kind)).into_response(),
        Err(error) => error.into_alert_response(),
    }
}
