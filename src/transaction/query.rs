//! The query string shared by the transaction list and the CSV export.

use serde::Deserialize;
use time::Date;

use crate::transaction::{
    category::TransactionKind,
    filter::{KindFilter, TransactionFilter, YearMonth, month_range_to_date_range},
};

/// The raw query parameters of the list page and the export endpoint.
///
/// Every parameter is optional and kept as text: missing or malformed
/// values fall back to a default instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// The first month, `YYYY-MM`.
    pub from: Option<String>,
    /// The last month, `YYYY-MM`.
    pub to: Option<String>,
    /// `all`, `expense` or `income`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    /// Text to search for in memos.
    pub q: Option<String>,
    pub page: Option<String>,
}

/// A [ListQuery] with the defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ListParams {
    pub from: YearMonth,
    pub to: YearMonth,
    pub filter: TransactionFilter,
    pub page: u64,
}

impl ListParams {
    /// Apply defaults to `query`: both months default to the month of
    /// `today`, the kind to all and the page to `default_page`.
    pub fn from_query(query: ListQuery, today: Date, default_page: u64) -> Self {
        let this_month = YearMonth::from_date(today);
        let from = YearMonth::parse_or(query.from.as_deref(), this_month);
        let to = YearMonth::parse_or(query.to.as_deref(), this_month);
        let page = query
            .page
            .as_deref()
            .and_then(|page| page.trim().parse::<u64>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(default_page);

        let filter = TransactionFilter {
            date_range: month_range_to_date_range(from, to),
            kind: query.kind.as_deref().map(KindFilter::parse).unwrap_or_default(),
            category: query.category.filter(|category| !category.trim().is_empty()),
            memo_query: query.q,
        };

        Self {
            from,
            to,
            filter,
            page,
        }
    }

    /// The query pairs that reproduce this filter, without the page.
    ///
    /// A category that does not apply to the kind is dropped.
    fn filter_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("from", self.from.to_string()),
            ("to", self.to.to_string()),
            ("type", self.filter.kind.as_str().to_owned()),
        ];

        if let Some(category) = self.filter.effective_category() {
            pairs.push(("category", category.to_string()));
        }

        if let Some(query) = self.filter.memo_query() {
            pairs.push(("q", query.to_owned()));
        }

        pairs
    }

    /// The URL of `route` with this filter and no page.
    pub fn filter_url(&self, route: &str) -> String {
        encode_url(route, self.filter_pairs())
    }

    /// The URL of `route` with this filter on `page`.
    pub fn page_url(&self, route: &str, page: u64) -> String {
        let mut pairs = self.filter_pairs();
        pairs.push(("page", page.to_string()));

        encode_url(route, pairs)
    }

    /// The kind the filter is restricted to, if any.
    pub fn kind(&self) -> Option<TransactionKind> {
        self.filter.kind.kind()
    }
}

fn encode_url(route: &str, pairs: Vec<(&'static str, String)>) -> String {
    match serde_urlencoded::to_string(pairs) {
        Ok(query) => format!("{route}?{query}"),
        Err(error) => {
            tracing::error!("Could not encode list query: {error}");
            route.to_owned()
        }
    }
}
