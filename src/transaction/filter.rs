//! The logical filter shared by the count, list and export queries.

use std::fmt::Display;

use time::{Date, Duration, Month};

use crate::{
    Error,
    transaction::category::{Category, TransactionKind},
};

/// Restricts a query to one kind of transaction, or to both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    /// Both expenses and income.
    #[default]
    All,
    /// Only transactions of the given kind.
    Only(TransactionKind),
}

impl KindFilter {
    /// Parse the query text `all`, `expense` or `income`.
    ///
    /// Unknown or empty text is treated as `all`.
    pub fn parse(text: &str) -> Self {
        TransactionKind::parse(text)
            .map(KindFilter::Only)
            .unwrap_or(KindFilter::All)
    }

    /// The query text for this filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            KindFilter::All => "all",
            KindFilter::Only(kind) => kind.as_str(),
        }
    }

    /// The kind to restrict to, or `None` for both.
    pub fn kind(&self) -> Option<TransactionKind> {
        match self {
            KindFilter::All => None,
            KindFilter::Only(kind) => Some(*kind),
        }
    }
}

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// The first date in the range.
    pub start: Date,
    /// The last date in the range.
    pub end: Date,
}

impl DateRange {
    /// Whether `date` falls within the range, ends included.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(Date);

impl YearMonth {
    /// Parse strict `YYYY-MM` text, with the month between 01 and 12.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] for anything else.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidMonth(text.to_owned());
        let bytes = text.as_bytes();

        let is_well_formed = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit);

        if !is_well_formed {
            return Err(invalid());
        }

        let year: i32 = text[..4].parse().map_err(|_| invalid())?;
        let month: u8 = text[5..].parse().map_err(|_| invalid())?;
        let month = Month::try_from(month).map_err(|_| invalid())?;

        Date::from_calendar_date(year, month, 1)
            .map(YearMonth)
            .map_err(|_| invalid())
    }

    /// Parse `text`, or use `fallback` if it is missing or malformed.
    pub fn parse_or(text: Option<&str>, fallback: YearMonth) -> Self {
        text.and_then(|text| Self::parse(text).ok())
            .unwrap_or(fallback)
    }

    /// The month that `date` falls in.
    pub fn from_date(date: Date) -> Self {
        YearMonth(date.saturating_sub(Duration::days(i64::from(date.day()) - 1)))
    }

    /// The first day of the month.
    pub fn first_day(&self) -> Date {
        self.0
    }

    /// The last day of the month.
    pub fn last_day(&self) -> Date {
        let mut day = self.0;

        while let Some(next) = day.next_day().filter(|next| next.month() == self.0.month()) {
            day = next;
        }

        day
    }

    /// The whole month as a date range.
    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.first_day(),
            end: self.last_day(),
        }
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.0.year(), u8::from(self.0.month()))
    }
}

/// The dates from the first day of the earlier month through the last day of
/// the later month. The months may be given in either order.
pub fn month_range_to_date_range(from: YearMonth, to: YearMonth) -> DateRange {
    let (earlier, later) = if from <= to { (from, to) } else { (to, from) };

    DateRange {
        start: earlier.first_day(),
        end: later.last_day(),
    }
}

/// Which of the current user's transactions a query should match.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFilter {
    /// Only transactions dated within this range.
    pub date_range: DateRange,
    /// Only transactions of this kind.
    pub kind: KindFilter,
    /// The requested category label, as supplied by the caller.
    ///
    /// Use [TransactionFilter::effective_category] to decide whether it applies.
    pub category: Option<String>,
    /// Text to search for in memos, case-insensitively.
    pub memo_query: Option<String>,
}

impl TransactionFilter {
    /// A filter matching every transaction in `date_range`.
    pub fn new(date_range: DateRange) -> Self {
        Self {
            date_range,
            kind: KindFilter::All,
            category: None,
            memo_query: None,
        }
    }

    /// The category that restricts the query, if any.
    ///
    /// A category only applies when the filter is restricted to one kind and
    /// the label belongs to that kind's vocabulary.
    pub fn effective_category(&self) -> Option<Category> {
        let kind = self.kind.kind()?;
        let label = self.category.as_deref()?;

        Category::parse(kind, label).ok()
    }

    /// The trimmed memo query, or `None` if it is blank.
    pub fn memo_query(&self) -> Option<&str> {
        self.memo_query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
    }
}
