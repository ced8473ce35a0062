//! Page arithmetic and the page indicator shown under paged lists.

use maud::{Markup, html};

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of transactions to display per page when not specified in a request.
    pub default_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 30,
            max_pages: 5,
        }
    }
}

/// A one-based page number and the number of rows per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// The page number, starting at 1.
    pub page: u64,
    /// The maximum number of rows on a page.
    pub limit: u64,
}

impl PageRequest {
    /// Create a page request, treating page 0 as page 1 and a limit of 0 as 1.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// The number of rows before this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// The rows of this page.
    pub fn window(&self) -> PageWindow {
        PageWindow {
            limit: self.limit,
            offset: self.offset(),
        }
    }

    /// The same page size on a different page.
    pub fn with_page(&self, page: u64) -> Self {
        Self::new(page, self.limit)
    }
}

/// The rows of a query to return: at most `limit` rows, skipping the first `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// The maximum number of rows to return.
    pub limit: u64,
    /// The number of rows to skip.
    pub offset: u64,
}

/// The last page for `count` rows at `limit` rows per page.
///
/// There is always at least one page, even when there are no rows.
pub fn max_page(count: u64, limit: u64) -> u64 {
    count.div_ceil(limit.max(1)).max(1)
}

#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

/// Build the indicator for `curr_page` out of `page_count` pages, showing at
/// most `max_pages` page numbers around the current page plus the first and
/// last page.
pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let max_pages = max_pages.max(1);
    let (start, end) = if page_count <= max_pages {
        (1, page_count)
    } else {
        let start = curr_page
            .saturating_sub(max_pages / 2)
            .clamp(1, page_count - max_pages + 1);
        (start, start + max_pages - 1)
    };

    let mut indicators = Vec::new();

    if curr_page > 1 {
        indicators.push(PaginationIndicator::BackButton(curr_page - 1));
    }

    if start > 1 {
        indicators.push(PaginationIndicator::Page(1));
        indicators.push(PaginationIndicator::Ellipsis);
    }

    indicators.extend((start..=end).map(|page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    }));

    if end < page_count {
        indicators.push(PaginationIndicator::Ellipsis);
        indicators.push(PaginationIndicator::Page(page_count));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

/// Render `indicators` as links, using `page_url` to build the link for a page.
pub fn pagination_view(
    indicators: &[PaginationIndicator],
    page_url: impl Fn(u64) -> String,
) -> Markup {
    const LINK: &str = "block px-3 py-2 rounded border border-gray-300 \
        dark:border-gray-600 hover:bg-gray-100 dark:hover:bg-gray-700";
    const CURRENT: &str = "block px-3 py-2 rounded border border-blue-600 \
        bg-blue-50 text-blue-700 dark:bg-blue-900/30 dark:text-blue-200";

    html! {
        nav aria-label="Pagination" class="flex justify-center my-4"
        {
            ul class="flex flex-wrap gap-1 text-sm"
            {
                @for indicator in indicators {
                    li {
                        @match indicator {
                            PaginationIndicator::Page(page) => {
                                a href=(page_url(*page)) class=(LINK) { (page) }
                            }
                            PaginationIndicator::CurrPage(page) => {
                                span aria-current="page" class=(CURRENT) { (page) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class="block px-3 py-2" { "…" }
                            }
                            PaginationIndicator::BackButton(page) => {
                                a href=(page_url(*page)) class=(LINK) { "Back" }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(page_url(*page)) class=(LINK) { "Next" }
                            }
                        }
                    }
                }
            }
        }
    }
}
