use serde::Serialize;

/// Page size used by the list views.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 15;

/// Builds the row of page controls: `Some(n)` is a clickable page number,
/// `None` is an ellipsis for a collapsed gap.
///
/// Up to seven pages are enumerated in full. Beyond that the row keeps the
/// first and last page plus a window of one page around the current one,
/// with exactly one ellipsis per gap and no duplicate numbers.
fn get_pages(total_pages: usize, current_page: usize) -> Vec<Option<usize>> {
    if total_pages == 0 {
        return vec![];
    }

    if total_pages <= 7 {
        return (1..=total_pages).map(Some).collect();
    }

    let mut pages = vec![Some(1)];

    if current_page > 3 {
        pages.push(None);
    }

    let window_start = current_page.saturating_sub(1).max(2);
    let window_end = (current_page + 1).min(total_pages - 1);
    pages.extend((window_start..=window_end).map(Some));

    if current_page + 2 < total_pages {
        pages.push(None);
    }
    pages.push(Some(total_pages));

    pages
}

/// One page of items together with the controls needed to render pagination.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total_pages: usize,
    /// Total number of items across all pages.
    pub total: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize, total: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };

        let pages = get_pages(total_pages, current_page);

        Self {
            items,
            pages,
            page: current_page,
            total_pages,
            total,
        }
    }
}
