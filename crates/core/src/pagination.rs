//! Page-button window calculation.
//!
//! Pure and total: any `(current_page, total_pages)` pair produces a window.
//! An out-of-range current page is clamped for display only; the caller's
//! parameter state is left alone.

use serde::Serialize;

/// Pages on each side of the current page that are always shown.
const SIBLINGS: u32 = 1;

/// Up to this many pages, every page gets a button and no marker is needed.
const SHOW_ALL_THRESHOLD: u32 = 7;

/// One renderable element of the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageToken {
    Page(u32),
    /// Collapsed run of two or more pages.
    Ellipsis,
}

/// Computed pager state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationWindow {
    /// Current page after clamping into `1..=total_pages`.
    pub current_page: u32,
    pub total_pages: u32,
    pub tokens: Vec<PageToken>,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PaginationWindow {
    /// Whether `page` is the one that should render as selected.
    pub fn is_current(&self, page: u32) -> bool {
        page == self.current_page
    }

    /// Page numbers in the window (markers skipped).
    pub fn pages(&self) -> impl Iterator<Item = u32> + '_ {
        self.tokens.iter().filter_map(|token| match token {
            PageToken::Page(page) => Some(*page),
            PageToken::Ellipsis => None,
        })
    }
}

/// Compute the pager for `current_page` (1-indexed) out of `total_pages`.
pub fn pagination_window(current_page: u32, total_pages: u32) -> PaginationWindow {
    if total_pages == 0 {
        return PaginationWindow {
            current_page: 1,
            total_pages,
            tokens: Vec::new(),
            has_previous: false,
            has_next: false,
        };
    }

    let current = current_page.clamp(1, total_pages);

    let tokens = if total_pages <= SHOW_ALL_THRESHOLD {
        (1..=total_pages).map(PageToken::Page).collect()
    } else {
        let start = current.saturating_sub(SIBLINGS).max(1);
        let end = (current + SIBLINGS).min(total_pages);

        let mut anchors: Vec<u32> = Vec::with_capacity(2 * SIBLINGS as usize + 3);
        anchors.push(1);
        anchors.extend(start..=end);
        anchors.push(total_pages);
        anchors.sort_unstable();
        anchors.dedup();

        let mut tokens = Vec::with_capacity(anchors.len() + 2);
        let mut previous: Option<u32> = None;
        for page in anchors {
            if let Some(prev) = previous {
                match page - prev {
                    1 => {}
                    // A gap of exactly one page shows that page instead of a marker.
                    2 => tokens.push(PageToken::Page(prev + 1)),
                    _ => tokens.push(PageToken::Ellipsis),
                }
            }
            tokens.push(PageToken::Page(page));
            previous = Some(page);
        }
        tokens
    };

    PaginationWindow {
        current_page: current,
        total_pages,
        tokens,
        has_previous: current > 1,
        has_next: current < total_pages,
    }
}
