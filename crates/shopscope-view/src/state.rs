//! Pure search-view state machine.
//!
//! All fetch coordination lives here as synchronous transitions, which keeps
//! the asynchronous races testable without a runtime. The rules:
//!
//! - Arming a list fetch ([`SearchView::set_query`]) hands out a fresh
//!   [`SearchToken`]; only the most recently issued token may commit its
//!   result. A response carrying an older token is reported as stale and
//!   ignored, so a slow fetch for a superseded query can never overwrite a
//!   newer result.
//! - A detail fetch is correlated by product id instead of a counter:
//!   selecting a different card or closing the overlay retires the id, and
//!   the late response is dropped on arrival. Nothing is cancelled; the
//!   correlation check on completion is the whole mechanism.
//!
//! Actual HTTP and task spawning are in [`crate::controller`].

use shopscope_core::{ProductDetail, ProductSummary};

/// Correlation token for an in-flight list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchToken(u64);

/// The product the overlay is showing: the clicked summary at first, then
/// the full detail once its lookup lands.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectedProduct {
    Summary(ProductSummary),
    Detail(ProductDetail),
}

/// State behind the search results page: the navigation query, the fetched
/// summaries, a local name filter, and the overlay selection.
#[derive(Debug, Default)]
pub struct SearchView {
    query: String,
    summaries: Vec<ProductSummary>,
    filter_text: String,
    selected: Option<SelectedProduct>,
    loading: bool,
    load_error: Option<String>,
    issued_tokens: u64,
    current_search: Option<SearchToken>,
    detail_in_flight: Option<String>,
}

impl SearchView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a navigation query change.
    ///
    /// The local filter resets to the new query. A non-empty query arms a
    /// list fetch: `loading` is raised, any previous error is cleared, and
    /// the returned token must accompany the eventual [`Self::apply_search`]
    /// call. An empty query arms nothing and leaves existing results alone.
    pub fn set_query(&mut self, query: &str) -> Option<SearchToken> {
        self.query = query.to_owned();
        self.filter_text = query.to_owned();
        if query.is_empty() {
            return None;
        }

        self.loading = true;
        self.load_error = None;
        self.issued_tokens += 1;
        let token = SearchToken(self.issued_tokens);
        self.current_search = Some(token);
        Some(token)
    }

    /// Commits the outcome of a list fetch.
    ///
    /// Returns `false` without touching any state when `token` is not the
    /// most recently armed fetch. Otherwise stores the summaries, or the
    /// error message in place of them, and lowers `loading`.
    #[must_use]
    pub fn apply_search(
        &mut self,
        token: SearchToken,
        result: Result<Vec<ProductSummary>, String>,
    ) -> bool {
        if self.current_search != Some(token) {
            return false;
        }
        self.current_search = None;
        self.loading = false;
        match result {
            Ok(summaries) => {
                self.summaries = summaries;
                self.load_error = None;
            }
            Err(message) => self.load_error = Some(message),
        }
        true
    }

    /// Opens the overlay on `summary` and returns the product id a detail
    /// fetch should use, if the item has one. The summary stays on display
    /// until the detail arrives (or forever, when the fetch fails).
    pub fn select(&mut self, summary: &ProductSummary) -> Option<String> {
        self.selected = Some(SelectedProduct::Summary(summary.clone()));
        self.detail_in_flight = summary.product_id.clone();
        self.detail_in_flight.clone()
    }

    /// Commits a resolved detail lookup.
    ///
    /// Returns `false` when `product_id` no longer matches the in-flight
    /// correlation id, i.e. the user re-selected or closed the overlay while
    /// the fetch was outstanding.
    #[must_use]
    pub fn apply_detail(&mut self, product_id: &str, detail: ProductDetail) -> bool {
        if self.detail_in_flight.as_deref() != Some(product_id) {
            return false;
        }
        self.detail_in_flight = None;
        self.selected = Some(SelectedProduct::Detail(detail));
        true
    }

    /// Retires the detail correlation id after a failed lookup. The
    /// optimistic summary stays selected.
    pub fn detail_fetch_failed(&mut self, product_id: &str) {
        if self.detail_in_flight.as_deref() == Some(product_id) {
            self.detail_in_flight = None;
        }
    }

    /// Closes the overlay. Any in-flight detail response becomes stale.
    pub fn close_detail(&mut self) {
        self.selected = None;
        self.detail_in_flight = None;
    }

    /// Updates the local name filter. Purely a projection input; never
    /// triggers a fetch.
    pub fn set_filter(&mut self, filter: &str) {
        self.filter_text = filter.to_owned();
    }

    /// The summaries whose names contain the filter text,
    /// case-insensitively, in fetch order.
    #[must_use]
    pub fn visible_summaries(&self) -> Vec<&ProductSummary> {
        self.summaries
            .iter()
            .filter(|summary| summary.matches_filter(&self.filter_text))
            .collect()
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    #[must_use]
    pub fn summaries(&self) -> &[ProductSummary] {
        &self.summaries
    }

    #[must_use]
    pub fn selected(&self) -> Option<&SelectedProduct> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }
}
