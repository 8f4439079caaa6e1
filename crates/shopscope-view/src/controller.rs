//! Async driver for the search view.
//!
//! Owns the shared [`SearchView`] behind a mutex and turns its armed
//! transitions into spawned fetches. Completion handlers re-lock the state
//! and commit through [`SearchView::apply_search`] /
//! [`SearchView::apply_detail`], which reject anything stale; a rejected
//! response is logged and dropped, never retried.

use std::sync::Arc;

use shopscope_core::ProductSummary;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::client::ProductsClient;
use crate::state::{SearchView, SelectedProduct};

/// Drives a [`SearchView`] against a [`ProductsClient`].
///
/// Clones share the same view state, so a clone handed to a background task
/// observes every update.
#[derive(Debug, Clone)]
pub struct SearchController {
    state: Arc<Mutex<SearchView>>,
    client: Arc<ProductsClient>,
}

impl SearchController {
    #[must_use]
    pub fn new(client: ProductsClient) -> Self {
        Self {
            state: Arc::new(Mutex::new(SearchView::new())),
            client: Arc::new(client),
        }
    }

    /// Applies a query change and, for a non-empty query, spawns the list
    /// fetch. The returned handle resolves when the fetch has been committed
    /// or discarded; callers that only care about eventual state may drop it.
    pub async fn set_query(&self, query: &str) -> Option<JoinHandle<()>> {
        let token = self.state.lock().await.set_query(query)?;

        let state = Arc::clone(&self.state);
        let client = Arc::clone(&self.client);
        let query = query.to_owned();
        Some(tokio::spawn(async move {
            let result = client
                .search(&query)
                .await
                .map_err(|error| error.to_string());
            let applied = state.lock().await.apply_search(token, result);
            if !applied {
                tracing::debug!(query, "discarding stale search response");
            }
        }))
    }

    /// Opens the overlay on `summary` and, when the item carries a product
    /// id, spawns the detail fetch. A failed fetch leaves the summary on
    /// display and logs a warning.
    pub async fn select(&self, summary: &ProductSummary) -> Option<JoinHandle<()>> {
        let product_id = self.state.lock().await.select(summary)?;

        let state = Arc::clone(&self.state);
        let client = Arc::clone(&self.client);
        Some(tokio::spawn(async move {
            match client.fetch_detail(&product_id).await {
                Ok(detail) => {
                    let applied = state.lock().await.apply_detail(&product_id, detail);
                    if !applied {
                        tracing::debug!(product_id, "discarding stale product detail");
                    }
                }
                Err(error) => {
                    tracing::warn!(product_id, %error, "failed to load product details");
                    state.lock().await.detail_fetch_failed(&product_id);
                }
            }
        }))
    }

    pub async fn set_filter(&self, filter: &str) {
        self.state.lock().await.set_filter(filter);
    }

    pub async fn close_detail(&self) {
        self.state.lock().await.close_detail();
    }

    pub async fn visible_summaries(&self) -> Vec<ProductSummary> {
        self.state
            .lock()
            .await
            .visible_summaries()
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn selected(&self) -> Option<SelectedProduct> {
        self.state.lock().await.selected().cloned()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.is_loading()
    }

    pub async fn load_error(&self) -> Option<String> {
        self.state.lock().await.load_error().map(str::to_owned)
    }

    pub async fn query(&self) -> String {
        self.state.lock().await.query().to_owned()
    }
}
