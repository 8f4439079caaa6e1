//! Client-side view layer for the product-search API: a pure state machine
//! for the results page, an HTTP client for the API, and an async
//! controller tying the two together.

pub mod client;
pub mod controller;
pub mod state;

pub use client::{ProductsClient, ViewError};
pub use controller::SearchController;
pub use state::{SearchToken, SearchView, SelectedProduct};
