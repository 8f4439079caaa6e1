pub mod client;
pub mod error;
pub mod normalize;

pub use client::{ZenserpClient, SHOPPING_LOCATION};
pub use error::ZenserpError;
pub use normalize::{parse_price, summaries_from_search, to_detail, to_summary};
