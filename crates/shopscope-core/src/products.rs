use serde::{Deserialize, Serialize};

/// Image URL substituted whenever the upstream supplies no usable image.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/150";

/// Base joined with [`ProductDetail::url`] to build a clickable outbound link.
/// Seller links from the upstream are paths relative to Google Shopping.
pub const OUTBOUND_LINK_BASE: &str = "https://www.google.com";

/// A lightweight product representation returned by search, used for list
/// rendering. Produced exclusively by normalization: every field is fully
/// defaulted, so renderers never see an absent value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Upstream product id when present, else the upstream position field,
    /// else the item's index in the result list. Not globally unique.
    pub id: String,
    pub name: String,
    /// Finite, non-negative. Parsed from the upstream currency string.
    pub price: f64,
    pub seller: String,
    pub image: String,
    /// Upstream product identifier, the sole key for a detail lookup.
    /// Absent means detail is unavailable for this item.
    #[serde(rename = "productId", skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

impl ProductSummary {
    /// Case-insensitive substring match of `filter` against the product name.
    ///
    /// An empty filter matches every product.
    #[must_use]
    pub fn matches_filter(&self, filter: &str) -> bool {
        self.name.to_lowercase().contains(&filter.to_lowercase())
    }
}

/// The enriched product representation returned by a single-item lookup, used
/// for the detail overlay. Same defaulting guarantees as [`ProductSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    /// Upstream product id, else the id the lookup was issued for.
    pub id: String,
    pub name: String,
    /// First seller's itemized price, else the parsed top-level price string.
    pub price: f64,
    /// First seller's merchant name, else the top-level source field.
    pub seller: String,
    pub image: String,
    pub shipping: f64,
    #[serde(rename = "totalPrice")]
    pub total_price: f64,
    /// Free-text seller details (e.g. return policy).
    pub details: String,
    /// Outbound link path, relative to [`OUTBOUND_LINK_BASE`].
    pub url: String,
    pub description: String,
    /// Ordered feature blurbs ("extensions" upstream).
    pub extensions: Vec<String>,
    pub specifications: Vec<Specification>,
}

impl ProductDetail {
    /// Absolute outbound link for this product, or `None` when the upstream
    /// provided no link path.
    #[must_use]
    pub fn outbound_link(&self) -> Option<String> {
        if self.url.is_empty() {
            None
        } else {
            Some(format!("{OUTBOUND_LINK_BASE}{}", self.url))
        }
    }
}

/// A single `{key, value}` specification row, order preserved from upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    pub key: String,
    pub value: String,
}
