//! Normalization of raw Zenserp JSON into the core product types.
//!
//! Upstream payloads are loosely typed and partially populated, so every
//! function here is total: each field follows a left-to-right preference
//! chain ending in a hard default, and hostile or truncated input degrades
//! to placeholder values instead of errors. See [`crate::client`] for how
//! the raw bodies are fetched.

use serde_json::Value;
use shopscope_core::{ProductDetail, ProductSummary, Specification, PLACEHOLDER_IMAGE_URL};

/// Default display name for products and sellers the upstream left unnamed.
const UNKNOWN: &str = "Unknown";

/// Flattens a raw search response into summaries, in upstream order.
///
/// Reads the `shopping_results` array; a missing or non-array field yields
/// an empty list. The element index doubles as the identifier of last
/// resort for items with no usable id of their own.
#[must_use]
pub fn summaries_from_search(body: &Value) -> Vec<ProductSummary> {
    body.get("shopping_results")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .map(|(index, item)| to_summary(item, index))
                .collect()
        })
        .unwrap_or_default()
}

/// Converts a single search result item into a [`ProductSummary`].
///
/// Field preferences:
/// - id: `product_id`, then `position`, then the list `index`
/// - name: `title`, defaulting to an empty string
/// - price: `price` parsed per [`parse_price`] (numbers accepted as-is)
/// - seller: `source`, defaulting to `"Unknown"`
/// - image: `thumbnail`, then `image`, then the placeholder URL
#[must_use]
pub fn to_summary(item: &Value, index: usize) -> ProductSummary {
    let product_id = id_field(item, "product_id");
    let id = product_id
        .clone()
        .or_else(|| id_field(item, "position"))
        .unwrap_or_else(|| index.to_string());

    ProductSummary {
        id,
        name: str_field(item, "title").unwrap_or_default(),
        price: item.get("price").map_or(0.0, price_value),
        seller: str_field(item, "source").unwrap_or_else(|| UNKNOWN.to_owned()),
        image: str_field(item, "thumbnail")
            .or_else(|| str_field(item, "image"))
            .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_owned()),
        product_id,
    }
}

/// Converts a product lookup response into a [`ProductDetail`].
///
/// Seller-level fields come from the first entry of the `sellers` array.
/// `fallback_id` is the identifier the caller requested; it backstops a
/// payload that omits `product_id`. Field preferences:
/// - price: first seller's `item_price.value`, then the top-level `price`
/// - seller: first seller's `merchant`, then top-level `source`
/// - total: first seller's `total_price.value`, then its `item_price.value`
/// - url: first seller's `url`, then the top-level `url`
///
/// A present numeric candidate is selected even when it is `0`; only a
/// missing, non-numeric, or negative value moves the chain along.
#[must_use]
pub fn to_detail(body: &Value, fallback_id: &str) -> ProductDetail {
    let seller = body
        .get("sellers")
        .and_then(Value::as_array)
        .and_then(|sellers| sellers.first());

    let item_price = seller_price(seller, "item_price");

    ProductDetail {
        id: id_field(body, "product_id").unwrap_or_else(|| fallback_id.to_owned()),
        name: str_field(body, "title").unwrap_or_else(|| UNKNOWN.to_owned()),
        price: item_price.unwrap_or_else(|| body.get("price").map_or(0.0, price_value)),
        seller: seller
            .and_then(|s| str_field(s, "merchant"))
            .or_else(|| str_field(body, "source"))
            .unwrap_or_else(|| UNKNOWN.to_owned()),
        image: str_field(body, "image").unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_owned()),
        shipping: seller_price(seller, "shipping_price").unwrap_or(0.0),
        total_price: seller_price(seller, "total_price")
            .or(item_price)
            .unwrap_or(0.0),
        details: seller
            .and_then(|s| str_field(s, "details"))
            .unwrap_or_default(),
        url: seller
            .and_then(|s| str_field(s, "url"))
            .or_else(|| str_field(body, "url"))
            .unwrap_or_default(),
        description: str_field(body, "description").unwrap_or_default(),
        extensions: string_list(body.get("extensions")),
        specifications: specification_list(body.get("specifications")),
    }
}

/// Parses a price from a currency-formatted string.
///
/// All characters other than ASCII digits and dots are dropped first, then
/// the leading numeric token with at most one decimal point is parsed:
/// `"$1,234.56"` parses as `1234.56`, `"1.2.3"` as `1.2`. An empty or
/// all-non-numeric string yields `0`, as does any non-finite result.
#[must_use]
pub fn parse_price(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut token = String::new();
    let mut has_dot = false;
    for c in cleaned.chars() {
        match c {
            '0'..='9' => token.push(c),
            '.' if !has_dot => {
                has_dot = true;
                token.push(c);
            }
            // A second dot ends the token.
            _ => break,
        }
    }

    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

// ---------------------------------------------------------------------------
// Field extraction helpers
// ---------------------------------------------------------------------------

/// Reads a non-empty string field. Empty strings count as absent so that
/// downstream defaults apply.
fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Reads an identifier-like field that the upstream serializes as either a
/// string or a bare number.
fn id_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Interprets a price field that may be a currency string or a JSON number.
/// Anything else is worth `0`.
fn price_value(value: &Value) -> f64 {
    match value {
        Value::String(s) => parse_price(s),
        Value::Number(_) => num_value(value).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Reads a finite, non-negative JSON number. Negative or non-numeric values
/// count as absent so the preference chain can continue.
fn num_value(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite() && *v >= 0.0)
}

/// Reads `<field>.value` from a seller entry, e.g. `item_price.value`.
fn seller_price(seller: Option<&Value>, field: &str) -> Option<f64> {
    seller?.get(field)?.get("value").and_then(num_value)
}

/// Collects the string elements of an array field, skipping anything else.
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Collects `{key, value}` objects from an array field. Non-object elements
/// are skipped; missing or non-string members default to empty strings.
fn specification_list(value: Option<&Value>) -> Vec<Specification> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|entry| Specification {
                    key: entry
                        .get("key")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_owned(),
                    value: entry
                        .get("value")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_owned(),
                })
                .collect()
        })
        .unwrap_or_default()
}
