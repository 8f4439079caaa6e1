//! Product search command handlers for the CLI.
//!
//! `run_search` walks the same path a shopper takes on the results page:
//! fetch the list for a query, apply the local name filter, and optionally
//! open one card's detail view. `run_detail` skips the list and looks a
//! single product up directly.

use shopscope_core::{ProductDetail, ProductSummary};
use shopscope_view::{ProductsClient, SearchController, SelectedProduct};

/// Search for products and print the result cards.
///
/// Prints the heading, then one numbered card per visible product, or
/// `"No products found"` when the filter leaves nothing, or the load error
/// in place of results. With `select`, additionally opens the n-th printed
/// card and prints its detail block; when the detail lookup is unavailable
/// or fails, the block falls back to the card's own fields.
///
/// # Errors
///
/// Returns an error if the query is empty, the API client cannot be built,
/// or `select` points past the printed cards. A failed list fetch is not an
/// error here; it is rendered the way the results page renders it.
pub(crate) async fn run_search(
    api_url: &str,
    query: &str,
    filter: Option<&str>,
    select: Option<usize>,
) -> anyhow::Result<()> {
    let client = ProductsClient::new(api_url)
        .map_err(|e| anyhow::anyhow!("failed to build API client: {e}"))?;
    let controller = SearchController::new(client);

    let Some(fetch) = controller.set_query(query).await else {
        anyhow::bail!("query must not be empty");
    };
    fetch.await?;

    if let Some(filter) = filter {
        controller.set_filter(filter).await;
    }

    println!("Search Results for \"{query}\"");
    println!();

    if let Some(error) = controller.load_error().await {
        println!("{error}");
        return Ok(());
    }

    let visible = controller.visible_summaries().await;
    if visible.is_empty() {
        println!("No products found");
        return Ok(());
    }
    for (index, product) in visible.iter().enumerate() {
        print!("{}", render_card(index + 1, product));
    }

    if let Some(position) = select {
        let index = position
            .checked_sub(1)
            .ok_or_else(|| anyhow::anyhow!("card positions are 1-based"))?;
        let product = visible
            .get(index)
            .ok_or_else(|| anyhow::anyhow!("no visible product at position {position}"))?;

        if let Some(fetch) = controller.select(product).await {
            fetch.await?;
        }
        if let Some(selected) = controller.selected().await {
            println!();
            print!("{}", render_selected(&selected));
        }
    }

    Ok(())
}

/// Look up a single product by id and print its detail block.
///
/// # Errors
///
/// Returns an error if the API client cannot be built or the lookup fails;
/// an API error body surfaces with its details flattened into the message.
pub(crate) async fn run_detail(api_url: &str, product_id: &str) -> anyhow::Result<()> {
    let client = ProductsClient::new(api_url)
        .map_err(|e| anyhow::anyhow!("failed to build API client: {e}"))?;
    let detail = client
        .fetch_detail(product_id)
        .await
        .map_err(|e| anyhow::anyhow!("detail lookup for '{product_id}' failed: {e}"))?;

    print!("{}", render_detail(&detail));
    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_card(position: usize, product: &ProductSummary) -> String {
    format!(
        "{position:>3}. {}\n     ${:.2}  Seller: {}\n",
        product.name, product.price, product.seller
    )
}

fn render_selected(selected: &SelectedProduct) -> String {
    match selected {
        SelectedProduct::Summary(summary) => render_summary_block(summary),
        SelectedProduct::Detail(detail) => render_detail(detail),
    }
}

/// Detail block for a card whose full lookup never arrived. Only the
/// fields the card itself carries are shown.
fn render_summary_block(summary: &ProductSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", summary.name));
    out.push_str("No description available\n");
    out.push_str(&format!("Price: ${:.2}\n", summary.price));
    out.push_str(&format!("Seller: {}\n", summary.seller));
    out
}

fn render_detail(detail: &ProductDetail) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", detail.name));
    if detail.description.is_empty() {
        out.push_str("No description available\n");
    } else {
        out.push_str(&format!("{}\n", detail.description));
    }
    out.push_str(&format!("Price: ${:.2}\n", detail.price));
    out.push_str(&format!("Shipping: ${:.2}\n", detail.shipping));
    out.push_str(&format!("Total Price: ${:.2}\n", detail.total_price));
    out.push_str(&format!("Seller: {}\n", detail.seller));
    if !detail.details.is_empty() {
        out.push_str(&format!("Details: {}\n", detail.details));
    }
    if !detail.extensions.is_empty() {
        out.push_str("Features:\n");
        for extension in &detail.extensions {
            out.push_str(&format!("  - {extension}\n"));
        }
    }
    if !detail.specifications.is_empty() {
        out.push_str("Specifications:\n");
        for spec in &detail.specifications {
            out.push_str(&format!("  {}: {}\n", spec.key, spec.value));
        }
    }
    if let Some(link) = detail.outbound_link() {
        out.push_str(&format!("Go to Product: {link}\n"));
    }
    out
}
