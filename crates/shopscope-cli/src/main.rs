use clap::{Parser, Subcommand};

mod products;

#[derive(Debug, Parser)]
#[command(name = "shopscope-cli")]
#[command(about = "ShopScope product search command line interface")]
struct Cli {
    /// Base URL of the ShopScope API server
    #[arg(
        long,
        global = true,
        env = "SHOPSCOPE_API_URL",
        default_value = "http://127.0.0.1:3000"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for products and print the result cards
    Search {
        /// Search keywords (e.g., "wireless headphones")
        query: String,
        /// Only print cards whose product name contains this text
        #[arg(long)]
        filter: Option<String>,
        /// Open the n-th printed card (1-based) and print its details
        #[arg(long, value_name = "N")]
        select: Option<usize>,
    },
    /// Look up a single product by its upstream product id
    Detail {
        /// Upstream product identifier (the `productId` of a search result)
        product_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let Cli { api_url, command } = Cli::parse();
    match command {
        Commands::Search {
            query,
            filter,
            select,
        } => products::run_search(&api_url, &query, filter.as_deref(), select).await,
        Commands::Detail { product_id } => products::run_detail(&api_url, &product_id).await,
    }
}
