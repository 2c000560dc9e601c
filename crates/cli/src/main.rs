use clap::{Parser, Subcommand};

use ean_search_core::client::{EanSearchClient, SearchOptions};
use ean_search_core::config::{load_config, resolve_token, TOKEN_ENV_VAR};
use ean_search_core::response::Record;

#[derive(Parser)]
#[command(name = "ean-search")]
#[command(about = "Barcode and product lookups via the EAN-Search API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API token (falls back to config file, then EAN_SEARCH_API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Language code for product names (1 = English)
    #[arg(long, global = true)]
    language: Option<u32>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the product name for an EAN/GTIN barcode
    Name {
        /// EAN/GTIN barcode digits
        ean: String,
    },

    /// Look up the full product record for an EAN/GTIN barcode
    Lookup {
        /// EAN/GTIN barcode digits
        ean: String,
    },

    /// Look up the full product record for a 12-digit UPC barcode
    Upc {
        /// UPC barcode digits
        upc: String,
    },

    /// Look up the book title for an ISBN
    Isbn {
        /// ISBN-10 or ISBN-13
        isbn: String,
    },

    /// Verify the check digit of a barcode
    Verify {
        /// EAN/GTIN barcode digits
        ean: String,
    },

    /// Search products by name
    Search {
        /// Free-text product name
        name: String,

        /// Result page (starting at 0)
        #[arg(long, default_value_t = 0)]
        page: u32,
    },

    /// Search products by name, tolerating misspellings
    Similar {
        /// Free-text product name
        name: String,

        /// Result page (starting at 0)
        #[arg(long, default_value_t = 0)]
        page: u32,
    },

    /// Search products within a category
    Category {
        /// Numeric category code
        category: u32,

        /// Optional name filter
        #[arg(default_value = "")]
        name: String,

        /// Result page (starting at 0)
        #[arg(long, default_value_t = 0)]
        page: u32,
    },

    /// List products whose barcode starts with a prefix
    Prefix {
        /// Numeric barcode prefix
        prefix: String,

        /// Result page (starting at 0)
        #[arg(long, default_value_t = 0)]
        page: u32,
    },

    /// Look up the country that issued a barcode
    Country {
        /// EAN/GTIN barcode digits
        ean: String,
    },

    /// Fetch a rendered barcode image (base64 PNG)
    Image {
        /// EAN/GTIN barcode digits
        ean: String,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cfg = load_config();
    let token = resolve_token(cli.token.as_deref(), &cfg).ok_or_else(|| {
        format!(
            "no API token: pass --token, set {}, or add it to the config file",
            TOKEN_ENV_VAR
        )
    })?;

    let mut client = EanSearchClient::new(&token);
    client.set_timeout(cli.timeout.unwrap_or(cfg.api.timeout_secs));
    let language = cli.language.unwrap_or(cfg.api.language);
    let search_opts = |page: u32| SearchOptions { page, language };

    match &cli.command {
        Commands::Name { ean } => print_scalar(client.gtin_name(ean, language)?, cli.json),
        Commands::Lookup { ean } => print_record(client.gtin(ean, language)?, cli.json)?,
        Commands::Upc { upc } => print_record(client.upc(upc, language)?, cli.json)?,
        Commands::Isbn { isbn } => print_scalar(client.isbn_title(isbn)?, cli.json),
        Commands::Verify { ean } => match client.verify_checksum(ean)? {
            Some(valid) => println!("{}", valid),
            None => println!("unknown"),
        },
        Commands::Search { name, page } => {
            print_list(client.product_search(name, &search_opts(*page))?, cli.json)?
        }
        Commands::Similar { name, page } => {
            print_list(client.similar_product_search(name, &search_opts(*page))?, cli.json)?
        }
        Commands::Category { category, name, page } => {
            print_list(client.category_search(*category, name, &search_opts(*page))?, cli.json)?
        }
        Commands::Prefix { prefix, page } => {
            print_list(client.barcode_prefix_search(prefix, &search_opts(*page))?, cli.json)?
        }
        Commands::Country { ean } => print_scalar(client.issuing_country(ean)?, cli.json),
        Commands::Image { ean } => print_scalar(client.barcode_image(ean)?, cli.json),
    }
    Ok(())
}

fn print_scalar(value: Option<String>, json: bool) {
    match value {
        Some(v) => println!("{}", v),
        None if json => println!("null"),
        None => println!("not found"),
    }
}

fn print_record(
    record: Option<Record>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match record {
        Some(r) if json => println!("{}", serde_json::to_string_pretty(&r)?),
        Some(r) => {
            for (key, value) in &r {
                println!("{}: {}", key, display_value(value));
            }
        }
        None if json => println!("null"),
        None => println!("not found"),
    }
    Ok(())
}

fn print_list(
    records: Vec<Record>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("No results found");
        return Ok(());
    }
    for (i, r) in records.iter().enumerate() {
        let name = r.get("name").and_then(|v| v.as_str()).unwrap_or("?");
        let ean = r.get("ean").and_then(|v| v.as_str()).unwrap_or("?");
        println!("Result {}: {} ({})", i + 1, name, ean);
    }
    Ok(())
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
