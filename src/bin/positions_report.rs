//! Position risk report for the ALUD lending dashboard.
//!
//! - CLI arguments and TOML config file support
//! - Risk distribution, ranked tables and redemption quotes
//! - Optional one-shot live price refresh with fallback provider
//! - Structured logging with tracing

use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use alud_risk::config::{AppConfig, LogFormat};
use alud_risk::feed::{CoinGeckoSource, CryptoCompareSource, FallbackPriceFeed, RefreshOutcome};
use alud_risk::risk::rank_views;
use alud_risk::source::{DemoSource, JsonFileSource, PositionSource};
use alud_risk::{
    default_tokens, find_token, format_compact_usd, format_optional_ratio, format_price,
    format_ratio, format_thousands, search_tokens, Classifier, CollateralToken, Position,
    PositionFilter, PriceSnapshot, RedemptionPreview, RiskCategory, STABLE_SYMBOL,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser)]
#[command(name = "positions_report")]
#[command(version, about = "ALUD position risk report", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "positions_report.toml")]
    config: String,

    /// JSON position ledger (overrides config; demo ledger when unset)
    #[arg(long)]
    positions: Option<String>,

    /// Owner id for the "my positions" view
    #[arg(long, env = "ALUD_OWNER")]
    owner: Option<String>,

    /// Refresh prices from the live feed before reporting
    #[arg(long)]
    live_prices: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output format (pretty, json, compact)
    #[arg(long)]
    log_format: Option<String>,

    /// Log file path (logs to both file and stderr)
    #[arg(long)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Protocol stats and risk distribution (default)
    Summary,
    /// Positions ranked most-at-risk first
    Table {
        /// all, a category (critical, at-risk, ...), mine, or owner:<id>
        #[arg(short, long, default_value = "all")]
        filter: String,
    },
    /// Preview a redemption of ALUD into collateral
    Quote {
        /// ALUD amount to redeem
        #[arg(short, long)]
        amount: f64,
        /// Collateral symbol to receive
        #[arg(short, long, default_value = "WETH")]
        symbol: String,
    },
    /// Search collateral tokens by symbol or name
    Tokens {
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Generate a sample config file
    GenerateConfig {
        /// Output file path
        #[arg(short, long, default_value = "positions_report.toml")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Commands::GenerateConfig { output }) = &cli.command {
        std::fs::write(output, AppConfig::sample_toml()?)?;
        println!("Sample config written to {output}");
        return Ok(());
    }

    let mut config = AppConfig::load(&cli.config)?;
    if let Some(path) = &cli.positions {
        config.data.positions_file = Some(path.into());
    }
    if let Some(owner) = &cli.owner {
        config.data.owner = owner.clone();
    }
    if cli.live_prices {
        config.prices.enabled = true;
    }

    setup_logging(&config, &cli)?;

    let tokens = default_tokens();
    let mut prices = PriceSnapshot::from_tokens(&tokens);
    if config.prices.enabled {
        prices = refresh_prices(&config, &prices).await?;
    }
    let tokens = prices.apply_to(&tokens);

    let positions = load_positions(&config)?;
    let classifier = config.classifier.classifier();

    match cli.command.unwrap_or(Commands::Summary) {
        Commands::Summary => print_summary(&classifier, &positions, &prices, &config),
        Commands::Table { filter } => {
            let filter = parse_filter(&filter, &config.data.owner)?;
            print_table(&classifier, &positions, &prices, &filter, &config);
        }
        Commands::Quote { amount, symbol } => print_quote(&tokens, amount, &symbol)?,
        Commands::Tokens { query } => print_tokens(&tokens, &query),
        Commands::GenerateConfig { .. } => {}
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn setup_logging(config: &AppConfig, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let level = cli.log_level.as_ref().unwrap_or(&config.logging.level);

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)?,
    };
    let filter = filter
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    let format = cli
        .log_format
        .as_deref()
        .unwrap_or(match config.logging.format {
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
        });

    let log_file = cli.log_file.as_ref().or(config.logging.log_file.as_ref());

    if let Some(log_path) = log_file {
        let file = std::fs::File::create(log_path)?;
        let file = Mutex::new(file);

        // File logging uses JSON on both layers
        let stdout_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .json();
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .json();

        tracing_subscriber::registry()
            .with(filter)
            .with(stdout_layer)
            .with(file_layer)
            .init();
    } else {
        // Report goes to stdout; logs stay on stderr
        match format {
            "json" => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .json()
                    .init();
            }
            "compact" => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .compact()
                    .init();
            }
            _ => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .init();
            }
        }
    }

    Ok(())
}

async fn refresh_prices(
    config: &AppConfig,
    prices: &PriceSnapshot,
) -> Result<PriceSnapshot, Box<dyn std::error::Error>> {
    let timeout = Duration::from_secs(config.prices.timeout_secs);
    let feed = FallbackPriceFeed::new(Box::new(CoinGeckoSource::new(
        &config.prices.primary_url,
        timeout,
    )?))
    .with_fallback(Box::new(CryptoCompareSource::new(
        &config.prices.fallback_url,
        timeout,
    )?));

    let (fresh, outcome) = feed.refresh(prices).await;
    if outcome == RefreshOutcome::Stale {
        warn!("Live prices unavailable, using reference prices");
    }
    Ok(fresh)
}

fn load_positions(config: &AppConfig) -> Result<Vec<Position>, Box<dyn std::error::Error>> {
    let source: Box<dyn PositionSource> = match &config.data.positions_file {
        Some(path) => Box::new(JsonFileSource::new(path)),
        None => Box::new(DemoSource),
    };
    let positions = source.load()?;
    info!(source = source.name(), count = positions.len(), "Positions loaded");
    Ok(positions)
}

fn parse_filter(s: &str, owner: &str) -> Result<PositionFilter, Box<dyn std::error::Error>> {
    if s.eq_ignore_ascii_case("mine") {
        return Ok(PositionFilter::OwnedBy(owner.to_string()));
    }
    Ok(s.parse()?)
}

fn print_summary(classifier: &Classifier, positions: &[Position], prices: &PriceSnapshot, config: &AppConfig) {
    let summary = classifier.aggregate(positions, prices);
    let mine = classifier.filter(
        positions,
        prices,
        &PositionFilter::OwnedBy(config.data.owner.clone()),
    );

    println!("Active Positions       {}", summary.position_count);
    println!("Total Collateral       {}", format_compact_usd(summary.total_collateral_value));
    println!("Total Debt             {}", format_compact_usd(summary.total_debt));
    println!("Avg. Collateral Ratio  {}", format_optional_ratio(summary.weighted_ratio));
    println!("My Positions           {}", mine.len());
    if summary.no_debt_count > 0 {
        println!("No Debt                {}", summary.no_debt_count);
    }
    if summary.unpriced_count > 0 {
        println!("Price Unavailable      {}", summary.unpriced_count);
    }
    if summary.invalid_count > 0 {
        println!("Invalid Entries        {}", summary.invalid_count);
    }

    println!();
    println!("Risk Distribution");
    for row in summary.distribution() {
        let style = row.category.style();
        println!(
            "  {:<10} {:>12}  {:>3} ({:.0}%)",
            style.label, style.threshold_label, row.count, row.share
        );
    }
    println!();
    println!(
        "Positions below {:.0}% collateral ratio are eligible for liquidation.",
        config.classifier.liquidation_threshold_pct
    );
}

fn print_table(
    classifier: &Classifier,
    positions: &[Position],
    prices: &PriceSnapshot,
    filter: &PositionFilter,
    config: &AppConfig,
) {
    let rows = rank_views(classifier.filter(positions, prices, filter));
    let now = Utc::now();

    println!(
        "{:<16} {:<16} {:>14} {:>14} {:>9} {:<10} {:>12} {:>10}",
        "Wallet", "Collateral", "Value", format!("Debt ({STABLE_SYMBOL})"), "Ratio", "Status", "Liq. Price", "Activity"
    );
    for row in &rows {
        let p = row.position;
        let value = row
            .collateral_value
            .map_or_else(|| "—".to_string(), |v| format!("${}", format_thousands(v, 2)));
        let status = row.category.map_or("—", RiskCategory::label);
        let liq = p
            .liquidation_price(config.classifier.liquidation_threshold_pct)
            .map_or_else(|| "—".to_string(), |v| format!("${}", format_thousands(v, 0)));
        println!(
            "{:<16} {:<16} {:>14} {:>14} {:>9} {:<10} {:>12} {:>10}",
            p.owner,
            format!("{} {}", p.collateral_amount, p.collateral),
            value,
            format_thousands(p.debt, 0),
            format_ratio(row),
            status,
            liq,
            p.last_activity.label(now),
        );
    }
    println!("{} positions ({filter})", rows.len());
}

fn print_quote(tokens: &[CollateralToken], amount: f64, symbol: &str) -> Result<(), Box<dyn std::error::Error>> {
    let token = find_token(tokens, symbol).ok_or_else(|| format!("Unknown collateral token '{symbol}'"))?;
    let preview = RedemptionPreview::new(amount, token)?;
    println!("Redeem            {} {STABLE_SYMBOL}", format_thousands(preview.stable_amount, 2));
    println!("Receive           {:.6} {}", preview.asset_amount, preview.symbol);
    println!("Redemption Rate   1 {STABLE_SYMBOL} = {:.6} {}", preview.rate, preview.symbol);
    println!("Value             ≈ ${:.2} USD", preview.usd_value);
    Ok(())
}

fn print_tokens(tokens: &[CollateralToken], query: &str) {
    for token in search_tokens(tokens, query) {
        let balance = token
            .balance
            .map_or_else(|| "-".to_string(), |b| format!("{b}"));
        println!(
            "{:<6} {:<18} ${:>12} balance {}",
            token.symbol,
            token.name,
            format_price(token.price),
            balance
        );
    }
}
