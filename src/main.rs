use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use market_closing::api::{EuronextClient, YahooClient};
use market_closing::document::DocxFile;
use market_closing::market_data::MarketDataRetriever;
use market_closing::models::{Config, Universe};
use market_closing::report::{collect_report_data, fill_report, output_path, ReportStyle};
use market_closing::universe::CAC_SMALL_INDEX;

/// Daily market closing report generator
#[derive(Parser)]
#[command(name = "market-closing")]
#[command(version)]
#[command(about = "Fill the daily closing template with end-of-day market data")]
#[command(long_about = "
Fetches the last sessions of the configured tickers, ranks the most active
stocks and the best and worst performers, quotes indices, currencies,
commodities and sectors, then writes everything into the closing template.

Examples:
  market-closing                                   # today, default template
  market-closing --date 2026-01-21 --output-dir out
  market-closing --universe universe.json --no-euronext
")]
struct Args {
    /// Template containing the {{...}} placeholders
    #[arg(long, default_value = "templates/closing_template.docx")]
    template: PathBuf,

    /// Directory receiving '<YYYY-MM-DD> daily closing.docx'
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Report date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// JSON file replacing the built-in ticker lists
    #[arg(long)]
    universe: Option<PathBuf>,

    /// Euronext index (ISIN-MIC) whose components join the ranked universe
    #[arg(long = "euronext-index", value_name = "ISIN-MIC", default_value = CAC_SMALL_INDEX)]
    euronext_indices: Vec<String>,

    /// Rank the configured list only
    #[arg(long)]
    no_euronext: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("market_closing=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_summary(unavailable: &[String]) {
    if unavailable.is_empty() {
        println!("\n✓ All tickers loaded successfully");
    } else {
        println!("\n✗ Unavailable tickers (skipped):");
        for ticker in unavailable {
            println!("  - {}", ticker);
        }
    }
    println!("\nDONE !");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    info!("🚀 Building the daily closing report for {}", date);

    let mut universe = match &args.universe {
        Some(path) => Universe::from_file(path)?,
        None => Universe::default(),
    };
    if !args.no_euronext {
        let client = EuronextClient::new(&config)?;
        universe.add_index_components(&client, &args.euronext_indices).await;
    }
    info!(
        "📋 Universe: {} ranked, {} markets, {} sectors",
        universe.ranked.len(),
        universe.markets.len(),
        universe.sectors.len()
    );

    let mut docx = DocxFile::open(&args.template)
        .with_context(|| format!("Failed to load template {}", args.template.display()))?;

    let retriever = MarketDataRetriever::new(YahooClient::new(&config)?);
    let data = collect_report_data(&retriever, &universe, date).await;

    fill_report(docx.document_mut(), &data.value, &ReportStyle::from_config(&config));

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;
    let path = output_path(&args.output_dir, date);
    docx.save(&path)
        .with_context(|| format!("Failed to save {}", path.display()))?;
    info!("💾 Report saved to {}", path.display());

    print_summary(&data.unavailable);
    Ok(())
}
