use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use market_closing::api::{MarketDataProvider, YahooClient};
use market_closing::formatting::{format_percent, format_price, format_ratio};
use market_closing::market_data::{flat_variation, variation, volume_ratio, VOLUME_AVERAGE_SESSIONS};
use market_closing::models::{Config, QuoteSnapshot};

/// Inspect what the report would compute for a single symbol
#[derive(Parser)]
#[command(name = "fetch-sessions")]
#[command(about = "Print the latest daily sessions of a symbol and the derived report metrics")]
struct Args {
    /// Market data symbol, e.g. ALO.PA or ^FCHI
    symbol: String,

    /// Number of daily sessions to request
    #[arg(long, short = 'n', default_value_t = VOLUME_AVERAGE_SESSIONS + 1)]
    sessions: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("market_closing=info,fetch_sessions=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let client = YahooClient::new(&config)?;

    info!("📈 Fetching {} sessions for {}", args.sessions, args.symbol);
    let sessions = client.daily_sessions(&args.symbol, args.sessions).await?;

    println!("\n📊 {} daily sessions:", args.symbol);
    println!("Date       |         Open |        Close |       Volume");
    println!("-----------|--------------|--------------|-------------");
    for session in &sessions {
        let volume = session
            .volume
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} | {:>12} | {:>12} | {:>12}",
            session.date,
            format_price(Some(session.open)),
            format_price(Some(session.close)),
            volume
        );
    }

    let Some((current, earlier)) = sessions.split_last() else {
        warn!("⚠️ No sessions returned for {}", args.symbol);
        return Ok(());
    };
    let Some(previous) = earlier.last() else {
        warn!("⚠️ Only one session available, {} would be reported as unavailable", args.symbol);
        return Ok(());
    };

    let quote = QuoteSnapshot {
        symbol: args.symbol.clone(),
        previous: previous.clone(),
        current: current.clone(),
    };

    let intraday = match client.intraday_volume(&args.symbol).await {
        Ok(volume) => volume,
        Err(e) => {
            warn!("⚠️ Intraday volume unavailable: {}", e);
            None
        }
    };
    let start = earlier.len().saturating_sub(VOLUME_AVERAGE_SESSIONS);

    println!("\n📈 Metrics:");
    println!("Variation:        {}", format_percent(variation(current.close, previous.close)));
    println!("Flat-table value: {}", format_percent(flat_variation(&quote)));
    println!("Volume ratio:     {}", format_ratio(volume_ratio(intraday, &earlier[start..])));

    info!("🎉 Done");
    Ok(())
}
