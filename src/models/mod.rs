use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A ticker considered for the ranked table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseEntry {
    pub name: String,
    pub symbol: String,
}

impl UniverseEntry {
    pub fn new(name: &str, symbol: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

/// A fixed instrument of the flat quote tables (indices, FX, commodities, sectors)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatEntry {
    /// Token receiving the formatted close, e.g. `{{^GDAXI}}`
    pub placeholder: String,
    /// Missing symbol means the instrument is always unavailable
    #[serde(default)]
    pub symbol: Option<String>,
}

impl FlatEntry {
    pub fn new(placeholder: &str, symbol: Option<&str>) -> Self {
        Self {
            placeholder: placeholder.to_string(),
            symbol: symbol.filter(|s| !s.trim().is_empty()).map(str::to_string),
        }
    }
}

/// The three configured ticker groups of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub ranked: Vec<UniverseEntry>,
    pub markets: Vec<FlatEntry>,
    pub sectors: Vec<FlatEntry>,
}

/// One daily trading session, normalised at the provider boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

/// The two most recent sessions of a ticker, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSnapshot {
    pub symbol: String,
    pub previous: Session,
    pub current: Session,
}

/// Derived metrics of a resolvable ticker in the ranked universe
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub name: String,
    pub symbol: String,
    pub close: f64,
    pub variation: Option<f64>,
    pub multiple: Option<f64>,
    pub volume_ratio: f64,
}

/// Top-5 views over the ranked universe
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedTables {
    pub most_active: Vec<MetricRow>,
    pub best: Vec<MetricRow>,
    pub worst: Vec<MetricRow>,
}

impl RankedTables {
    pub fn is_empty(&self) -> bool {
        self.most_active.is_empty() && self.best.is_empty() && self.worst.is_empty()
    }
}

/// One row of a flat quote table
#[derive(Debug, Clone, PartialEq)]
pub struct FlatQuoteRow {
    pub placeholder: String,
    pub symbol: Option<String>,
    /// `None` renders as `-`
    pub close: Option<f64>,
    pub variation: Option<f64>,
}

impl FlatQuoteRow {
    /// Row for an instrument that could not be resolved
    pub fn sentinel(entry: &FlatEntry) -> Self {
        Self {
            placeholder: entry.placeholder.clone(),
            symbol: entry.symbol.clone(),
            close: None,
            variation: Some(0.0),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.close.is_none()
    }
}

/// Computed rows together with the tickers that could not be resolved
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieval<T> {
    pub value: T,
    pub unavailable: Vec<String>,
}

impl<T> Retrieval<T> {
    pub fn new(value: T, unavailable: Vec<String>) -> Self {
        Self { value, unavailable }
    }
}

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub market_data_base_url: String,
    pub euronext_base_url: String,
    pub rate_limit_per_minute: u32,
    pub font_name: String,
    pub font_size_pt: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            market_data_base_url: "https://query1.finance.yahoo.com".to_string(),
            euronext_base_url: "https://live.euronext.com".to_string(),
            rate_limit_per_minute: 120,
            font_name: "Sitka Display".to_string(),
            font_size_pt: 8.0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let defaults = Config::default();

        let font_size_pt = match std::env::var("REPORT_FONT_SIZE_PT") {
            Ok(raw) => raw
                .parse::<f32>()
                .map_err(|_| anyhow::anyhow!("REPORT_FONT_SIZE_PT must be a number, got '{}'", raw))?,
            Err(_) => defaults.font_size_pt,
        };

        Ok(Config {
            market_data_base_url: std::env::var("MARKET_DATA_BASE_URL")
                .unwrap_or(defaults.market_data_base_url),
            euronext_base_url: std::env::var("EURONEXT_BASE_URL")
                .unwrap_or(defaults.euronext_base_url),
            rate_limit_per_minute: std::env::var("RATE_LIMIT_PER_MINUTE")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .unwrap_or(defaults.rate_limit_per_minute),
            font_name: std::env::var("REPORT_FONT_NAME").unwrap_or(defaults.font_name),
            font_size_pt,
        })
    }
}
