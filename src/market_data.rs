//! End-of-day retrieval and metric computation for the closing report
//!
//! Per-ticker failures never abort a batch: they are reported back in
//! [`Retrieval::unavailable`] and the ticker is skipped (ranked table) or
//! rendered as a sentinel row (flat tables).

use std::cmp::Ordering;

use tracing::{debug, info, warn};

use crate::api::MarketDataProvider;
use crate::models::{
    FlatEntry, FlatQuoteRow, MetricRow, QuoteSnapshot, RankedTables, Retrieval, Session,
    UniverseEntry,
};

/// Maximum number of rows of each ranked view
pub const RANKED_TABLE_SIZE: usize = 5;

/// Sessions averaged for the "most active" volume ratio
pub const VOLUME_AVERAGE_SESSIONS: usize = 10;

/// Fetches sessions and derives the report tables
pub struct MarketDataRetriever<P> {
    provider: P,
}

impl<P: MarketDataProvider + Sync> MarketDataRetriever<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Up to `count` recent sessions, or `None` when fewer than two are available
    async fn fetch_history(&self, symbol: &str, count: usize) -> Option<Vec<Session>> {
        match self.provider.daily_sessions(symbol, count.max(2)).await {
            Ok(sessions) if sessions.len() >= 2 => Some(sessions),
            Ok(sessions) => {
                warn!("⚠️ {}: only {} session(s) available", symbol, sessions.len());
                None
            }
            Err(e) => {
                warn!("⚠️ {}: {}", symbol, e);
                None
            }
        }
    }

    /// The two most recent sessions of `symbol`, oldest first
    pub async fn fetch_sessions(&self, symbol: &str) -> Option<QuoteSnapshot> {
        let sessions = self.fetch_history(symbol, 2).await?;
        snapshot(symbol, &sessions)
    }

    /// Rank the universe by activity and by daily variation
    pub async fn compute_ranked_tables(&self, universe: &[UniverseEntry]) -> Retrieval<RankedTables> {
        info!("📊 Computing ranked tables over {} tickers", universe.len());

        let mut rows = Vec::with_capacity(universe.len());
        let mut unavailable = Vec::new();

        for entry in universe {
            let Some(history) = self
                .fetch_history(&entry.symbol, VOLUME_AVERAGE_SESSIONS + 1)
                .await
            else {
                unavailable.push(entry.symbol.clone());
                continue;
            };

            let intraday = match self.provider.intraday_volume(&entry.symbol).await {
                Ok(volume) => volume,
                Err(e) => {
                    debug!("No intraday volume for {}: {}", entry.symbol, e);
                    None
                }
            };

            if let Some(row) = metric_row(entry, &history, intraday) {
                rows.push(row);
            }
        }

        info!(
            "✅ {} tickers ranked, {} unavailable",
            rows.len(),
            unavailable.len()
        );

        Retrieval::new(rank_tables(&rows), unavailable)
    }

    /// Quote every fixed instrument of a flat table, in configuration order
    pub async fn compute_flat_table(&self, entries: &[FlatEntry]) -> Retrieval<Vec<FlatQuoteRow>> {
        let mut rows = Vec::with_capacity(entries.len());
        let mut unavailable = Vec::new();

        for entry in entries {
            let Some(symbol) = entry.symbol.as_deref() else {
                unavailable.push(format!("{} (no symbol)", entry.placeholder));
                rows.push(FlatQuoteRow::sentinel(entry));
                continue;
            };

            match self.fetch_sessions(symbol).await {
                Some(quote) => rows.push(FlatQuoteRow {
                    placeholder: entry.placeholder.clone(),
                    symbol: Some(symbol.to_string()),
                    close: Some(quote.current.close),
                    variation: flat_variation(&quote),
                }),
                None => {
                    unavailable.push(symbol.to_string());
                    rows.push(FlatQuoteRow::sentinel(entry));
                }
            }
        }

        Retrieval::new(rows, unavailable)
    }
}

fn snapshot(symbol: &str, sessions: &[Session]) -> Option<QuoteSnapshot> {
    match sessions {
        [.., previous, current] => Some(QuoteSnapshot {
            symbol: symbol.to_string(),
            previous: previous.clone(),
            current: current.clone(),
        }),
        _ => None,
    }
}

/// Fractional change of `value` against `reference`; undefined for a zero reference
pub fn variation(value: f64, reference: f64) -> Option<f64> {
    if reference == 0.0 || !reference.is_finite() || !value.is_finite() {
        return None;
    }
    Some((value - reference) / reference)
}

/// Daily variation of a fixed instrument.
///
/// Some indices report today's close as the previous close when only one
/// session is published; the intraday move against today's open is used
/// instead.
pub fn flat_variation(quote: &QuoteSnapshot) -> Option<f64> {
    let close = quote.current.close;
    let previous_close = quote.previous.close;

    if close == previous_close {
        let open = quote.current.open;
        if open != 0.0 && open != close {
            return variation(close, open);
        }
        return None;
    }

    variation(close, previous_close)
}

/// Today's volume against the average of the trailing sessions, 1.0 when unknown
pub fn volume_ratio(intraday_volume: Option<u64>, trailing: &[Session]) -> f64 {
    let Some(today) = intraday_volume else {
        return 1.0;
    };

    let volumes: Vec<u64> = trailing.iter().filter_map(|s| s.volume).collect();
    if volumes.is_empty() {
        return 1.0;
    }

    let average = volumes.iter().sum::<u64>() as f64 / volumes.len() as f64;
    if average == 0.0 {
        return 1.0;
    }

    today as f64 / average
}

fn metric_row(entry: &UniverseEntry, history: &[Session], intraday: Option<u64>) -> Option<MetricRow> {
    let (current, earlier) = history.split_last()?;
    let previous = earlier.last()?;

    let start = earlier.len().saturating_sub(VOLUME_AVERAGE_SESSIONS);
    let trailing = &earlier[start..];

    let multiple = if previous.close != 0.0 {
        Some(current.close / previous.close)
    } else {
        None
    };

    Some(MetricRow {
        name: entry.name.clone(),
        symbol: entry.symbol.clone(),
        close: current.close,
        variation: variation(current.close, previous.close),
        multiple,
        volume_ratio: volume_ratio(intraday, trailing),
    })
}

/// Stable top-N selection; ties keep universe order
fn top<F>(rows: &[MetricRow], compare: F) -> Vec<MetricRow>
where
    F: Fn(&MetricRow, &MetricRow) -> Ordering,
{
    let mut sorted: Vec<MetricRow> = rows.to_vec();
    sorted.sort_by(|a, b| compare(a, b));
    sorted.truncate(RANKED_TABLE_SIZE);
    sorted
}

/// Build the most active, best and worst views
pub fn rank_tables(rows: &[MetricRow]) -> RankedTables {
    let with_variation: Vec<MetricRow> = rows
        .iter()
        .filter(|r| r.variation.is_some())
        .cloned()
        .collect();

    let by_variation = |a: &MetricRow, b: &MetricRow| {
        let a = a.variation.unwrap_or(0.0);
        let b = b.variation.unwrap_or(0.0);
        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
    };

    RankedTables {
        most_active: top(rows, |a, b| {
            b.volume_ratio
                .partial_cmp(&a.volume_ratio)
                .unwrap_or(Ordering::Equal)
        }),
        best: top(&with_variation, |a, b| by_variation(b, a)),
        worst: top(&with_variation, by_variation),
    }
}
