use chrono::{DateTime, NaiveDate};
use reqwest::{header::{HeaderMap, HeaderValue}, Client};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{ApiRateLimiter, MarketDataProvider};
use crate::error::DataError;
use crate::models::{Config, Session};

/// Yahoo Finance chart API client
pub struct YahooClient {
    client: Client,
    base_url: String,
    rate_limiter: ApiRateLimiter,
}

impl YahooClient {
    /// Create a new Yahoo client
    pub fn new(config: &Config) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (market-closing/1.0)")
            .build()?;

        Ok(Self {
            client,
            base_url: config.market_data_base_url.clone(),
            rate_limiter: ApiRateLimiter::new(config.rate_limit_per_minute),
        })
    }

    fn chart_url(&self, symbol: &str, range: &str, interval: &str) -> Result<Url, DataError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| DataError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(&["v8", "finance", "chart", symbol]);
        url.query_pairs_mut()
            .append_pair("range", range)
            .append_pair("interval", interval)
            .append_pair("includePrePost", "false");
        Ok(url)
    }

    /// Make a rate limited request to the chart API
    async fn make_request(&self, url: Url) -> Result<Value, DataError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        self.rate_limiter.wait().await;

        debug!("Making request to: {}", url);

        let response = self.client.get(url).headers(headers).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::Status { status, body });
        }

        Ok(response.json().await?)
    }
}

/// Range parameter wide enough to cover `count` trading sessions
fn range_for(count: usize) -> &'static str {
    match count {
        0..=5 => "5d",
        6..=20 => "1mo",
        21..=60 => "3mo",
        _ => "1y",
    }
}

fn invalid(symbol: &str, reason: &str) -> DataError {
    DataError::InvalidResponse {
        symbol: symbol.to_string(),
        reason: reason.to_string(),
    }
}

/// First chart result, or `None` when the source has no bars for the symbol
fn chart_result<'a>(symbol: &str, data: &'a Value) -> Result<Option<&'a Value>, DataError> {
    let chart = data.get("chart").ok_or_else(|| invalid(symbol, "missing 'chart'"))?;

    if let Some(error) = chart.get("error").filter(|e| !e.is_null()) {
        let description = error
            .get("description")
            .and_then(|d| d.as_str())
            .unwrap_or("unknown error");
        return Err(invalid(symbol, description));
    }

    Ok(chart
        .get("result")
        .and_then(|r| r.as_array())
        .and_then(|r| r.first()))
}

fn series<'a>(quote: &'a Value, field: &str) -> &'a [Value] {
    quote
        .get(field)
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Normalise a daily chart response into sessions, oldest first.
///
/// Bars without an open or close are dropped. When the source repeats the
/// current day (live bar plus daily bar) the later bar wins.
pub fn parse_daily_sessions(symbol: &str, data: &Value) -> Result<Vec<Session>, DataError> {
    let Some(result) = chart_result(symbol, data)? else {
        return Ok(Vec::new());
    };

    let gmt_offset = result
        .get("meta")
        .and_then(|m| m.get("gmtoffset"))
        .and_then(|v| v.as_i64())
        .unwrap_or(0);

    let timestamps = series(result, "timestamp");
    let quote = result
        .get("indicators")
        .and_then(|i| i.get("quote"))
        .and_then(|q| q.as_array())
        .and_then(|q| q.first());

    let Some(quote) = quote else {
        return Ok(Vec::new());
    };

    let opens = series(quote, "open");
    let closes = series(quote, "close");
    let volumes = series(quote, "volume");

    let mut sessions: Vec<Session> = Vec::with_capacity(timestamps.len());

    for (i, timestamp) in timestamps.iter().enumerate() {
        let Some(timestamp) = timestamp.as_i64() else {
            continue;
        };
        let open = opens.get(i).and_then(|v| v.as_f64());
        let close = closes.get(i).and_then(|v| v.as_f64());
        let (Some(open), Some(close)) = (open, close) else {
            continue;
        };

        let date = match DateTime::from_timestamp(timestamp + gmt_offset, 0) {
            Some(dt) => dt.date_naive(),
            None => return Err(invalid(symbol, "timestamp out of range")),
        };

        let session = Session {
            date,
            open,
            close,
            volume: volumes.get(i).and_then(|v| v.as_u64()),
        };

        match sessions.last_mut() {
            Some(last) if last.date == date => *last = session,
            _ => sessions.push(session),
        }
    }

    Ok(sessions)
}

/// Sum the volume of every intraday bar in a chart response
pub fn parse_intraday_volume(symbol: &str, data: &Value) -> Result<Option<u64>, DataError> {
    let Some(result) = chart_result(symbol, data)? else {
        return Ok(None);
    };

    let volumes: Vec<u64> = result
        .get("indicators")
        .and_then(|i| i.get("quote"))
        .and_then(|q| q.as_array())
        .and_then(|q| q.first())
        .map(|quote| series(quote, "volume").iter().filter_map(|v| v.as_u64()).collect())
        .unwrap_or_default();

    if volumes.is_empty() {
        return Ok(None);
    }

    Ok(Some(volumes.iter().sum()))
}

#[async_trait::async_trait]
impl MarketDataProvider for YahooClient {
    async fn daily_sessions(&self, symbol: &str, count: usize) -> Result<Vec<Session>, DataError> {
        let url = self.chart_url(symbol, range_for(count), "1d")?;
        let data = self.make_request(url).await?;

        let mut sessions = parse_daily_sessions(symbol, &data)?;
        if sessions.len() > count {
            sessions.drain(..sessions.len() - count);
        }

        debug!(
            "Retrieved {} sessions for {} ({})",
            sessions.len(),
            symbol,
            sessions
                .last()
                .map(|s| s.date)
                .unwrap_or(NaiveDate::MIN)
        );
        Ok(sessions)
    }

    async fn intraday_volume(&self, symbol: &str) -> Result<Option<u64>, DataError> {
        let url = self.chart_url(symbol, "1d", "5m")?;
        let data = self.make_request(url).await?;
        parse_intraday_volume(symbol, &data)
    }
}
