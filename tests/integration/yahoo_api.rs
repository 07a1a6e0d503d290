//! Yahoo chart client against a local mock server

use assert_matches::assert_matches;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_log::test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use market_closing::api::{MarketDataProvider, YahooClient};
use market_closing::error::DataError;
use market_closing::market_data::MarketDataRetriever;
use market_closing::models::Config;

fn config_for(server: &MockServer) -> Config {
    Config {
        market_data_base_url: server.uri(),
        rate_limit_per_minute: 0,
        ..Config::default()
    }
}

fn daily_chart() -> serde_json::Value {
    json!({
        "chart": {
            "result": [{
                "meta": { "symbol": "ALO.PA", "gmtoffset": 3600 },
                "timestamp": [1768896000, 1768982400],
                "indicators": { "quote": [{
                    "open":   [21.0, 21.4],
                    "close":  [21.5, 22.0],
                    "volume": [1500000, 2100000]
                }]}
            }],
            "error": null
        }
    })
}

#[test(tokio::test)]
async fn test_daily_sessions_from_chart_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/ALO.PA"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_chart()))
        .expect(1)
        .mount(&server)
        .await;

    let client = YahooClient::new(&config_for(&server)).unwrap();
    let sessions = client.daily_sessions("ALO.PA", 2).await.unwrap();

    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].date, NaiveDate::from_ymd_opt(2026, 1, 20).unwrap());
    assert_eq!(sessions[1].close, 22.0);
    assert_eq!(sessions[1].volume, Some(2_100_000));
}

#[test(tokio::test)]
async fn test_http_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let client = YahooClient::new(&config_for(&server)).unwrap();
    let result = client.daily_sessions("NOPE.PA", 2).await;

    assert_matches!(result, Err(DataError::Status { status: 404, .. }));
}

#[test(tokio::test)]
async fn test_retriever_over_http_records_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/ALO.PA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_chart()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/DEAD.PA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chart": { "result": null, "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" } }
        })))
        .mount(&server)
        .await;

    let retriever = MarketDataRetriever::new(YahooClient::new(&config_for(&server)).unwrap());

    let quote = retriever.fetch_sessions("ALO.PA").await.unwrap();
    assert_eq!(quote.previous.close, 21.5);
    assert_eq!(quote.current.close, 22.0);

    assert_eq!(retriever.fetch_sessions("DEAD.PA").await, None);
}
