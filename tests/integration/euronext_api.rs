//! Euronext index composition against a local mock server

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_log::test;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use market_closing::api::EuronextClient;
use market_closing::error::DataError;
use market_closing::models::{Config, Universe, UniverseEntry};
use market_closing::universe::CAC_SMALL_INDEX;

#[test(tokio::test)]
async fn test_index_components_become_paris_tickers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/indices/{}/components", CAC_SMALL_INDEX)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "components": [
                { "symbol": "TRI", "name": "Trigano" },
                { "symbol": "" },
                { "symbol": "BEN", "name": "Beneteau" }
            ]
        })))
        .mount(&server)
        .await;

    let config = Config {
        euronext_base_url: server.uri(),
        ..Config::default()
    };
    let client = EuronextClient::new(&config).unwrap();

    let entries = client.index_components(CAC_SMALL_INDEX).await.unwrap();
    assert_eq!(
        entries,
        vec![
            UniverseEntry::new("Trigano", "TRI.PA"),
            UniverseEntry::new("Beneteau", "BEN.PA"),
        ]
    );
}

#[test(tokio::test)]
async fn test_unknown_index_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = Config {
        euronext_base_url: server.uri(),
        ..Config::default()
    };
    let client = EuronextClient::new(&config).unwrap();

    assert_matches!(
        client.index_components("XX0000000000-XPAR").await,
        Err(DataError::Status { status: 500, .. })
    );
}

#[test(tokio::test)]
async fn test_failed_index_keeps_the_configured_universe() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/indices/{}/components", CAC_SMALL_INDEX)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/indices/FR0003999499-XPAR/components"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "components": [
                { "symbol": "ALO", "name": "Alstom" },
                { "symbol": "TRI", "name": "Trigano" }
            ]
        })))
        .mount(&server)
        .await;

    let config = Config {
        euronext_base_url: server.uri(),
        ..Config::default()
    };
    let client = EuronextClient::new(&config).unwrap();

    let mut universe = Universe::default();
    let configured = universe.ranked.clone();

    let added = universe
        .add_index_components(&client, &[CAC_SMALL_INDEX.to_string()])
        .await;
    assert_eq!(added, 0);
    assert_eq!(universe.ranked, configured);

    let added = universe
        .add_index_components(
            &client,
            &[CAC_SMALL_INDEX.to_string(), "FR0003999499-XPAR".to_string()],
        )
        .await;
    assert_eq!(added, 1);

    let mut expected = configured;
    expected.push(UniverseEntry::new("Trigano", "TRI.PA"));
    assert_eq!(universe.ranked, expected);
}
