use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::error::DataError;
use crate::models::{Config, UniverseEntry};

/// Suffix of Euronext Paris listings on the market data source
const PARIS_SUFFIX: &str = ".PA";

#[derive(Debug, Deserialize)]
struct ComponentsResponse {
    #[serde(default)]
    components: Vec<Component>,
}

#[derive(Debug, Deserialize)]
struct Component {
    #[serde(default)]
    symbol: String,
    #[serde(default)]
    name: Option<String>,
}

/// Client for Euronext index composition
pub struct EuronextClient {
    client: Client,
    base_url: String,
}

impl EuronextClient {
    pub fn new(config: &Config) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: config.euronext_base_url.clone(),
        })
    }

    /// Components of an index identified as `ISIN-MIC`, e.g. `FR0003999481-XPAR`
    pub async fn index_components(&self, index: &str) -> Result<Vec<UniverseEntry>, DataError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| DataError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(&["api", "v1", "indices", index, "components"]);

        debug!("Making request to: {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::Status { status, body });
        }

        let payload: ComponentsResponse = response.json().await?;
        let entries = components_to_entries(payload);

        info!("📋 Index {} has {} components", index, entries.len());
        Ok(entries)
    }
}

fn components_to_entries(payload: ComponentsResponse) -> Vec<UniverseEntry> {
    payload
        .components
        .into_iter()
        .filter_map(|component| {
            let symbol = component.symbol.trim();
            if symbol.is_empty() {
                return None;
            }
            let ticker = format!("{}{}", symbol, PARIS_SUFFIX);
            let name = component
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| ticker.clone());
            Some(UniverseEntry { name, symbol: ticker })
        })
        .collect()
}
