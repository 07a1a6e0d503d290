//! Ticker universes of the daily closing report
//!
//! The built-in lists can be replaced by a JSON file with the same shape as
//! [`Universe`].

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::EuronextClient;
use crate::models::{FlatEntry, Universe, UniverseEntry};

/// Euronext index whose components complete the ranked universe (CAC Small)
pub const CAC_SMALL_INDEX: &str = "FR0003999481-XPAR";

const RANKED: &[(&str, &str)] = &[
    ("Alstom", "ALO.PA"),
    ("Vallourec", "VK.PA"),
    ("Rexel", "RXL.PA"),
    ("SEB", "SK.PA"),
    ("Eiffage", "FGR.PA"),
    ("Ipsen", "IPN.PA"),
    ("Sopra Steria", "SOP.PA"),
    ("Nexans", "NEX.PA"),
    ("Elis", "ELIS.PA"),
    ("Spie", "SPIE.PA"),
    ("Forvia", "FRVIA.PA"),
    ("Ubisoft", "UBI.PA"),
];

const MARKETS: &[(&str, &str)] = &[
    ("{{^STOXX50E}}", "^STOXX50E"),
    ("{{^GDAXI}}", "^GDAXI"),
    ("{{^FCHI}}", "^FCHI"),
    ("{{FTSEMIB.MI}}", "FTSEMIB.MI"),
    ("{{^VIX}}", "^VIX"),
    ("{{^EURUSD=X}}", "EURUSD=X"),
    ("{{GC=F}}", "GC=F"),
    ("{{CL=F}}", "CL=F"),
    ("{{BTC-EUR}}", "BTC-EUR"),
];

const SECTORS: &[(&str, &str)] = &[
    ("{{Auto}}", "^SXAP"),
    ("{{Banks}}", "^SX7E"),
    ("{{Basic Resources}}", "^SXPP"),
    ("{{Chemicals}}", "^SXCH"),
    ("{{Food & Beverages}}", "^SX3P"),
];

impl Default for Universe {
    fn default() -> Self {
        Self {
            ranked: RANKED
                .iter()
                .map(|(name, symbol)| UniverseEntry::new(name, symbol))
                .collect(),
            markets: MARKETS
                .iter()
                .map(|(placeholder, symbol)| FlatEntry::new(placeholder, Some(symbol)))
                .collect(),
            sectors: SECTORS
                .iter()
                .map(|(placeholder, symbol)| FlatEntry::new(placeholder, Some(symbol)))
                .collect(),
        }
    }
}

impl Universe {
    /// Load a universe from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read universe file {}", path.display()))?;
        let mut universe: Universe = serde_json::from_str(&content)
            .with_context(|| format!("Invalid universe file {}", path.display()))?;

        // Blank symbols in the file mean "always unavailable"
        for entry in universe.markets.iter_mut().chain(universe.sectors.iter_mut()) {
            if entry.symbol.as_deref().is_some_and(|s| s.trim().is_empty()) {
                entry.symbol = None;
            }
        }

        Ok(universe)
    }

    /// Append entries to the ranked universe, skipping symbols already present
    pub fn extend_ranked(&mut self, extra: impl IntoIterator<Item = UniverseEntry>) -> usize {
        let mut seen: HashSet<String> = self.ranked.iter().map(|e| e.symbol.clone()).collect();
        let before = self.ranked.len();

        for entry in extra {
            if seen.insert(entry.symbol.clone()) {
                self.ranked.push(entry);
            }
        }

        self.ranked.len() - before
    }

    /// Add the components of each index to the ranked universe.
    ///
    /// An index that cannot be fetched is logged and skipped, leaving the
    /// list as it was. Returns the number of tickers added.
    pub async fn add_index_components(&mut self, client: &EuronextClient, indices: &[String]) -> usize {
        let mut added = 0;

        for index in indices {
            match client.index_components(index).await {
                Ok(components) => {
                    let fetched = components.len();
                    let new = self.extend_ranked(components);
                    info!("🇫🇷 {}: {} components, {} new tickers", index, fetched, new);
                    added += new;
                }
                Err(e) => warn!("⚠️ Could not fetch components of {}: {}", index, e),
            }
        }

        added
    }
}
