//! Report assembly: retrieval of the three tables and placeholder filling

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::api::MarketDataProvider;
use crate::document::placeholder;
use crate::document::{Document, Rgb, TextStyle};
use crate::formatting::{
    format_percent, format_price, format_ratio, format_report_date, sign_color, BLACK, MISSING,
    NAME_BLUE,
};
use crate::market_data::{MarketDataRetriever, RANKED_TABLE_SIZE};
use crate::models::{Config, FlatQuoteRow, RankedTables, Retrieval, Universe};

/// First `{{MVTn}}` index of the markets table
pub const MARKETS_MVT_START: usize = 1;
/// First `{{MVTn}}` index of the sectors table
pub const SECTORS_MVT_START: usize = 10;

pub const DATE_TOKEN: &str = "{{DATE}}";

/// Everything the template needs, computed before the document is touched
#[derive(Debug, Clone, PartialEq)]
pub struct ReportData {
    pub date: NaiveDate,
    pub ranked: RankedTables,
    pub markets: Vec<FlatQuoteRow>,
    pub sectors: Vec<FlatQuoteRow>,
}

/// Font applied to every run the filler writes
#[derive(Debug, Clone, PartialEq)]
pub struct ReportStyle {
    pub base: TextStyle,
}

impl ReportStyle {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base: TextStyle::new(&config.font_name, config.font_size_pt),
        }
    }
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// `<dir>/<YYYY-MM-DD> daily closing.docx`
pub fn output_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{} daily closing.docx", date.format("%Y-%m-%d")))
}

/// Run the three retrievals in report order, merging the unavailable tickers
pub async fn collect_report_data<P>(
    retriever: &MarketDataRetriever<P>,
    universe: &Universe,
    date: NaiveDate,
) -> Retrieval<ReportData>
where
    P: MarketDataProvider + Sync,
{
    let ranked = retriever.compute_ranked_tables(&universe.ranked).await;
    info!("📈 Quoting {} market instruments", universe.markets.len());
    let markets = retriever.compute_flat_table(&universe.markets).await;
    info!("🏭 Quoting {} sectors", universe.sectors.len());
    let sectors = retriever.compute_flat_table(&universe.sectors).await;

    let mut unavailable = ranked.unavailable;
    unavailable.extend(markets.unavailable);
    unavailable.extend(sectors.unavailable);

    Retrieval::new(
        ReportData {
            date,
            ranked: ranked.value,
            markets: markets.value,
            sectors: sectors.value,
        },
        unavailable,
    )
}

/// Writes report values into a loaded template
pub struct TemplateFiller<'a> {
    document: &'a mut Document,
    base: TextStyle,
    /// Tokens the filler attempted, in order
    filled: Vec<String>,
}

impl<'a> TemplateFiller<'a> {
    pub fn new(document: &'a mut Document, style: &ReportStyle) -> Self {
        Self {
            document,
            base: style.base.clone(),
            filled: Vec::new(),
        }
    }

    fn fill(&mut self, token: &str, value: &str, color: Option<Rgb>) {
        if !placeholder::replace_first(self.document, token, value, &self.base, color) {
            debug!("Placeholder {} not found in template", token);
        }
        self.filled.push(token.to_string());
    }

    pub fn fill_date(&mut self, date: NaiveDate) {
        let value = format_report_date(date);
        self.fill(DATE_TOKEN, &value, None);
    }

    pub fn fill_ranked(&mut self, tables: &RankedTables) {
        if tables.is_empty() {
            warn!("⚠️ Ranked universe is empty, skipping the ranked table");
            return;
        }

        for i in 0..RANKED_TABLE_SIZE {
            let n = i + 1;

            if let Some(row) = tables.most_active.get(i) {
                self.fill(&format!("{{{{MOST ACTIVE STOCK {}}}}}", n), &row.name, Some(NAME_BLUE));
                self.fill(
                    &format!("{{{{MAS MULTIPLE {}}}}}", n),
                    &format_ratio(row.volume_ratio),
                    Some(NAME_BLUE),
                );
            }

            if let Some(row) = tables.best.get(i) {
                self.fill(&format!("{{{{BEST PERFORMER {}}}}}", n), &row.name, Some(NAME_BLUE));
                self.fill(
                    &format!("{{{{INCREASE {}}}}}", n),
                    &format_percent(row.variation),
                    Some(sign_color(row.variation)),
                );
            }

            if let Some(row) = tables.worst.get(i) {
                self.fill(&format!("{{{{WORST PERFORMER {}}}}}", n), &row.name, Some(NAME_BLUE));
                self.fill(
                    &format!("{{{{DECREASE {}}}}}", n),
                    &format_percent(row.variation),
                    Some(sign_color(row.variation)),
                );
            }
        }
    }

    /// Prices go to each row's own placeholder, variations to `{{MVTn}}` from `start`
    pub fn fill_flat(&mut self, rows: &[FlatQuoteRow], start: usize) {
        for (i, row) in rows.iter().enumerate() {
            let idx = start + i;
            if row.is_sentinel() {
                self.fill(&row.placeholder, MISSING, Some(BLACK));
                self.fill(&format!("{{{{MVT{}}}}}", idx), MISSING, Some(BLACK));
                continue;
            }

            self.fill(&row.placeholder, &format_price(row.close), None);
            self.fill(
                &format!("{{{{MVT{}}}}}", idx),
                &format_percent(row.variation),
                Some(sign_color(row.variation)),
            );
        }
    }

    /// Neutralise every marker left in the document; returns the markers replaced
    pub fn cleanup(self) -> Vec<String> {
        let replaced = placeholder::replace_remaining(self.document, MISSING, &self.base, Some(BLACK));

        for token in replaced.iter().filter(|t| self.filled.contains(*t)) {
            warn!("⚠️ {} occurs more than once in the template, extra copies set to '{}'", token, MISSING);
        }
        if !replaced.is_empty() {
            debug!("Cleared {} leftover placeholder(s)", replaced.len());
        }

        replaced
    }
}

/// Fill every table of the report into `document`
pub fn fill_report(document: &mut Document, data: &ReportData, style: &ReportStyle) -> Vec<String> {
    let mut filler = TemplateFiller::new(document, style);

    filler.fill_date(data.date);
    filler.fill_ranked(&data.ranked);
    filler.fill_flat(&data.markets, MARKETS_MVT_START);
    filler.fill_flat(&data.sectors, SECTORS_MVT_START);

    filler.cleanup()
}
