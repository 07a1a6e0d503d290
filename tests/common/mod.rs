//! Common test utilities and helpers

#![allow(dead_code)]

/// Logging utilities for tests
pub mod logging {
    use std::sync::Once;
    use tracing::{debug, info};

    static INIT: Once = Once::new();

    /// Initialize test logging
    pub fn init_test_logging() {
        INIT.call_once(|| {
            // Another test harness may already have installed a subscriber
            let _ = tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .with_env_filter("market_closing=debug,main=debug")
                    .with_test_writer()
                    .finish(),
            );
        });
    }

    /// Log test step
    pub fn log_test_step(step: &str) {
        info!("🧪 Test Step: {}", step);
    }

    /// Log test data
    pub fn log_test_data<T: std::fmt::Debug>(label: &str, data: &T) {
        debug!("📊 {}: {:?}", label, data);
    }
}

/// Test data utilities
pub mod test_data {
    use chrono::{Duration, NaiveDate};
    use market_closing::models::{FlatEntry, Session, Universe, UniverseEntry};

    pub fn report_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 21).unwrap()
    }

    /// `count` daily sessions ending on the report date: all but the last
    /// open and close at `previous_close`, the last one at `open`/`close`.
    pub fn sessions(previous_close: f64, open: f64, close: f64, count: usize) -> Vec<Session> {
        let first = report_date() - Duration::days(count as i64 - 1);
        (0..count)
            .map(|i| {
                let today = i + 1 == count;
                Session {
                    date: first + Duration::days(i as i64),
                    open: if today { open } else { previous_close },
                    close: if today { close } else { previous_close },
                    volume: Some(100),
                }
            })
            .collect()
    }

    /// Small universe covering every report path: ranked names, one
    /// unresolvable ticker, and a market entry without symbol.
    pub fn create_test_universe() -> Universe {
        Universe {
            ranked: vec![
                UniverseEntry::new("Alstom", "ALO.PA"),
                UniverseEntry::new("Vallourec", "VK.PA"),
                UniverseEntry::new("Rexel", "RXL.PA"),
                UniverseEntry::new("Bogus", "BOGUS.PA"),
            ],
            markets: vec![
                FlatEntry::new("{{^FCHI}}", Some("^FCHI")),
                FlatEntry::new("{{^VIX}}", Some("^VIX")),
                FlatEntry::new("{{BTC-EUR}}", None),
            ],
            sectors: vec![FlatEntry::new("{{Auto}}", Some("^SXAP"))],
        }
    }
}

/// In-memory market data source
pub mod provider {
    use std::collections::HashMap;

    use market_closing::api::MarketDataProvider;
    use market_closing::error::DataError;
    use market_closing::models::Session;

    use super::test_data::sessions;

    #[derive(Debug, Default)]
    pub struct FakeProvider {
        daily: HashMap<String, Vec<Session>>,
        intraday: HashMap<String, u64>,
    }

    impl FakeProvider {
        pub fn with_sessions(mut self, symbol: &str, sessions: Vec<Session>) -> Self {
            self.daily.insert(symbol.to_string(), sessions);
            self
        }

        pub fn with_intraday(mut self, symbol: &str, volume: u64) -> Self {
            self.intraday.insert(symbol.to_string(), volume);
            self
        }
    }

    #[async_trait::async_trait]
    impl MarketDataProvider for FakeProvider {
        async fn daily_sessions(&self, symbol: &str, count: usize) -> Result<Vec<Session>, DataError> {
            match self.daily.get(symbol) {
                Some(all) => Ok(all[all.len().saturating_sub(count)..].to_vec()),
                None => Err(DataError::Status {
                    status: 404,
                    body: format!("No data for {}", symbol),
                }),
            }
        }

        async fn intraday_volume(&self, symbol: &str) -> Result<Option<u64>, DataError> {
            Ok(self.intraday.get(symbol).copied())
        }
    }

    /// Market data matching [`super::test_data::create_test_universe`]
    pub fn create_test_provider() -> FakeProvider {
        FakeProvider::default()
            .with_sessions("ALO.PA", sessions(10.0, 10.0, 10.5, 12))
            .with_intraday("ALO.PA", 300)
            .with_sessions("VK.PA", sessions(20.0, 20.0, 19.0, 12))
            .with_intraday("VK.PA", 100)
            .with_sessions("RXL.PA", sessions(30.0, 30.0, 30.3, 12))
            .with_sessions("^FCHI", sessions(100.0, 98.0, 100.0, 2))
            .with_sessions("^VIX", sessions(20.0, 20.0, 19.0, 2))
            .with_sessions("^SXAP", sessions(500.0, 500.0, 505.0, 2))
    }
}

/// Closing report templates
pub mod templates {
    use market_closing::document::{Block, Cell, Document, DocxFile, Paragraph, Rgb, Row, Run, Table};
    use market_closing::models::{FlatEntry, Universe};
    use market_closing::report::{MARKETS_MVT_START, SECTORS_MVT_START};

    fn flat_table(entries: &[FlatEntry], start: usize) -> Table {
        Table::new(
            entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    Row::new(vec![
                        Cell::from_text(&entry.placeholder),
                        Cell::from_text(&format!("{{{{MVT{}}}}}", start + i)),
                    ])
                })
                .collect(),
        )
    }

    /// Document laid out like the closing template for `universe`
    pub fn closing_document(universe: &Universe) -> Document {
        let ranked = Table::new(
            (1..=5)
                .map(|i| {
                    Row::new(
                        [
                            "MOST ACTIVE STOCK",
                            "MAS MULTIPLE",
                            "BEST PERFORMER",
                            "INCREASE",
                            "WORST PERFORMER",
                            "DECREASE",
                        ]
                        .iter()
                        .map(|label| Cell::from_text(&format!("{{{{{} {}}}}}", label, i)))
                        .collect(),
                    )
                })
                .collect(),
        );

        Document::new(vec![
            // Word tends to split markers over several runs
            Block::Paragraph(Paragraph::new(vec![
                Run::new("Market closing of "),
                Run::new("{{DA"),
                Run::new("TE}}"),
            ])),
            Block::Table(ranked),
            Block::Table(flat_table(&universe.markets, MARKETS_MVT_START)),
            Block::Table(flat_table(&universe.sectors, SECTORS_MVT_START)),
            Block::Paragraph(Paragraph::from_text("Legacy marker {{UNUSED}}")),
            Block::Opaque("<w:sectPr><w:pgSz w:w=\"11906\" w:h=\"16838\"/></w:sectPr>".to_string()),
        ])
    }

    pub fn closing_template(universe: &Universe) -> DocxFile {
        DocxFile::from_document(closing_document(universe))
    }

    /// Colour of the first run whose text is exactly `text`
    pub fn color_of(document: &Document, text: &str) -> Option<Rgb> {
        document
            .paragraphs()
            .iter()
            .flat_map(|p| p.runs())
            .find(|r| r.text == text)
            .and_then(|r| r.style.as_ref().and_then(|s| s.color))
    }

    /// Texts of the cells of the `index`-th top-level table, row by row
    pub fn table_texts(document: &Document, index: usize) -> Vec<Vec<String>> {
        let table = document
            .body
            .iter()
            .filter_map(|block| match block {
                Block::Table(table) => Some(table),
                _ => None,
            })
            .nth(index)
            .expect("table index out of range");

        table
            .rows()
            .map(|row| {
                row.cells()
                    .map(|cell| {
                        cell.blocks
                            .iter()
                            .filter_map(|b| match b {
                                Block::Paragraph(p) => Some(p.text()),
                                _ => None,
                            })
                            .collect::<Vec<_>>()
                            .join("\n")
                    })
                    .collect()
            })
            .collect()
    }
}
