//! Universe configuration files

use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;
use test_log::test;

use market_closing::models::{Universe, UniverseEntry};

#[test]
fn test_universe_file_overrides_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "ranked": [{{"name": "Alstom", "symbol": "ALO.PA"}}],
            "markets": [{{"placeholder": "{{{{^FCHI}}}}", "symbol": "^FCHI"}}],
            "sectors": [
                {{"placeholder": "{{{{Media}}}}", "symbol": ""}},
                {{"placeholder": "{{{{Travel}}}}"}}
            ]
        }}"#
    )
    .unwrap();

    let universe = Universe::from_file(file.path()).unwrap();

    assert_eq!(universe.ranked, vec![UniverseEntry::new("Alstom", "ALO.PA")]);
    assert_eq!(universe.markets[0].placeholder, "{{^FCHI}}");
    assert_eq!(universe.markets[0].symbol.as_deref(), Some("^FCHI"));
    assert_eq!(universe.sectors[0].symbol, None);
    assert_eq!(universe.sectors[1].symbol, None);
}

#[test]
fn test_invalid_universe_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();

    let err = Universe::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Invalid universe file"));
}

#[test]
fn test_index_components_join_ranked_universe_once() {
    let mut universe = Universe::default();
    let before = universe.ranked.len();

    let added = universe.extend_ranked(vec![
        UniverseEntry::new("Alstom", "ALO.PA"),
        UniverseEntry::new("Trigano", "TRI.PA"),
        UniverseEntry::new("Trigano", "TRI.PA"),
    ]);

    assert_eq!(added, 1);
    assert_eq!(universe.ranked.len(), before + 1);
    assert_eq!(universe.ranked.last().unwrap().symbol, "TRI.PA");
}
