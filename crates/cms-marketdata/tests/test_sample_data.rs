//! Checks the sample tables shipped under `data/`.

use std::path::PathBuf;

use cms_marketdata::{CsvMarketData, MarketDataError, MarketDataProvider};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("data")
}

fn load() -> CsvMarketData {
    let dir = data_dir();
    CsvMarketData::from_paths(
        dir.join("sabr.csv"),
        dir.join("discount.csv"),
        dir.join("swap_rates.csv"),
    )
    .expect("sample market data should load")
}

#[test]
fn test_every_sabr_cell_has_a_snapshot() {
    let data = load();
    let cells = data.cells();
    assert_eq!(cells.len(), 9);
    for (expiry, tenor) in cells {
        let s = data.snapshot(&expiry, &tenor, 2).unwrap();
        assert!(s.forward > 0.0 && s.forward < 0.1);
        assert!(s.discount > 0.9 && s.discount <= 1.0);
        data.sabr(&expiry, &tenor, 0.9).unwrap();
    }
}

#[test]
fn test_reference_cell() {
    let data = load();
    let s = data.snapshot("5Y", "10Y", 2).unwrap();
    assert_eq!((s.discount, s.forward, s.expiry, s.tenor), (0.9859, 0.0437, 5.0, 10.0));
}

#[test]
fn test_missing_file_reports_path() {
    let dir = data_dir();
    let err = CsvMarketData::from_paths(
        dir.join("no_such_table.csv"),
        dir.join("discount.csv"),
        dir.join("swap_rates.csv"),
    )
    .unwrap_err();
    assert!(matches!(err, MarketDataError::Io { .. }));
    assert!(err.to_string().contains("no_such_table.csv"));
}
