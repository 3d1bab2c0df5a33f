//! CSV-backed market data.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use cms_core::{DiscountFactor, Rate, Real};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::error::{MarketDataError, Result};
use crate::provider::MarketDataProvider;
use crate::tenor::{normalize_label, parse_years};

const SABR_TABLE: &str = "SABR";
const DISCOUNT_TABLE: &str = "discount";
const SWAP_RATE_TABLE: &str = "swap rate";

/// SABR parameters as quoted, without beta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SabrQuote {
    /// Vol level α.
    pub alpha: Real,
    /// Spot-vol correlation ρ.
    pub rho: Real,
    /// Vol-of-vol ν.
    pub nu: Real,
}

#[derive(Debug, Deserialize)]
struct SabrRow {
    #[serde(rename = "Expiry")]
    expiry: String,
    #[serde(rename = "Tenor")]
    tenor: String,
    #[serde(rename = "Alpha")]
    alpha: Real,
    #[serde(rename = "Rho")]
    rho: Real,
    #[serde(rename = "Nu")]
    nu: Real,
}

#[derive(Debug, Deserialize)]
struct DiscountRow {
    #[serde(rename = "Tenor")]
    tenor: String,
    #[serde(rename = "OIS Discount Factor")]
    discount: DiscountFactor,
}

#[derive(Debug, Deserialize)]
struct SwapRateRow {
    #[serde(rename = "Expiry")]
    expiry: String,
    #[serde(rename = "Tenor")]
    tenor: String,
    #[serde(rename = "Swap_Rate")]
    rate: Rate,
}

type CellKey = (String, String);

fn cell_key(expiry: &str, tenor: &str) -> CellKey {
    (normalize_label(expiry), normalize_label(tenor))
}

fn describe(key: &CellKey) -> String {
    format!("{} x {}", key.0, key.1)
}

/// Market data held in memory after reading the three CSV tables.
#[derive(Debug, Clone, Default)]
pub struct CsvMarketData {
    sabr: HashMap<CellKey, SabrQuote>,
    discount: HashMap<String, DiscountFactor>,
    swap_rates: HashMap<CellKey, Rate>,
}

impl CsvMarketData {
    /// Load the tables from files.
    pub fn from_paths(
        sabr: impl AsRef<Path>,
        discount: impl AsRef<Path>,
        swap_rates: impl AsRef<Path>,
    ) -> Result<Self> {
        let open = |path: &Path| {
            File::open(path).map_err(|source| MarketDataError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        Self::from_readers(
            open(sabr.as_ref())?,
            open(discount.as_ref())?,
            open(swap_rates.as_ref())?,
        )
    }

    /// Load the tables from any readers holding CSV with a header row.
    pub fn from_readers(sabr: impl Read, discount: impl Read, swap_rates: impl Read) -> Result<Self> {
        let mut data = Self::default();

        for row in read_rows::<SabrRow>(sabr, SABR_TABLE)? {
            let key = cell_key(&row.expiry, &row.tenor);
            check_labels(&key)?;
            let quote = SabrQuote {
                alpha: row.alpha,
                rho: row.rho,
                nu: row.nu,
            };
            if data.sabr.insert(key.clone(), quote).is_some() {
                return Err(duplicate(SABR_TABLE, describe(&key)));
            }
        }

        for row in read_rows::<DiscountRow>(discount, DISCOUNT_TABLE)? {
            let key = normalize_label(&row.tenor);
            parse_years(&key)?;
            if data.discount.insert(key.clone(), row.discount).is_some() {
                return Err(duplicate(DISCOUNT_TABLE, key));
            }
        }

        for row in read_rows::<SwapRateRow>(swap_rates, SWAP_RATE_TABLE)? {
            let key = cell_key(&row.expiry, &row.tenor);
            check_labels(&key)?;
            if data.swap_rates.insert(key.clone(), row.rate).is_some() {
                return Err(duplicate(SWAP_RATE_TABLE, describe(&key)));
            }
        }

        debug!(
            sabr = data.sabr.len(),
            discount = data.discount.len(),
            swap_rates = data.swap_rates.len(),
            "loaded market data"
        );
        Ok(data)
    }

    /// Every `(expiry, tenor)` cell with a SABR quote, ordered by expiry
    /// then tenor length.
    pub fn cells(&self) -> Vec<(String, String)> {
        let mut cells: Vec<_> = self.sabr.keys().cloned().collect();
        // labels were validated on load
        let years = |label: &str| parse_years(label).unwrap_or(Real::MAX);
        cells.sort_by(|a, b| {
            years(&a.0)
                .total_cmp(&years(&b.0))
                .then(years(&a.1).total_cmp(&years(&b.1)))
        });
        cells
    }
}

impl MarketDataProvider for CsvMarketData {
    fn discount_factor(&self, maturity: &str) -> Result<DiscountFactor> {
        let key = normalize_label(maturity);
        self.discount
            .get(&key)
            .copied()
            .ok_or(MarketDataError::MissingQuote {
                table: DISCOUNT_TABLE,
                key,
            })
    }

    fn swap_rate(&self, expiry: &str, tenor: &str) -> Result<Rate> {
        let key = cell_key(expiry, tenor);
        self.swap_rates
            .get(&key)
            .copied()
            .ok_or_else(|| missing(SWAP_RATE_TABLE, &key))
    }

    fn sabr_quote(&self, expiry: &str, tenor: &str) -> Result<SabrQuote> {
        let key = cell_key(expiry, tenor);
        self.sabr
            .get(&key)
            .copied()
            .ok_or_else(|| missing(SABR_TABLE, &key))
    }
}

fn read_rows<T: DeserializeOwned>(reader: impl Read, table: &'static str) -> Result<Vec<T>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|source| MarketDataError::Csv { table, source })
}

fn check_labels(key: &CellKey) -> Result<()> {
    parse_years(&key.0)?;
    parse_years(&key.1)?;
    Ok(())
}

fn duplicate(table: &'static str, key: String) -> MarketDataError {
    MarketDataError::DuplicateQuote { table, key }
}

fn missing(table: &'static str, key: &CellKey) -> MarketDataError {
    MarketDataError::MissingQuote {
        table,
        key: describe(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SABR: &str = "Expiry,Tenor,Alpha,Rho,Nu\n5Y,10Y,0.1766,-0.4089,0.3031\n1Y,5Y,0.1705,-0.3520,0.4490\n";
    const DISCOUNT: &str = "Tenor,OIS Discount Factor\n1Y,0.9972\n5Y,0.9859\n";
    const SWAP: &str = "Expiry,Tenor,Swap_Rate\n5Y,10Y,0.0437\n1Y,5Y,0.0398\n";

    fn data() -> CsvMarketData {
        CsvMarketData::from_readers(SABR.as_bytes(), DISCOUNT.as_bytes(), SWAP.as_bytes()).unwrap()
    }

    #[test]
    fn snapshot_uses_expiry_discount() {
        let s = data().snapshot("5Y", "10Y", 2).unwrap();
        assert_eq!(s.discount, 0.9859);
        assert_eq!(s.forward, 0.0437);
        assert_eq!(s.expiry, 5.0);
        assert_eq!(s.tenor, 10.0);
        assert_eq!(s.frequency, 2);
    }

    #[test]
    fn sabr_applies_fixed_beta() {
        let p = data().sabr("5y", " 10Y", 0.9).unwrap();
        assert_relative_eq!(p.alpha, 0.1766);
        assert_eq!(p.beta, 0.9);
        assert_relative_eq!(p.rho, -0.4089);
        assert_relative_eq!(p.nu, 0.3031);
    }

    #[test]
    fn missing_cells_are_reported() {
        let d = data();
        match d.snapshot("10Y", "10Y", 2) {
            Err(MarketDataError::MissingQuote { table, key }) => {
                assert_eq!(table, DISCOUNT_TABLE);
                assert_eq!(key, "10Y");
            }
            other => panic!("expected a missing quote, got {other:?}"),
        }
        match d.sabr_quote("5Y", "5Y") {
            Err(MarketDataError::MissingQuote { table, key }) => {
                assert_eq!(table, SABR_TABLE);
                assert_eq!(key, "5Y x 5Y");
            }
            other => panic!("expected a missing quote, got {other:?}"),
        }
    }

    #[test]
    fn cells_are_ordered_by_expiry() {
        assert_eq!(
            data().cells(),
            vec![
                ("1Y".to_string(), "5Y".to_string()),
                ("5Y".to_string(), "10Y".to_string())
            ]
        );
    }

    #[test]
    fn malformed_tables_are_rejected() {
        let bad_number = "Expiry,Tenor,Alpha,Rho,Nu\n5Y,10Y,abc,-0.4,0.3\n";
        assert!(matches!(
            CsvMarketData::from_readers(bad_number.as_bytes(), DISCOUNT.as_bytes(), SWAP.as_bytes()),
            Err(MarketDataError::Csv { table: SABR_TABLE, .. })
        ));

        let bad_label = "Tenor,OIS Discount Factor\n5W,0.99\n";
        assert!(matches!(
            CsvMarketData::from_readers(SABR.as_bytes(), bad_label.as_bytes(), SWAP.as_bytes()),
            Err(MarketDataError::InvalidLabel(_))
        ));

        let dup = "Expiry,Tenor,Swap_Rate\n5Y,10Y,0.0437\n5y,10Y,0.0438\n";
        assert!(matches!(
            CsvMarketData::from_readers(SABR.as_bytes(), DISCOUNT.as_bytes(), dup.as_bytes()),
            Err(MarketDataError::DuplicateQuote { .. })
        ));
    }

    #[test]
    fn invalid_quotes_surface_as_invalid() {
        let bad_rho = "Expiry,Tenor,Alpha,Rho,Nu\n5Y,10Y,0.1766,-1.5,0.3031\n";
        let d = CsvMarketData::from_readers(bad_rho.as_bytes(), DISCOUNT.as_bytes(), SWAP.as_bytes())
            .unwrap();
        assert!(matches!(d.sabr("5Y", "10Y", 0.9), Err(MarketDataError::Invalid(_))));
    }
}
