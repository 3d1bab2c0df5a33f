//! # cms-marketdata
//!
//! Loads the three flat tables a replication run needs and turns a
//! `(expiry, tenor)` cell into a [`MarketSnapshot`] plus SABR parameters.
//!
//! | table      | columns                          |
//! |------------|----------------------------------|
//! | SABR       | `Expiry,Tenor,Alpha,Rho,Nu`      |
//! | discount   | `Tenor,OIS Discount Factor`      |
//! | swap rates | `Expiry,Tenor,Swap_Rate`         |
//!
//! [`MarketSnapshot`]: cms_pricingengines::MarketSnapshot

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod csv_source;
pub mod error;
pub mod provider;
pub mod tenor;

pub use csv_source::{CsvMarketData, SabrQuote};
pub use error::{MarketDataError, Result};
pub use provider::MarketDataProvider;
pub use tenor::{normalize_label, parse_years};
