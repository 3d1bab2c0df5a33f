//! # cms-replication
//!
//! Static replication of decompounded CMS payoffs against IRR-settled
//! swaptions priced off a SABR smile.
//!
//! This crate is a façade over the workspace crates, plus the glue the
//! `cmsrep` binary needs: configuration loading, per-cell pricing and
//! report rendering.
//!
//! ```rust
//! use cms_replication::pricingengines::{CmsReplicationEngine, MarketSnapshot, ReplicationConfig};
//!
//! let config = ReplicationConfig::default();
//! let params = config.sabr_parameters(0.1766, -0.4089, 0.3031).unwrap();
//! let engine = CmsReplicationEngine::new(config).unwrap();
//! let snapshot = MarketSnapshot::new(0.9859, 0.0437, 5.0, 2, 10.0).unwrap();
//! let v0 = engine.price_unconditional(&snapshot, &params).unwrap();
//! assert!((v0.pv - 0.246166).abs() < 1e-5);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Scalar aliases and the error type.
pub use cms_core as core;

/// Normal distribution, comparisons and quadrature.
pub use cms_math as math;

/// SABR volatility and smile sections.
pub use cms_termstructures as termstructures;

/// IRR annuity, payoff, swaptions and the replication engine.
pub use cms_pricingengines as pricingengines;

/// CSV market data tables.
pub use cms_marketdata as marketdata;

pub mod pricing;
pub mod report;
pub mod settings;
