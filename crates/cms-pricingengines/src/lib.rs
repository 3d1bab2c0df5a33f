//! # cms-pricingengines
//!
//! Static replication of decompounded CMS payoffs against a continuum of
//! IRR-settled swaptions priced off a SABR smile.
//!
//! ## Building blocks
//!
//! - [`irr`]: level annuity IRR(K) and its strike derivatives
//! - [`payoff`]: the CMS payoff g(K) and its derivatives
//! - [`weight`]: replication weights h = g/IRR, h', h''
//! - [`black76`]: Black (1976) forward option formula
//! - [`swaption`]: IRR-settled payer/receiver swaptions
//! - [`integrand`]: h''(K) × swaption(K) replication kernels
//! - [`market`]: the (D, F, T, m, N) snapshot of one market cell
//! - [`config`]: beta, payoff shape, truncation and quadrature settings
//! - [`replication`]: [`CmsReplicationEngine`], assembling the PV

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod black76;
pub mod config;
pub mod integrand;
pub mod irr;
pub mod market;
pub mod payoff;
pub mod replication;
pub mod swaption;
pub mod weight;

pub use black76::{black76, black76_call, black76_put, OptionType};
pub use config::{ErrorPolicy, IntegrationConfig, QuadratureRule, ReplicationConfig};
pub use integrand::ReplicationIntegrand;
pub use irr::{irr, irr_prime, irr_second, Annuity};
pub use market::MarketSnapshot;
pub use payoff::{CmsPayoff, PowerPayoff};
pub use replication::{CmsReplicationEngine, ReplicationResult, Scenario};
pub use swaption::{irr_settled_swaption, payer_swaption, receiver_swaption, SwaptionType};
pub use weight::ReplicationWeight;
