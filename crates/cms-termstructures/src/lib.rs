//! # cms-termstructures
//!
//! Volatility smiles at a single expiry: the Hagan et al. (2002) SABR
//! implied-volatility formula and the `SmileSection` abstraction the
//! replication engine draws strike-dependent volatilities from.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// SABR parameters and the Hagan implied Black volatility.
pub mod sabr;

/// `SmileSection` trait with flat and SABR implementations.
pub mod smile_section;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use sabr::{
    sabr_branch, sabr_volatility, SabrBranch, SabrParameters, ATM_TOLERANCE, Z_TOLERANCE,
};
pub use smile_section::{FlatSmileSection, SabrSmileSection, SmileSection};
