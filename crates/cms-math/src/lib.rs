//! # cms-math
//!
//! Mathematical utilities for the replication engine: the standard normal
//! distribution (via statrs), floating-point comparison helpers, and
//! numerical integration.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Floating-point comparison utilities.
pub mod comparison;

/// Probability distributions.
pub mod distributions;

/// Numerical integration.
pub mod integrals;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use comparison::{close, relative_close, MARKET_TOLERANCE};
pub use distributions::normal_cdf;
pub use integrals::{GaussKronrodAdaptive, IntegrationResult, Integrator, SimpsonIntegral};
