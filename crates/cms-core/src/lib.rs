//! # cms-core
//!
//! Scalar aliases and the error type shared by every crate of the
//! replication workspace.
//!
//! The aliases are all `f64` (or `usize`); they exist so that signatures
//! such as `payer_swaption(D, F, K, σ, T, ..)` say which quantity goes where.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// `Error`, `Result` and the `ensure!` / `ensure_post!` macros.
pub mod errors;

/// Plain floating-point value.
pub type Real = f64;

/// Counts: integrand evaluations, sub-intervals.
pub type Size = usize;

/// Swap rate or strike, as a decimal (0.0437 = 4.37 %).
pub type Rate = Real;

/// Discount factor to the payment date.
pub type DiscountFactor = Real;

/// Present value per unit notional.
pub type Price = Real;

/// Black implied volatility, as a decimal.
pub type Volatility = Real;

/// Year fraction.
pub type Time = Real;

pub use errors::{Error, Result};
