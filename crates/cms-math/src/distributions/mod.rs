//! Probability distributions.
//!
//! Only the standard normal is needed by the pricing core; it delegates to
//! the `statrs` error functions.

pub mod normal;

pub use normal::normal_cdf;
