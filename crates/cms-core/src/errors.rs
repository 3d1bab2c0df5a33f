//! Error types for cms-replication.
//!
//! A single `thiserror`-derived enum covers the failure modes of the numeric
//! core. Precondition and postcondition checks go through the `ensure!` and
//! `ensure_post!` macros defined here.

use thiserror::Error;

/// The top-level error type used throughout cms-replication.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Precondition violated (bad inputs).
    #[error("invalid input: {0}")]
    Precondition(String),

    /// Postcondition violated (result failed a sanity or tolerance check).
    #[error("result check failed: {0}")]
    Postcondition(String),

    /// An argument outside the domain of a numerical routine.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Numerical integration did not produce a usable result.
    #[error("integration failed: {message} (estimated error {abs_error:e})")]
    Integration {
        /// What went wrong.
        message: String,
        /// Absolute error estimate reported when the integrator gave up.
        abs_error: f64,
    },
}

/// Shorthand `Result` type used throughout cms-replication.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Bail out with [`Error::Precondition`] unless `$cond` holds.
///
/// The error is converted with `.into()`, so the macro also works in
/// functions returning an error type that wraps [`Error`].
///
/// ```
/// use cms_core::{ensure, errors::Result};
///
/// fn annuity_years(frequency: u32, tenor: f64) -> Result<f64> {
///     ensure!(frequency >= 1, "frequency must be at least 1");
///     ensure!(tenor > 0.0, "tenor must be positive, got {tenor}");
///     Ok(tenor * frequency as f64)
/// }
/// assert_eq!(annuity_years(2, 10.0), Ok(20.0));
/// assert!(annuity_years(0, 10.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(format!($($msg)*)).into());
        }
    };
}

/// Bail out with [`Error::Postcondition`] unless `$cond` holds; used on
/// computed results rather than inputs.
///
/// ```
/// use cms_core::{ensure_post, errors::{Error, Result}};
///
/// fn present_value(boundary: f64, integral: f64) -> Result<f64> {
///     let pv = boundary + integral;
///     ensure_post!(pv.is_finite(), "present value is not finite: {pv}");
///     Ok(pv)
/// }
/// assert!(present_value(0.25, -0.007).is_ok());
/// assert!(matches!(present_value(0.25, f64::NAN), Err(Error::Postcondition(_))));
/// ```
#[macro_export]
macro_rules! ensure_post {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Postcondition(format!($($msg)*)).into());
        }
    };
}
