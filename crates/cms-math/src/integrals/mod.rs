//! Numerical integration.
//!
//! Provides a composite Simpson rule and a globally adaptive Gauss-Kronrod
//! integrator. Every integrator reports its absolute error estimate next to
//! the value so that callers can decide whether the result is usable.

pub mod gauss_kronrod;

pub use gauss_kronrod::{GaussKronrodAdaptive, KronrodRule};

use cms_core::{
    errors::{Error, Result},
    Real, Size,
};

/// Value of a definite integral together with its diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntegrationResult {
    /// Estimated value of the integral.
    pub value: Real,
    /// Estimated absolute error of `value`.
    pub abs_error: Real,
    /// Number of integrand evaluations used.
    pub evaluations: Size,
    /// Number of sub-intervals in the final partition (1 for non-adaptive rules).
    pub intervals: Size,
}

impl IntegrationResult {
    /// The result for an empty interval.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Combine the results of two disjoint integrals.
    pub fn combine(&self, other: &IntegrationResult) -> IntegrationResult {
        IntegrationResult {
            value: self.value + other.value,
            abs_error: self.abs_error + other.abs_error,
            evaluations: self.evaluations + other.evaluations,
            intervals: self.intervals + other.intervals,
        }
    }
}

/// A numerical integrator.
pub trait Integrator {
    /// Integrate `f` on `[a, b]`.
    fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Result<IntegrationResult>;
}

// ── Simpson ───────────────────────────────────────────────────────────────────

/// Simpson's rule as Richardson extrapolation of halved trapezoid sums,
/// `S(2n) = (4·T(2n) − T(n)) / 3`.
///
/// Each halving evaluates only the new midpoints. The error estimate is the
/// change between the last two Simpson values. The endpoints are evaluated,
/// so the integrand must be finite on `[a, b]`.
#[derive(Debug, Clone)]
pub struct SimpsonIntegral {
    absolute_accuracy: Real,
    max_evaluations: Size,
}

impl SimpsonIntegral {
    /// Stop once two successive estimates differ by less than
    /// `absolute_accuracy`; fail after `max_evaluations` integrand calls.
    pub fn new(absolute_accuracy: Real, max_evaluations: Size) -> Self {
        Self {
            absolute_accuracy,
            max_evaluations,
        }
    }
}

impl Integrator for SimpsonIntegral {
    fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Result<IntegrationResult> {
        if a == b {
            return Ok(IntegrationResult::zero());
        }
        let width = b - a;
        let mut trapezoid = 0.5 * width * (f(a) + f(b));
        let mut evaluations = 2;
        let mut panels: Size = 1;
        let mut previous: Option<Real> = None;

        loop {
            let h = width / panels as Real;
            let midpoints: Real = (0..panels).map(|i| f(a + (i as Real + 0.5) * h)).sum();
            evaluations += panels;
            panels *= 2;
            let refined = 0.5 * (trapezoid + h * midpoints);
            let value = (4.0 * refined - trapezoid) / 3.0;
            trapezoid = refined;

            if !value.is_finite() {
                return Err(Error::Integration {
                    message: format!("SimpsonIntegral: non-finite value on [{a}, {b}]"),
                    abs_error: f64::INFINITY,
                });
            }
            if let Some(last) = previous {
                let abs_error = (value - last).abs();
                if abs_error < self.absolute_accuracy {
                    return Ok(IntegrationResult {
                        value,
                        abs_error,
                        evaluations,
                        intervals: panels,
                    });
                }
                if evaluations >= self.max_evaluations {
                    return Err(Error::Integration {
                        message: format!(
                            "SimpsonIntegral: no convergence within {} evaluations",
                            self.max_evaluations
                        ),
                        abs_error,
                    });
                }
            }
            previous = Some(value);
        }
    }
}
