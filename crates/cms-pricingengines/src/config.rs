//! Engine configuration.
//!
//! Everything that is a modelling choice rather than market data lives
//! here: the fixed SABR beta, the payoff shape, the truncation of the
//! strike integral and the quadrature settings. All fields have defaults so
//! a partial TOML document deserialises cleanly.

use cms_core::{ensure, errors::Result, Rate, Real, Size};
use cms_math::integrals::{GaussKronrodAdaptive, KronrodRule};
use cms_termstructures::SabrParameters;
use serde::{Deserialize, Serialize};

use crate::payoff::PowerPayoff;

/// What to do when the integration error estimate exceeds `max_abs_error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Return `Error::Postcondition`.
    #[default]
    Fail,
    /// Log a warning and return the result.
    Warn,
}

/// Gauss-Kronrod pair used on each panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuadratureRule {
    /// 7/15-point pair.
    Gk15,
    /// 10/21-point pair.
    #[default]
    Gk21,
}

impl From<QuadratureRule> for KronrodRule {
    fn from(rule: QuadratureRule) -> Self {
        match rule {
            QuadratureRule::Gk15 => KronrodRule::Gk15,
            QuadratureRule::Gk21 => KronrodRule::Gk21,
        }
    }
}

/// Numerical integration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    /// Absolute accuracy target of each strike integral.
    pub absolute_accuracy: Real,
    /// Relative accuracy target of each strike integral.
    pub relative_accuracy: Real,
    /// Maximum number of panels in the adaptive partition.
    pub max_intervals: Size,
    /// Quadrature rule.
    pub rule: QuadratureRule,
    /// Ratio between consecutive initial breakpoints; panels grow
    /// geometrically away from the split strike.
    pub breakpoint_ratio: Real,
    /// Put-side breakpoints stop at `split × lower_cutoff`; the last panel
    /// down to the lower bound is integrated as a whole.
    pub lower_cutoff: Real,
    /// Largest acceptable combined error estimate of a PV.
    pub max_abs_error: Real,
    /// Reaction to an error estimate above `max_abs_error`.
    pub error_policy: ErrorPolicy,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            absolute_accuracy: 1e-12,
            relative_accuracy: 1e-10,
            max_intervals: 2000,
            rule: QuadratureRule::Gk21,
            breakpoint_ratio: 2.0,
            lower_cutoff: 1e-18,
            max_abs_error: 1e-7,
            error_policy: ErrorPolicy::Fail,
        }
    }
}

impl IntegrationConfig {
    /// Build the integrator described by these settings.
    pub fn integrator(&self) -> GaussKronrodAdaptive {
        GaussKronrodAdaptive::new(
            self.absolute_accuracy,
            self.relative_accuracy,
            self.max_intervals,
        )
        .with_rule(self.rule.into())
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.absolute_accuracy >= 0.0 && self.relative_accuracy >= 0.0,
            "integration accuracies must be non-negative"
        );
        ensure!(
            self.absolute_accuracy > 0.0 || self.relative_accuracy > 0.0,
            "at least one integration accuracy must be positive"
        );
        ensure!(self.max_intervals >= 1, "max_intervals must be at least 1");
        ensure!(
            self.breakpoint_ratio > 1.0 && self.breakpoint_ratio.is_finite(),
            "breakpoint_ratio must exceed 1, got {}",
            self.breakpoint_ratio
        );
        ensure!(
            self.lower_cutoff > 0.0 && self.lower_cutoff < 1.0,
            "lower_cutoff must lie in (0, 1), got {}",
            self.lower_cutoff
        );
        ensure!(
            self.max_abs_error > 0.0,
            "max_abs_error must be positive, got {}",
            self.max_abs_error
        );
        Ok(())
    }
}

/// Configuration of the replication engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicationConfig {
    /// SABR beta, fixed by convention.
    pub beta: Real,
    /// Fixed-leg payments per year of the underlying swap.
    pub frequency: u32,
    /// Finite stand-in for the infinite upper strike limit.
    pub upper_bound: Rate,
    /// Lower strike limit of the put-side integral. The quadrature never
    /// evaluates the endpoint itself, so 0 is allowed.
    pub lower_bound: Rate,
    /// Payoff shape `K^(1/p) − L0^(1/q)`.
    pub payoff: PowerPayoff,
    /// Quadrature settings.
    pub integration: IntegrationConfig,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            beta: 0.9,
            frequency: 2,
            upper_bound: 5000.0,
            lower_bound: 0.0,
            payoff: PowerPayoff::default(),
            integration: IntegrationConfig::default(),
        }
    }
}

impl ReplicationConfig {
    /// Check every setting.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.beta > 0.0 && self.beta <= 1.0,
            "beta must lie in (0, 1], got {}",
            self.beta
        );
        ensure!(self.frequency >= 1, "frequency must be at least 1");
        ensure!(
            self.upper_bound > 0.0 && self.upper_bound.is_finite(),
            "upper_bound must be positive and finite, got {}",
            self.upper_bound
        );
        ensure!(
            self.lower_bound >= 0.0 && self.lower_bound < self.upper_bound,
            "lower_bound must lie in [0, upper_bound), got {}",
            self.lower_bound
        );
        PowerPayoff::new(self.payoff.p, self.payoff.q, self.payoff.l0)?;
        self.integration.validate()
    }

    /// SABR parameters with this configuration's beta.
    pub fn sabr_parameters(&self, alpha: Real, rho: Real, nu: Real) -> Result<SabrParameters> {
        SabrParameters::new(alpha, self.beta, rho, nu)
    }
}
