//! Static replication engine.
//!
//! A payoff `g(S)` paid at swap-rate observation is replicated by a static
//! portfolio of IRR-settled swaptions (Carr-Madan under the annuity measure).
//! Splitting the strike axis at `F` gives
//!
//! ```text
//! V0 = D·g(F) + ∫₀ᶠ h''(K)·Receiver(K) dK + ∫ꜰ^∞ h''(K)·Payer(K) dK
//! ```
//!
//! and for the capped claim `max(g(S), 0)`, which pays nothing below
//! `L = (L0^(1/q))^p`,
//!
//! ```text
//! V1 = h'(L)·Payer(L) + ∫ʟ^∞ h''(K)·Payer(K) dK
//! ```
//!
//! The infinite upper limit is replaced by `upper_bound`. Both integrals are
//! evaluated with a globally adaptive Gauss-Kronrod rule seeded with
//! geometric breakpoints fanning out from the split strike, so the partition
//! is fine where the kernel carries its mass and coarse in the tails.

use std::fmt;

use cms_core::{
    ensure, ensure_post,
    errors::{Error, Result},
    Price, Rate, Real, Size,
};
use cms_math::{close, relative_close, GaussKronrodAdaptive, IntegrationResult, MARKET_TOLERANCE};
use cms_termstructures::{SabrParameters, SabrSmileSection, SmileSection};
use tracing::{debug, info, warn};

use crate::config::{ErrorPolicy, ReplicationConfig};
use crate::integrand::ReplicationIntegrand;
use crate::market::MarketSnapshot;
use crate::payoff::CmsPayoff;
use crate::swaption::SwaptionType;

/// Which claim to price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scenario {
    /// The plain payoff `g(S)`.
    Unconditional,
    /// `g(S)` floored at zero, paid only when `S > L`.
    ///
    /// `None` uses the payoff's own zero strike.
    Capped {
        /// Exercise threshold `L`.
        threshold: Option<Rate>,
    },
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Unconditional => f.write_str("unconditional"),
            Scenario::Capped { .. } => f.write_str("capped"),
        }
    }
}

/// Present value of a replicated claim and its components.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicationResult {
    /// The priced claim.
    pub scenario: Scenario,
    /// Strike separating the boundary term from the integrals: `F` for the
    /// unconditional claim, `L` for the capped one.
    pub split_strike: Rate,
    /// `D·g(F)` or `h'(L)·Payer(L)`.
    pub boundary_term: Price,
    /// Receiver-side integral. Zero for the capped claim.
    pub put_integral: IntegrationResult,
    /// Payer-side integral.
    pub call_integral: IntegrationResult,
    /// Total present value.
    pub pv: Price,
}

impl ReplicationResult {
    /// Put and call integrals summed, with their diagnostics.
    pub fn integrals(&self) -> IntegrationResult {
        self.put_integral.combine(&self.call_integral)
    }

    /// Combined absolute error estimate of both integrals.
    pub fn abs_error(&self) -> Real {
        self.integrals().abs_error
    }

    /// Integrand evaluations spent on both integrals.
    pub fn evaluations(&self) -> Size {
        self.integrals().evaluations
    }
}

/// Prices decompounded CMS claims by static replication.
#[derive(Debug, Clone)]
pub struct CmsReplicationEngine {
    config: ReplicationConfig,
    integrator: GaussKronrodAdaptive,
}

impl CmsReplicationEngine {
    /// Create an engine from a validated configuration.
    pub fn new(config: ReplicationConfig) -> Result<Self> {
        config.validate()?;
        let integrator = config.integration.integrator();
        Ok(Self { config, integrator })
    }

    /// The engine configuration.
    pub fn config(&self) -> &ReplicationConfig {
        &self.config
    }

    /// Price `scenario` off a SABR smile built from `params` at the
    /// snapshot's forward and expiry.
    pub fn price(
        &self,
        snapshot: &MarketSnapshot,
        params: &SabrParameters,
        scenario: Scenario,
    ) -> Result<ReplicationResult> {
        snapshot.validate()?;
        let smile = SabrSmileSection::new(snapshot.expiry, snapshot.forward, *params)?;
        self.price_with_smile(snapshot, &smile, scenario)
    }

    /// `V0`, the value of the plain payoff.
    pub fn price_unconditional(
        &self,
        snapshot: &MarketSnapshot,
        params: &SabrParameters,
    ) -> Result<ReplicationResult> {
        self.price(snapshot, params, Scenario::Unconditional)
    }

    /// `V1`, the value of the payoff floored at zero above `threshold`.
    pub fn price_capped(
        &self,
        snapshot: &MarketSnapshot,
        params: &SabrParameters,
        threshold: Option<Rate>,
    ) -> Result<ReplicationResult> {
        self.price(snapshot, params, Scenario::Capped { threshold })
    }

    /// Price `scenario` off an arbitrary smile section.
    ///
    /// The smile must be quoted at the snapshot's forward and expiry.
    pub fn price_with_smile<S: SmileSection>(
        &self,
        snapshot: &MarketSnapshot,
        smile: &S,
        scenario: Scenario,
    ) -> Result<ReplicationResult> {
        snapshot.validate()?;
        ensure!(
            snapshot.frequency == self.config.frequency,
            "snapshot payment frequency {} differs from configured frequency {}",
            snapshot.frequency,
            self.config.frequency
        );
        ensure!(
            relative_close(smile.atm_level(), snapshot.forward, MARKET_TOLERANCE),
            "smile forward {} differs from snapshot forward {}",
            smile.atm_level(),
            snapshot.forward
        );
        ensure!(
            close(smile.exercise_time(), snapshot.expiry, MARKET_TOLERANCE),
            "smile expiry {} differs from snapshot expiry {}",
            smile.exercise_time(),
            snapshot.expiry
        );

        let payoff = self.config.payoff;
        let kernel =
            ReplicationIntegrand::new(snapshot.discount, smile, snapshot.annuity(), payoff);
        let forward = snapshot.forward;
        let upper = self.config.upper_bound;

        let result = match scenario {
            Scenario::Unconditional => {
                ensure!(
                    forward < upper,
                    "forward {forward} must lie below the upper strike bound {upper}"
                );
                ensure!(
                    self.config.lower_bound < forward,
                    "lower strike bound {} must lie below the forward {forward}",
                    self.config.lower_bound
                );
                let boundary_term = snapshot.discount * payoff.value(forward);
                let put_integral =
                    self.integrate("put", |k| kernel.put(k), &self.put_breakpoints(forward))?;
                let call_integral = self.integrate(
                    "call",
                    |k| kernel.call(k),
                    &self.call_breakpoints(forward, None),
                )?;
                ReplicationResult {
                    scenario,
                    split_strike: forward,
                    boundary_term,
                    pv: boundary_term + put_integral.value + call_integral.value,
                    put_integral,
                    call_integral,
                }
            }
            Scenario::Capped { threshold } => {
                let l = threshold.unwrap_or_else(|| payoff.zero_strike());
                ensure!(
                    l > 0.0 && l < upper,
                    "threshold {l} must lie in (0, {upper})"
                );
                let boundary_term =
                    kernel.weight().first_derivative(l) * kernel.swaption(SwaptionType::Payer, l);
                let call_integral = self.integrate(
                    "call",
                    |k| kernel.call(k),
                    &self.call_breakpoints(l, Some(forward)),
                )?;
                ReplicationResult {
                    scenario,
                    split_strike: l,
                    boundary_term,
                    pv: boundary_term + call_integral.value,
                    put_integral: IntegrationResult::zero(),
                    call_integral,
                }
            }
        };

        ensure_post!(
            result.pv.is_finite(),
            "{} present value is not finite: {}",
            scenario,
            result.pv
        );
        self.check_error_estimate(&result)?;

        info!(
            %scenario,
            pv = result.pv,
            boundary = result.boundary_term,
            put = result.put_integral.value,
            call = result.call_integral.value,
            abs_error = result.abs_error(),
            "replicated CMS claim"
        );
        Ok(result)
    }

    fn integrate<F: Fn(Real) -> Real>(
        &self,
        side: &str,
        f: F,
        breakpoints: &[Real],
    ) -> Result<IntegrationResult> {
        let result = self.integrator.integrate_with_breakpoints(f, breakpoints)?;
        debug!(
            side,
            value = result.value,
            abs_error = result.abs_error,
            evaluations = result.evaluations,
            intervals = result.intervals,
            "strike integral"
        );
        Ok(result)
    }

    fn check_error_estimate(&self, result: &ReplicationResult) -> Result<()> {
        let abs_error = result.abs_error();
        let limit = self.config.integration.max_abs_error;
        if abs_error <= limit {
            return Ok(());
        }
        match self.config.integration.error_policy {
            ErrorPolicy::Fail => {
                return Err(Error::Postcondition(format!(
                    "{} integration error estimate {abs_error:e} exceeds {limit:e}",
                    result.scenario
                )));
            }
            ErrorPolicy::Warn => {
                warn!(
                    scenario = %result.scenario,
                    abs_error,
                    limit,
                    "integration error estimate above tolerance"
                );
            }
        }
        Ok(())
    }

    /// Ascending breakpoints on `[lower_bound, split]`, geometric in the
    /// ratio towards zero and stopping at `split × lower_cutoff`.
    pub fn put_breakpoints(&self, split: Rate) -> Vec<Real> {
        let ratio = self.config.integration.breakpoint_ratio;
        let floor = (split * self.config.integration.lower_cutoff).max(self.config.lower_bound);
        let mut points = vec![split];
        let mut k = split / ratio;
        while k > floor {
            points.push(k);
            k /= ratio;
        }
        points.push(self.config.lower_bound);
        points.reverse();
        points
    }

    /// Ascending breakpoints on `[split, upper_bound]`, geometric in the
    /// ratio. `extra` is added when it falls strictly inside the range.
    pub fn call_breakpoints(&self, split: Rate, extra: Option<Rate>) -> Vec<Real> {
        let ratio = self.config.integration.breakpoint_ratio;
        let upper = self.config.upper_bound;
        let mut points = vec![split];
        let mut k = split * ratio;
        while k < upper {
            points.push(k);
            k *= ratio;
        }
        points.push(upper);
        if let Some(x) = extra.filter(|&x| x > split && x < upper) {
            points.push(x);
            points.sort_by(|a, b| a.total_cmp(b));
            points.dedup();
        }
        points
    }
}
