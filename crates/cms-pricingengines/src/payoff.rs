//! CMS payoff transforms.
//!
//! The replication engine only needs `g(K)`, `g'(K)` and `g''(K)`; anything
//! implementing [`CmsPayoff`] can be replicated without touching the engine.

use cms_core::{ensure, errors::Result, Rate, Real};
use serde::{Deserialize, Serialize};

/// A twice-differentiable payoff on the swap rate observed at expiry.
pub trait CmsPayoff: std::fmt::Debug + Send + Sync {
    /// g(K)
    fn value(&self, k: Rate) -> Real;

    /// g'(K)
    fn first_derivative(&self, k: Rate) -> Real;

    /// g''(K)
    fn second_derivative(&self, k: Rate) -> Real;
}

/// The decompounded payoff `g(K) = K^(1/p) − L0^(1/q)`.
///
/// With p = 4, q = 2, L0 = 0.04 this is `K^0.25 − 0.2`. Defined for `K > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerPayoff {
    /// Root applied to the swap rate.
    pub p: Real,
    /// Root applied to the reference level.
    pub q: Real,
    /// Reference level L0.
    pub l0: Real,
}

impl PowerPayoff {
    /// Create a validated payoff.
    pub fn new(p: Real, q: Real, l0: Real) -> Result<Self> {
        ensure!(p != 0.0 && p.is_finite(), "payoff exponent p must be finite and non-zero, got {p}");
        ensure!(q != 0.0 && q.is_finite(), "payoff exponent q must be finite and non-zero, got {q}");
        ensure!(l0 > 0.0, "payoff reference level must be positive, got {l0}");
        Ok(Self { p, q, l0 })
    }

    /// The constant `L0^(1/q)` subtracted from the rate transform.
    #[inline]
    pub fn offset(&self) -> Real {
        self.l0.powf(1.0 / self.q)
    }

    /// The strike `L` at which `g(L) = 0`, i.e. `L = (L0^(1/q))^p`.
    ///
    /// This is where the floored payoff `max(g, 0)` starts paying.
    pub fn zero_strike(&self) -> Rate {
        self.offset().powf(self.p)
    }
}

impl Default for PowerPayoff {
    fn default() -> Self {
        Self {
            p: 4.0,
            q: 2.0,
            l0: 0.04,
        }
    }
}

impl CmsPayoff for PowerPayoff {
    fn value(&self, k: Rate) -> Real {
        k.powf(1.0 / self.p) - self.offset()
    }

    fn first_derivative(&self, k: Rate) -> Real {
        let e = 1.0 / self.p;
        e * k.powf(e - 1.0)
    }

    fn second_derivative(&self, k: Rate) -> Real {
        let e = 1.0 / self.p;
        e * (e - 1.0) * k.powf(e - 2.0)
    }
}
