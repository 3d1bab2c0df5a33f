//! Level annuity ("IRR") function used for cash-settled swaptions.
//!
//! With payment frequency `m` and a swap of `N` years,
//!
//! $$IRR(K) = \frac{1}{K}\left(1 - (1 + K/m)^{-Nm}\right)$$
//!
//! and its first and second strike derivatives are available in closed
//! form. `K > 0` is a precondition of every function here; it is not checked.

use cms_core::{Rate, Real};

/// `1 − (1 + K/m)^(−n)`, computed without cancellation for small `K`.
#[inline]
fn one_minus_discount(k: Rate, m: Real, n: Real) -> Real {
    -(-n * (k / m).ln_1p()).exp_m1()
}

/// `IRR(K) = (1/K)·(1 − (1+K/m)^(−Nm))`.
///
/// Tends to `N` as `K → 0⁺` and to `0` as `K → ∞`.
pub fn irr(k: Rate, frequency: u32, tenor: Real) -> Real {
    let m = Real::from(frequency);
    one_minus_discount(k, m, tenor * m) / k
}

/// `IRR'(K) = −IRR(K)/K + (1/(K·m))·Nm·(1+K/m)^(−(Nm+1))`.
pub fn irr_prime(k: Rate, frequency: u32, tenor: Real) -> Real {
    let m = Real::from(frequency);
    let n = tenor * m;
    -irr(k, frequency, tenor) / k + n * (1.0 + k / m).powf(-(n + 1.0)) / (k * m)
}

/// `IRR''(K) = −(2/K)·IRR'(K) − (1/(K·m²))·Nm·(Nm+1)·(1+K/m)^(−(Nm+2))`.
pub fn irr_second(k: Rate, frequency: u32, tenor: Real) -> Real {
    let m = Real::from(frequency);
    let n = tenor * m;
    -2.0 / k * irr_prime(k, frequency, tenor)
        - n * (n + 1.0) * (1.0 + k / m).powf(-(n + 2.0)) / (k * m * m)
}

/// Schedule of an underlying swap: payment frequency and length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annuity {
    /// Fixed-leg payments per year (`m`).
    pub frequency: u32,
    /// Swap length in years (`N`).
    pub tenor: Real,
}

impl Annuity {
    /// Create an annuity description.
    pub fn new(frequency: u32, tenor: Real) -> Self {
        Self { frequency, tenor }
    }

    /// IRR(K).
    #[inline]
    pub fn value(&self, k: Rate) -> Real {
        irr(k, self.frequency, self.tenor)
    }

    /// IRR'(K).
    #[inline]
    pub fn first_derivative(&self, k: Rate) -> Real {
        irr_prime(k, self.frequency, self.tenor)
    }

    /// IRR''(K).
    #[inline]
    pub fn second_derivative(&self, k: Rate) -> Real {
        irr_second(k, self.frequency, self.tenor)
    }
}
