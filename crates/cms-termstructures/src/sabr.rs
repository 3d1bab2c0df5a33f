//! SABR (Stochastic Alpha Beta Rho) implied volatility.
//!
//! Hagan et al. (2002) lognormal expansion. The formula has a removable
//! singularity at K = F, so the at-the-money limit is evaluated by its own
//! closed form whenever `|F − K| < ATM_TOLERANCE`.

use cms_core::{ensure, errors::Result, Rate, Real, Time, Volatility};
use serde::{Deserialize, Serialize};

/// Distance `|F − K|` below which the at-the-money expansion is used.
pub const ATM_TOLERANCE: Real = 1e-12;

/// `|z|` below which `z/χ(z)` is taken from its expansion `1 − ρz/2`.
pub const Z_TOLERANCE: Real = 1e-8;

/// SABR model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SabrParameters {
    /// Alpha (initial volatility level)
    pub alpha: Real,
    /// Beta (CEV exponent, fixed by convention rather than fitted)
    pub beta: Real,
    /// Rho (correlation between forward and volatility increments)
    pub rho: Real,
    /// Nu (vol-of-vol)
    pub nu: Real,
}

impl SabrParameters {
    /// Create a validated parameter set.
    ///
    /// Requires `alpha > 0`, `0 < beta ≤ 1`, `|rho| < 1` and `nu ≥ 0`.
    pub fn new(alpha: Real, beta: Real, rho: Real, nu: Real) -> Result<Self> {
        let p = Self {
            alpha,
            beta,
            rho,
            nu,
        };
        p.validate()?;
        Ok(p)
    }

    /// Check the parameter bounds under which the expansion is defined.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.alpha > 0.0 && self.alpha.is_finite(),
            "SABR alpha must be positive, got {}",
            self.alpha
        );
        ensure!(
            self.beta > 0.0 && self.beta <= 1.0,
            "SABR beta must lie in (0, 1], got {}",
            self.beta
        );
        ensure!(
            self.rho.abs() < 1.0,
            "SABR rho must satisfy |rho| < 1, got {}",
            self.rho
        );
        ensure!(
            self.nu >= 0.0 && self.nu.is_finite(),
            "SABR nu must be non-negative, got {}",
            self.nu
        );
        Ok(())
    }
}

/// Which closed form of the Hagan expansion applies at a given strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SabrBranch {
    /// `|F − K| < ATM_TOLERANCE`: the K → F limit.
    AtTheMoney,
    /// Everything else: the full log-moneyness expansion.
    General,
}

/// Select the branch of the SABR formula for `(forward, strike)`.
#[inline]
pub fn sabr_branch(forward: Rate, strike: Rate) -> SabrBranch {
    if (forward - strike).abs() < ATM_TOLERANCE {
        SabrBranch::AtTheMoney
    } else {
        SabrBranch::General
    }
}

/// Compute the SABR implied (Black) volatility using the Hagan et al. (2002) formula.
///
/// # Arguments
/// * `f`: forward rate
/// * `k`: strike
/// * `t`: time to expiry (years)
/// * `p`: SABR parameters
///
/// Parameters are not re-validated here; out-of-range inputs produce NaN.
pub fn sabr_volatility(f: Rate, k: Rate, t: Time, p: &SabrParameters) -> Volatility {
    match sabr_branch(f, k) {
        SabrBranch::AtTheMoney => sabr_volatility_atm(f, t, p),
        SabrBranch::General => sabr_volatility_general(f, k, t, p),
    }
}

fn sabr_volatility_general(f: Rate, k: Rate, t: Time, p: &SabrParameters) -> Volatility {
    let SabrParameters {
        alpha,
        beta,
        rho,
        nu,
    } = *p;
    let one_minus_beta = 1.0 - beta;

    let fk = f * k;
    let fk_beta = fk.powf(one_minus_beta);
    let fk_half_beta = fk.powf(one_minus_beta / 2.0);
    let log_fk = (f / k).ln();

    // z = (nu / alpha) * (f*k)^((1-β)/2) * ln(f/k)
    let z = (nu / alpha) * fk_half_beta * log_fk;

    // χ(z) = ln((√(1 - 2ρz + z²) + z - ρ) / (1 - ρ)) cancels badly for
    // small z and is exactly 0 when nu = 0 (the CEV limit).
    let z_over_chi = if z.abs() < Z_TOLERANCE {
        1.0 - 0.5 * rho * z
    } else {
        z / (((1.0 - 2.0 * rho * z + z * z).sqrt() + z - rho) / (1.0 - rho)).ln()
    };

    let a = one_minus_beta * one_minus_beta;
    let term1 = a / 24.0 * alpha * alpha / fk_beta;
    let term2 = 0.25 * rho * beta * nu * alpha / fk_half_beta;
    let term3 = (2.0 - 3.0 * rho * rho) / 24.0 * nu * nu;

    let denom1 = a / 24.0 * log_fk * log_fk;
    let denom2 = a * a / 1920.0 * log_fk.powi(4);

    alpha * (1.0 + (term1 + term2 + term3) * t) * z_over_chi
        / (fk_half_beta * (1.0 + denom1 + denom2))
}

/// SABR ATM volatility (f = K).
fn sabr_volatility_atm(f: Rate, t: Time, p: &SabrParameters) -> Volatility {
    let SabrParameters {
        alpha,
        beta,
        rho,
        nu,
    } = *p;

    let one_minus_beta = 1.0 - beta;
    let f_beta = f.powf(one_minus_beta);

    let term1 = one_minus_beta * one_minus_beta / 24.0 * alpha * alpha / (f_beta * f_beta);
    let term2 = 0.25 * rho * beta * nu * alpha / f_beta;
    let term3 = (2.0 - 3.0 * rho * rho) / 24.0 * nu * nu;

    alpha * (1.0 + (term1 + term2 + term3) * t) / f_beta
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn params() -> SabrParameters {
        SabrParameters::new(0.1766, 0.9, -0.4089, 0.3031).unwrap()
    }

    #[test]
    fn matches_reference_values() {
        // 40-digit evaluations of the same expansion.
        let p = params();
        let f = 0.0437;
        assert_relative_eq!(
            sabr_volatility(f, f, 5.0, &p),
            0.240_336_979_083_242_07,
            max_relative = 1e-13
        );
        assert_relative_eq!(
            sabr_volatility(f, 0.03, 5.0, &p),
            0.272_915_957_126_609_74,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            sabr_volatility(f, 0.06, 5.0, &p),
            0.222_918_779_090_993_48,
            max_relative = 1e-12
        );
    }

    #[test]
    fn branch_selection_uses_explicit_tolerance() {
        assert_eq!(sabr_branch(0.04, 0.04), SabrBranch::AtTheMoney);
        assert_eq!(sabr_branch(0.04, 0.04 + 0.5e-12), SabrBranch::AtTheMoney);
        assert_eq!(sabr_branch(0.04, 0.04 + 1e-9), SabrBranch::General);
    }

    #[test]
    fn branches_are_continuous_at_the_money() {
        let p = params();
        let f = 0.0437;
        let atm = sabr_volatility(f, f, 5.0, &p);
        for delta in [1e-4, 1e-5, 1e-6, 1e-7, 1e-8] {
            let up = sabr_volatility(f, f + delta, 5.0, &p);
            let down = sabr_volatility(f, f - delta, 5.0, &p);
            assert!((up - atm).abs() < 10.0 * delta + 1e-8, "up {up} vs {atm} at {delta}");
            assert!((down - atm).abs() < 10.0 * delta + 1e-8, "down {down} vs {atm} at {delta}");
        }
    }

    #[test]
    fn negative_rho_produces_downward_skew() {
        let p = params();
        let f = 0.0437;
        let v_low = sabr_volatility(f, 0.02, 5.0, &p);
        let v_atm = sabr_volatility(f, f, 5.0, &p);
        let v_high = sabr_volatility(f, 0.08, 5.0, &p);
        assert!(v_low > v_atm);
        assert!(v_atm > v_high);
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        assert!(SabrParameters::new(0.0, 0.9, 0.0, 0.3).is_err());
        assert!(SabrParameters::new(0.2, 0.0, 0.0, 0.3).is_err());
        assert!(SabrParameters::new(0.2, 1.2, 0.0, 0.3).is_err());
        assert!(SabrParameters::new(0.2, 0.9, 1.0, 0.3).is_err());
        assert!(SabrParameters::new(0.2, 0.9, 0.0, -0.1).is_err());
        assert!(SabrParameters::new(0.2, 1.0, -0.99, 0.0).is_ok());
    }

    #[test]
    fn zero_vol_of_vol_reduces_to_cev_smile() {
        let p = SabrParameters::new(0.2, 0.9, -0.3, 0.0).unwrap();
        let (f, t) = (0.04, 5.0);
        for k in [1e-12, 0.01, 0.05, 0.5, 5000.0] {
            let vol = sabr_volatility(f, k, t, &p);
            // with nu = 0 only the CEV terms survive
            let fk_half = (f * k).powf(0.05);
            let log_fk = (f / k).ln();
            let expected = 0.2 * (1.0 + 0.01 / 24.0 * 0.04 / (fk_half * fk_half) * t)
                / (fk_half * (1.0 + 0.01 / 24.0 * log_fk.powi(2) + 1e-4 / 1920.0 * log_fk.powi(4)));
            assert!(vol.is_finite() && vol > 0.0, "vol {vol} at {k}");
            assert_relative_eq!(vol, expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn small_vol_of_vol_is_continuous() {
        let f = 0.0437;
        let cev = SabrParameters::new(0.1766, 0.9, -0.4089, 0.0).unwrap();
        let tiny = SabrParameters { nu: 1e-9, ..cev };
        for k in [1e-6, 0.02, 0.0437 + 1e-9, 0.2] {
            assert_relative_eq!(
                sabr_volatility(f, k, 5.0, &tiny),
                sabr_volatility(f, k, 5.0, &cev),
                max_relative = 1e-7
            );
        }
    }

    proptest! {
        #[test]
        fn volatility_is_positive_for_valid_parameters(
            alpha in 0.01f64..0.5,
            beta in 0.1f64..=1.0,
            rho in -0.95f64..0.95,
            nu in 0.01f64..1.0,
            k in 0.001f64..0.5,
        ) {
            let p = SabrParameters::new(alpha, beta, rho, nu).unwrap();
            let vol = sabr_volatility(0.04, k, 2.0, &p);
            prop_assert!(vol.is_finite() && vol > 0.0, "vol {} at k {}", vol, k);
        }
    }
}
