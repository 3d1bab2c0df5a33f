//! Implied volatility against strike for the single swaption expiry that the
//! replication integrals run over.

use cms_core::{ensure, errors::Result, Rate, Real, Time, Volatility};

use crate::sabr::{sabr_volatility, SabrParameters};

/// Black volatility quoted per strike for one option expiry.
pub trait SmileSection: std::fmt::Debug + Send + Sync {
    /// Implied Black volatility at `strike`.
    fn volatility(&self, strike: Rate) -> Volatility;

    /// Forward swap rate the smile is centred on.
    fn atm_level(&self) -> Rate;

    /// Option expiry in year fractions.
    fn exercise_time(&self) -> Time;

    /// Black total variance `σ(K)²·T`.
    fn variance(&self, strike: Rate) -> Real {
        self.volatility(strike).powi(2) * self.exercise_time()
    }
}

/// Strike-independent volatility. Replicating against it isolates the
/// convexity of the payoff from any smile effect.
#[derive(Debug, Clone)]
pub struct FlatSmileSection {
    exercise_time: Time,
    sigma: Volatility,
    forward: Rate,
}

impl FlatSmileSection {
    /// Constant `sigma` around `forward`, expiring at `exercise_time`.
    ///
    /// ```
    /// use cms_termstructures::{FlatSmileSection, SmileSection};
    ///
    /// let smile = FlatSmileSection::new(5.0, 0.24, 0.0437).unwrap();
    /// assert_eq!(smile.volatility(0.01), smile.volatility(0.10));
    /// assert!(FlatSmileSection::new(5.0, 0.0, 0.0437).is_err());
    /// ```
    pub fn new(exercise_time: Time, sigma: Volatility, forward: Rate) -> Result<Self> {
        ensure!(exercise_time > 0.0, "exercise time must be positive, got {exercise_time}");
        ensure!(sigma > 0.0, "flat volatility must be positive, got {sigma}");
        Ok(Self {
            exercise_time,
            sigma,
            forward,
        })
    }
}

impl SmileSection for FlatSmileSection {
    fn volatility(&self, _strike: Rate) -> Volatility {
        self.sigma
    }

    fn atm_level(&self) -> Rate {
        self.forward
    }

    fn exercise_time(&self) -> Time {
        self.exercise_time
    }
}

/// Hagan SABR smile for one (expiry, tenor) cell.
///
/// Nothing is cached: each [`SmileSection::volatility`] call evaluates
/// [`sabr_volatility`] at the requested strike.
#[derive(Debug, Clone)]
pub struct SabrSmileSection {
    exercise_time: Time,
    forward: Rate,
    params: SabrParameters,
}

impl SabrSmileSection {
    /// Binds validated `params` to `forward` and `exercise_time`.
    pub fn new(exercise_time: Time, forward: Rate, params: SabrParameters) -> Result<Self> {
        params.validate()?;
        ensure!(exercise_time > 0.0, "exercise time must be positive, got {exercise_time}");
        ensure!(forward > 0.0, "forward must be positive, got {forward}");
        Ok(Self {
            exercise_time,
            forward,
            params,
        })
    }

    /// Parameters the smile was built from.
    pub fn params(&self) -> &SabrParameters {
        &self.params
    }
}

impl SmileSection for SabrSmileSection {
    fn volatility(&self, strike: Rate) -> Volatility {
        sabr_volatility(self.forward, strike, self.exercise_time, &self.params)
    }

    fn atm_level(&self) -> Rate {
        self.forward
    }

    fn exercise_time(&self) -> Time {
        self.exercise_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn flat_smile_ignores_strike() {
        let smile = FlatSmileSection::new(5.0, 0.24, 0.0437).unwrap();
        for strike in [1e-6, 0.0437, 2.0, 5000.0] {
            assert_eq!(smile.volatility(strike), 0.24);
        }
        assert_relative_eq!(smile.variance(0.1), 0.288, max_relative = 1e-14);
        assert_eq!(smile.atm_level(), 0.0437);
    }

    #[test]
    fn sabr_smile_matches_hagan_formula() {
        let p = SabrParameters::new(0.1766, 0.9, -0.4089, 0.3031).unwrap();
        let smile = SabrSmileSection::new(5.0, 0.0437, p).unwrap();
        for strike in [0.01, 0.0437, 0.2] {
            assert_eq!(smile.volatility(strike), sabr_volatility(0.0437, strike, 5.0, &p));
        }
        assert_eq!(smile.atm_level(), 0.0437);
        assert_eq!(smile.exercise_time(), 5.0);
        assert_eq!(smile.params(), &p);
    }

    #[test]
    fn constructors_validate_inputs() {
        let p = SabrParameters {
            alpha: 0.2,
            beta: 0.9,
            rho: 1.5,
            nu: 0.3,
        };
        assert!(SabrSmileSection::new(5.0, 0.04, p).is_err());
        let good = SabrParameters { rho: -0.2, ..p };
        assert!(SabrSmileSection::new(0.0, 0.04, good).is_err());
        assert!(SabrSmileSection::new(5.0, -0.01, good).is_err());
        assert!(FlatSmileSection::new(1.0, 0.0, 0.04).is_err());
    }
}
