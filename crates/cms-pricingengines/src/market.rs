//! Market inputs for a single (expiry, tenor) cell.

use cms_core::{ensure, errors::Result, DiscountFactor, Rate, Real, Time};
use serde::{Deserialize, Serialize};

use crate::irr::Annuity;

/// Slack on `N·m` being a whole number, for tenors parsed from month labels.
const PERIOD_TOLERANCE: Real = 1e-9;

/// Immutable market snapshot consumed by the replication engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Discount factor to the payment date `D`.
    pub discount: DiscountFactor,
    /// Forward swap rate `F`.
    pub forward: Rate,
    /// Option expiry in years `T`.
    pub expiry: Time,
    /// Fixed-leg payments per year `m`.
    pub frequency: u32,
    /// Underlying swap length in years `N`.
    pub tenor: Real,
}

impl MarketSnapshot {
    /// Create a validated snapshot.
    pub fn new(
        discount: DiscountFactor,
        forward: Rate,
        expiry: Time,
        frequency: u32,
        tenor: Real,
    ) -> Result<Self> {
        let s = Self {
            discount,
            forward,
            expiry,
            frequency,
            tenor,
        };
        s.validate()?;
        Ok(s)
    }

    /// Check that the snapshot describes a priceable cell.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.discount > 0.0 && self.discount.is_finite(),
            "discount factor must be positive, got {}",
            self.discount
        );
        ensure!(
            self.forward > 0.0 && self.forward.is_finite(),
            "forward swap rate must be positive, got {}",
            self.forward
        );
        ensure!(self.expiry > 0.0, "expiry must be positive, got {}", self.expiry);
        ensure!(self.frequency >= 1, "payment frequency must be at least 1");
        ensure!(self.tenor > 0.0, "swap tenor must be positive, got {}", self.tenor);
        let periods = self.tenor * self.frequency as Real;
        ensure!(
            periods >= 1.0 - PERIOD_TOLERANCE
                && (periods - periods.round()).abs() < PERIOD_TOLERANCE,
            "swap tenor {} does not span a whole number of {}-per-year periods",
            self.tenor,
            self.frequency
        );
        Ok(())
    }

    /// The underlying swap's annuity schedule.
    pub fn annuity(&self) -> Annuity {
        Annuity::new(self.frequency, self.tenor)
    }
}
