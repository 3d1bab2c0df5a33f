//! Replication weights `h(K) = g(K) / IRR(K)` and their strike derivatives.
//!
//! Under the annuity (IRR-settlement) measure a payoff g(S) pays
//! `h(S)·IRR(S)`; static replication weights each swaption by `h''(K)`.

use cms_core::{Rate, Real};

use crate::irr::Annuity;
use crate::payoff::CmsPayoff;

/// h, h' and h'' for a payoff over a given annuity.
#[derive(Debug, Clone, Copy)]
pub struct ReplicationWeight<P: CmsPayoff> {
    annuity: Annuity,
    payoff: P,
}

impl<P: CmsPayoff> ReplicationWeight<P> {
    /// Create the weight function for `payoff` over `annuity`.
    pub fn new(annuity: Annuity, payoff: P) -> Self {
        Self { annuity, payoff }
    }

    /// The underlying annuity.
    pub fn annuity(&self) -> &Annuity {
        &self.annuity
    }

    /// The underlying payoff.
    pub fn payoff(&self) -> &P {
        &self.payoff
    }

    /// `h = g / IRR`
    pub fn value(&self, k: Rate) -> Real {
        self.payoff.value(k) / self.annuity.value(k)
    }

    /// `h' = (IRR·g' − g·IRR') / IRR²`
    pub fn first_derivative(&self, k: Rate) -> Real {
        let irr = self.annuity.value(k);
        let irr1 = self.annuity.first_derivative(k);
        let g = self.payoff.value(k);
        let g1 = self.payoff.first_derivative(k);
        (irr * g1 - g * irr1) / (irr * irr)
    }

    /// `h'' = (IRR·g'' − IRR''·g − 2·IRR'·g') / IRR² + 2·IRR'²·g / IRR³`
    pub fn second_derivative(&self, k: Rate) -> Real {
        let irr = self.annuity.value(k);
        let irr1 = self.annuity.first_derivative(k);
        let irr2 = self.annuity.second_derivative(k);
        let g = self.payoff.value(k);
        let g1 = self.payoff.first_derivative(k);
        let g2 = self.payoff.second_derivative(k);
        let irr_sq = irr * irr;
        (irr * g2 - irr2 * g - 2.0 * irr1 * g1) / irr_sq + 2.0 * irr1 * irr1 * g / (irr_sq * irr)
    }
}
