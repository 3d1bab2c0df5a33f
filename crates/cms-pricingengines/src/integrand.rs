//! Replication kernels `h''(K) · swaption(K)`.
//!
//! Once the discount factor, smile and annuity are fixed the kernels are
//! functions of the strike alone. The volatility is re-read from the smile
//! at every strike.

use cms_core::{DiscountFactor, Price, Rate, Real};
use cms_termstructures::SmileSection;

use crate::irr::Annuity;
use crate::payoff::CmsPayoff;
use crate::swaption::{irr_settled_swaption, SwaptionType};
use crate::weight::ReplicationWeight;

/// The call- and put-side replication integrands for one market cell.
#[derive(Debug)]
pub struct ReplicationIntegrand<'a, S: SmileSection, P: CmsPayoff> {
    discount: DiscountFactor,
    smile: &'a S,
    weight: ReplicationWeight<P>,
}

impl<'a, S: SmileSection, P: CmsPayoff> ReplicationIntegrand<'a, S, P> {
    /// Bind the kernels to a discount factor, a smile and a payoff.
    pub fn new(discount: DiscountFactor, smile: &'a S, annuity: Annuity, payoff: P) -> Self {
        Self {
            discount,
            smile,
            weight: ReplicationWeight::new(annuity, payoff),
        }
    }

    /// The replication weights.
    pub fn weight(&self) -> &ReplicationWeight<P> {
        &self.weight
    }

    /// IRR-settled swaption at `strike`, priced with the smile volatility
    /// at that strike.
    pub fn swaption(&self, swaption_type: SwaptionType, strike: Rate) -> Price {
        irr_settled_swaption(
            swaption_type,
            self.discount,
            self.smile.atm_level(),
            strike,
            self.smile.volatility(strike),
            self.smile.exercise_time(),
            self.weight.annuity(),
        )
    }

    /// `h''(K) · Payer(K)`
    pub fn call(&self, strike: Rate) -> Real {
        self.kernel(SwaptionType::Payer, strike)
    }

    /// `h''(K) · Receiver(K)`
    pub fn put(&self, strike: Rate) -> Real {
        self.kernel(SwaptionType::Receiver, strike)
    }

    fn kernel(&self, swaption_type: SwaptionType, strike: Rate) -> Real {
        let pv = self.swaption(swaption_type, strike);
        // Near K = 0 the weight diverges while the option value underflows.
        if pv == 0.0 {
            return 0.0;
        }
        self.weight.second_derivative(strike) * pv
    }
}
