//! IRR-settled (cash-settled) European swaptions.
//!
//! The exercise value is annuitised with the IRR function evaluated at the
//! forward swap rate, so
//!
//! `PV = D · IRR(F) · Black76(F, K, σ, T)`.
//!
//! Note that the annuity is taken at F, not at the strike: this is the
//! cash-settlement convention, distinct from the replication weights which
//! evaluate IRR at the integration strike.

use cms_core::{DiscountFactor, Price, Rate, Time, Volatility};
use serde::{Deserialize, Serialize};

use crate::black76::{black76, OptionType};
use crate::irr::Annuity;

/// Payer or receiver swaption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwaptionType {
    /// Right to pay fixed: a call on the swap rate.
    Payer,
    /// Right to receive fixed: a put on the swap rate.
    Receiver,
}

impl SwaptionType {
    /// The option type on the swap rate.
    pub fn option_type(self) -> OptionType {
        match self {
            SwaptionType::Payer => OptionType::Call,
            SwaptionType::Receiver => OptionType::Put,
        }
    }
}

/// Present value of an IRR-settled swaption.
pub fn irr_settled_swaption(
    swaption_type: SwaptionType,
    discount: DiscountFactor,
    forward: Rate,
    strike: Rate,
    volatility: Volatility,
    time_to_expiry: Time,
    annuity: &Annuity,
) -> Price {
    discount
        * annuity.value(forward)
        * black76(
            swaption_type.option_type(),
            forward,
            strike,
            volatility,
            time_to_expiry,
        )
}

/// `D · IRR(F) · Black76Call(F, K, σ, T)`.
pub fn payer_swaption(
    discount: DiscountFactor,
    forward: Rate,
    strike: Rate,
    volatility: Volatility,
    time_to_expiry: Time,
    annuity: &Annuity,
) -> Price {
    irr_settled_swaption(
        SwaptionType::Payer,
        discount,
        forward,
        strike,
        volatility,
        time_to_expiry,
        annuity,
    )
}

/// `D · IRR(F) · Black76Put(F, K, σ, T)`.
pub fn receiver_swaption(
    discount: DiscountFactor,
    forward: Rate,
    strike: Rate,
    volatility: Volatility,
    time_to_expiry: Time,
    annuity: &Annuity,
) -> Price {
    irr_settled_swaption(
        SwaptionType::Receiver,
        discount,
        forward,
        strike,
        volatility,
        time_to_expiry,
        annuity,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::black76::{black76_call, black76_put};
    use approx::assert_relative_eq;

    #[test]
    fn annuity_is_evaluated_at_forward() {
        let a = Annuity::new(2, 10.0);
        let (d, f, k, vol, t) = (0.9859, 0.0437, 0.03, 0.27, 5.0);
        let expected = d * a.value(f) * black76_call(f, k, vol, t);
        assert_relative_eq!(payer_swaption(d, f, k, vol, t, &a), expected, max_relative = 1e-15);
        let expected = d * a.value(f) * black76_put(f, k, vol, t);
        assert_relative_eq!(receiver_swaption(d, f, k, vol, t, &a), expected, max_relative = 1e-15);
    }

    #[test]
    fn payer_receiver_parity() {
        // Payer − Receiver = D·IRR(F)·(F − K)
        let a = Annuity::new(2, 10.0);
        let (d, f, vol, t) = (0.9859, 0.0437, 0.24, 5.0);
        for k in [0.01, 0.03, 0.0437, 0.06, 0.12] {
            let lhs = payer_swaption(d, f, k, vol, t, &a) - receiver_swaption(d, f, k, vol, t, &a);
            let rhs = d * a.value(f) * (f - k);
            assert!((lhs - rhs).abs() < 1e-13, "k = {k}: {lhs} vs {rhs}");
        }
    }

    #[test]
    fn matches_reference_atm_payer() {
        // SABR ATM vol for the reference snapshot.
        let a = Annuity::new(2, 10.0);
        let pv = payer_swaption(0.9859, 0.0437, 0.0437, 0.240_336_979_083_242_07, 5.0, &a);
        assert_relative_eq!(pv, 0.073_304_695_129_617_14, max_relative = 1e-12);
    }
}
