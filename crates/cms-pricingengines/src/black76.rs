//! Black (1976) formula for options on a forward.
//!
//! $$C = F\,N(d_1) - K\,N(d_2)$$
//! $$P = K\,N(-d_2) - F\,N(-d_1)$$
//!
//! where $d_{1,2} = \frac{\ln(F/K) \pm \sigma^2 T/2}{\sigma\sqrt{T}}$.
//! Prices are undiscounted; the swaption layer applies discounting and the
//! annuity.

use cms_core::{Price, Rate, Time, Volatility};
use cms_math::distributions::normal_cdf;
use serde::{Deserialize, Serialize};

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Right to receive `F − K`.
    Call,
    /// Right to receive `K − F`.
    Put,
}

impl OptionType {
    /// +1 for calls, −1 for puts.
    pub fn sign(self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

/// Undiscounted Black76 price.
///
/// With zero total volatility or non-positive forward/strike the intrinsic
/// value is returned.
pub fn black76(
    option_type: OptionType,
    forward: Rate,
    strike: Rate,
    volatility: Volatility,
    time_to_expiry: Time,
) -> Price {
    let phi = option_type.sign();
    let std_dev = volatility * time_to_expiry.max(0.0).sqrt();
    if std_dev <= 0.0 || forward <= 0.0 || strike <= 0.0 {
        return (phi * (forward - strike)).max(0.0);
    }
    let d1 = ((forward / strike).ln() + 0.5 * std_dev * std_dev) / std_dev;
    let d2 = d1 - std_dev;
    match option_type {
        OptionType::Call => forward * normal_cdf(d1) - strike * normal_cdf(d2),
        OptionType::Put => strike * normal_cdf(-d2) - forward * normal_cdf(-d1),
    }
}

/// Undiscounted Black76 call.
#[inline]
pub fn black76_call(forward: Rate, strike: Rate, volatility: Volatility, t: Time) -> Price {
    black76(OptionType::Call, forward, strike, volatility, t)
}

/// Undiscounted Black76 put.
#[inline]
pub fn black76_put(forward: Rate, strike: Rate, volatility: Volatility, t: Time) -> Price {
    black76(OptionType::Put, forward, strike, volatility, t)
}
