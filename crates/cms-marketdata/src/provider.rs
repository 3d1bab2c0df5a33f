//! Access to market quotes by `(expiry, tenor)` label.

use cms_core::{DiscountFactor, Rate, Real};
use cms_pricingengines::MarketSnapshot;
use cms_termstructures::SabrParameters;

use crate::csv_source::SabrQuote;
use crate::error::Result;
use crate::tenor::parse_years;

/// A source of discount factors, forward swap rates and SABR quotes.
///
/// Implementors supply the three raw lookups; snapshot assembly is shared.
pub trait MarketDataProvider {
    /// OIS discount factor to `maturity`.
    fn discount_factor(&self, maturity: &str) -> Result<DiscountFactor>;

    /// Forward swap rate for the `expiry × tenor` cell.
    fn swap_rate(&self, expiry: &str, tenor: &str) -> Result<Rate>;

    /// Calibrated SABR quote for the `expiry × tenor` cell.
    fn sabr_quote(&self, expiry: &str, tenor: &str) -> Result<SabrQuote>;

    /// The replication inputs of one cell. The CMS payoff is paid at
    /// expiry, so the discount factor is the one keyed by `expiry`.
    fn snapshot(&self, expiry: &str, tenor: &str, frequency: u32) -> Result<MarketSnapshot> {
        let snapshot = MarketSnapshot::new(
            self.discount_factor(expiry)?,
            self.swap_rate(expiry, tenor)?,
            parse_years(expiry)?,
            frequency,
            parse_years(tenor)?,
        )?;
        Ok(snapshot)
    }

    /// SABR parameters of one cell with the given fixed `beta`.
    fn sabr(&self, expiry: &str, tenor: &str, beta: Real) -> Result<SabrParameters> {
        let q = self.sabr_quote(expiry, tenor)?;
        Ok(SabrParameters::new(q.alpha, beta, q.rho, q.nu)?)
    }
}
