//! Pricing one market cell, from tables or from explicit inputs.

use anyhow::{Context, Result};
use cms_marketdata::MarketDataProvider;
use cms_pricingengines::{CmsReplicationEngine, MarketSnapshot, Scenario};
use cms_termstructures::SabrParameters;
use tracing::info;

use crate::report::ScenarioReport;

/// Price `scenarios` on the `expiry × tenor` cell of `provider`.
pub fn price_cell<P: MarketDataProvider>(
    engine: &CmsReplicationEngine,
    provider: &P,
    expiry: &str,
    tenor: &str,
    scenarios: &[Scenario],
) -> Result<Vec<ScenarioReport>> {
    let config = engine.config();
    let snapshot = provider
        .snapshot(expiry, tenor, config.frequency)
        .with_context(|| format!("market data for {expiry} x {tenor}"))?;
    let params = provider
        .sabr(expiry, tenor, config.beta)
        .with_context(|| format!("SABR quote for {expiry} x {tenor}"))?;
    info!(expiry, tenor, forward = snapshot.forward, discount = snapshot.discount, "pricing cell");
    price_snapshot(engine, &snapshot, &params, expiry, tenor, scenarios)
}

/// Price `scenarios` on an explicit snapshot; `expiry` and `tenor` only
/// label the reports.
pub fn price_snapshot(
    engine: &CmsReplicationEngine,
    snapshot: &MarketSnapshot,
    params: &SabrParameters,
    expiry: &str,
    tenor: &str,
    scenarios: &[Scenario],
) -> Result<Vec<ScenarioReport>> {
    scenarios
        .iter()
        .map(|&scenario| {
            let result = engine
                .price(snapshot, params, scenario)
                .with_context(|| format!("{scenario} claim on {expiry} x {tenor}"))?;
            Ok(ScenarioReport::new(expiry, tenor, &result))
        })
        .collect()
}
