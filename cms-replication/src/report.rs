//! Result rows for the command line.

use std::fmt::Write;

use cms_core::{Price, Rate, Real, Size};
use cms_pricingengines::ReplicationResult;
use serde::Serialize;

/// One priced scenario, flattened for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    /// Option expiry label.
    pub expiry: String,
    /// Swap tenor label.
    pub tenor: String,
    /// `unconditional` or `capped`.
    pub scenario: String,
    /// F or L.
    pub split_strike: Rate,
    /// Boundary term of the decomposition.
    pub boundary_term: Price,
    /// Receiver-side integral.
    pub put_integral: Real,
    /// Payer-side integral.
    pub call_integral: Real,
    /// Present value.
    pub pv: Price,
    /// Combined quadrature error estimate.
    pub abs_error: Real,
    /// Integrand evaluations.
    pub evaluations: Size,
}

impl ScenarioReport {
    /// Flatten an engine result.
    pub fn new(expiry: &str, tenor: &str, result: &ReplicationResult) -> Self {
        Self {
            expiry: expiry.to_string(),
            tenor: tenor.to_string(),
            scenario: result.scenario.to_string(),
            split_strike: result.split_strike,
            boundary_term: result.boundary_term,
            put_integral: result.put_integral.value,
            call_integral: result.call_integral.value,
            pv: result.pv,
            abs_error: result.abs_error(),
            evaluations: result.evaluations(),
        }
    }
}

/// Fixed-width text table.
pub fn render_table(reports: &[ScenarioReport]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<6} {:<13} {:>10} {:>14} {:>14} {:>14} {:>14} {:>9}",
        "expiry", "tenor", "scenario", "split", "boundary", "put", "call", "pv", "error"
    );
    for r in reports {
        let _ = writeln!(
            out,
            "{:<6} {:<6} {:<13} {:>10.6} {:>14.10} {:>14.10} {:>14.10} {:>14.10} {:>9.1e}",
            r.expiry,
            r.tenor,
            r.scenario,
            r.split_strike,
            r.boundary_term,
            r.put_integral,
            r.call_integral,
            r.pv,
            r.abs_error
        );
    }
    out
}
