//! Expiry / tenor labels.

use cms_core::Time;

use crate::error::{MarketDataError, Result};

/// Canonical form of a label: trimmed and upper-cased, so `" 5y"` and
/// `"5Y"` address the same row.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_ascii_uppercase()
}

/// Length of a label in years: `"5Y"` is 5.0, `"6M"` is 0.5.
pub fn parse_years(label: &str) -> Result<Time> {
    let label = normalize_label(label);
    let invalid = || MarketDataError::InvalidLabel(label.clone());
    let (number, in_years) = match (label.strip_suffix('Y'), label.strip_suffix('M')) {
        (Some(n), _) => (n, true),
        (None, Some(n)) => (n, false),
        (None, None) => return Err(invalid()),
    };
    let n: f64 = number.parse().map_err(|_| invalid())?;
    if !(n.is_finite() && n > 0.0) {
        return Err(invalid());
    }
    Ok(if in_years { n } else { n / 12.0 })
}
