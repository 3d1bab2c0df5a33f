//! Floating-point comparisons used when cross-checking inputs.

use cms_core::Real;

/// Tolerance for two descriptions of the same market quantity (a smile's
/// forward against a snapshot's, say) to be treated as equal.
pub const MARKET_TOLERANCE: Real = 1e-12;

/// `|a − b| ≤ tolerance`.
#[inline]
pub fn close(a: Real, b: Real, tolerance: Real) -> bool {
    (a - b).abs() <= tolerance
}

/// `|a − b| ≤ tolerance · max(|a|, |b|)`. Exact equality always passes,
/// so two zeros compare equal.
#[inline]
pub fn relative_close(a: Real, b: Real, tolerance: Real) -> bool {
    a == b || (a - b).abs() <= tolerance * a.abs().max(b.abs())
}
