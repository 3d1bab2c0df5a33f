//! End-to-end replication of the decompounded CMS payoff
//! `g(S) = S^(1/4) − 0.04^(1/2)` on a 5Y × 10Y semi-annual swap rate.
//!
//! Reference values were computed independently in 30-digit arithmetic,
//! integrating down to K = 1e-26 with the same SABR smile.

use approx::assert_relative_eq;
use cms_core::Error;
use cms_math::{GaussKronrodAdaptive, Integrator, SimpsonIntegral};
use cms_pricingengines::{
    CmsReplicationEngine, ErrorPolicy, IntegrationConfig, MarketSnapshot, PowerPayoff,
    QuadratureRule, ReplicationConfig, ReplicationIntegrand, Scenario, SwaptionType,
};
use cms_termstructures::{SabrParameters, SabrSmileSection};

const V0: f64 = 0.246_166_439_064_558_5;
const V1: f64 = 0.246_986_703_792_226_7;

fn snapshot() -> MarketSnapshot {
    MarketSnapshot::new(0.9859, 0.0437, 5.0, 2, 10.0).unwrap()
}

fn sabr() -> SabrParameters {
    SabrParameters::new(0.1766, 0.9, -0.4089, 0.3031).unwrap()
}

fn engine_with(f: impl FnOnce(&mut ReplicationConfig)) -> CmsReplicationEngine {
    let mut config = ReplicationConfig::default();
    f(&mut config);
    CmsReplicationEngine::new(config).unwrap()
}

fn engine() -> CmsReplicationEngine {
    engine_with(|_| {})
}

// ───────────────────────── unconditional payoff ─────────────────────────

#[test]
fn test_unconditional_reference_value() {
    let r = engine().price_unconditional(&snapshot(), &sabr()).unwrap();
    assert_eq!(r.scenario, Scenario::Unconditional);
    assert_eq!(r.split_strike, 0.0437);
    assert_relative_eq!(r.boundary_term, 0.253_588_153_545_346_38, max_relative = 1e-12);
    assert_relative_eq!(r.put_integral.value, -0.006_690_170_207_362_514, max_relative = 1e-6);
    assert_relative_eq!(r.call_integral.value, -0.000_731_544_273_425_364_8, max_relative = 1e-6);
    assert_relative_eq!(r.pv, V0, max_relative = 1e-6);
    assert!(r.abs_error() < 1e-9);
}

#[test]
fn test_unconditional_components_sum_to_pv() {
    let r = engine().price_unconditional(&snapshot(), &sabr()).unwrap();
    assert_eq!(
        r.pv,
        r.boundary_term + r.put_integral.value + r.call_integral.value
    );
    let both = r.integrals();
    assert_relative_eq!(r.pv, r.boundary_term + both.value, max_relative = 1e-15);
    assert_eq!(both.abs_error, r.abs_error());
    assert_eq!(r.evaluations(), r.put_integral.evaluations + r.call_integral.evaluations);
    assert!(r.evaluations() > 0);
    assert!(r.put_integral.intervals >= 60);
    assert_eq!(both.intervals, r.put_integral.intervals + r.call_integral.intervals);
}

#[test]
fn test_zero_vol_of_vol_is_priceable() {
    let cev = SabrParameters::new(0.1766, 0.9, -0.4089, 0.0).unwrap();
    let e = engine_with(|c| c.integration.error_policy = ErrorPolicy::Warn);
    let v0 = e.price_unconditional(&snapshot(), &cev).unwrap();
    let v1 = e.price_capped(&snapshot(), &cev, None).unwrap();
    for r in [&v0, &v1] {
        assert!(r.pv.is_finite() && r.pv > 0.2 && r.pv < 0.3, "{}: {}", r.scenario, r.pv);
        assert!(r.integrals().value.is_finite());
    }
}

// ───────────────────────── capped payoff ─────────────────────────

#[test]
fn test_capped_reference_value() {
    let r = engine().price_capped(&snapshot(), &sabr(), None).unwrap();
    assert_relative_eq!(r.split_strike, 0.0016, max_relative = 1e-12);
    assert_relative_eq!(r.boundary_term, 1.050_867_612_992_105_4, max_relative = 1e-10);
    assert_relative_eq!(r.call_integral.value, -0.803_880_909_199_878_7, max_relative = 1e-8);
    assert_eq!(r.put_integral.value, 0.0);
    assert_relative_eq!(r.pv, V1, max_relative = 1e-6);
}

#[test]
fn test_floor_adds_value() {
    let e = engine();
    let v0 = e.price_unconditional(&snapshot(), &sabr()).unwrap().pv;
    let v1 = e.price_capped(&snapshot(), &sabr(), None).unwrap().pv;
    assert!(v1 > v0);
}

#[test]
fn test_default_threshold_is_payoff_zero_strike() {
    let e = engine();
    let l = PowerPayoff::default().zero_strike();
    let implicit = e.price_capped(&snapshot(), &sabr(), None).unwrap();
    let explicit = e.price_capped(&snapshot(), &sabr(), Some(l)).unwrap();
    assert_eq!(implicit.pv, explicit.pv);
}

#[test]
fn test_threshold_at_forward_splits_unconditional_call_side() {
    // With L = F the capped claim is h'(F)·Payer(F) plus exactly the
    // call-side integral of the unconditional decomposition.
    let e = engine();
    let s = snapshot();
    let unconditional = e.price_unconditional(&s, &sabr()).unwrap();
    let capped = e.price_capped(&s, &sabr(), Some(s.forward)).unwrap();

    let smile = SabrSmileSection::new(s.expiry, s.forward, sabr()).unwrap();
    let kernel = ReplicationIntegrand::new(s.discount, &smile, s.annuity(), PowerPayoff::default());
    let atm_boundary =
        kernel.weight().first_derivative(s.forward) * kernel.swaption(SwaptionType::Payer, s.forward);

    assert_relative_eq!(capped.boundary_term, atm_boundary, max_relative = 1e-15);
    assert_relative_eq!(atm_boundary, 0.035_111_434_843_740_32, max_relative = 1e-10);
    assert_relative_eq!(
        capped.pv - atm_boundary,
        unconditional.call_integral.value,
        max_relative = 1e-12
    );
}

// ───────────────────────── truncation ─────────────────────────

#[test]
fn test_upper_bound_truncation_is_immaterial() {
    let narrow = engine();
    let wide = engine_with(|c| c.upper_bound = 10_000.0);
    let s = snapshot();
    for scenario in [Scenario::Unconditional, Scenario::Capped { threshold: None }] {
        let a = narrow.price(&s, &sabr(), scenario).unwrap().pv;
        let b = wide.price(&s, &sabr(), scenario).unwrap().pv;
        assert!((a - b).abs() < 1e-8, "{scenario}: {a} vs {b}");
    }
}

#[test]
fn test_rules_agree() {
    let gk15 = engine_with(|c| c.integration.rule = QuadratureRule::Gk15);
    let r = gk15.price_unconditional(&snapshot(), &sabr()).unwrap();
    assert_relative_eq!(r.pv, V0, max_relative = 1e-6);
}

// ───────────────────────── error policy ─────────────────────────

#[test]
fn test_error_policy_fail() {
    let strict = engine_with(|c| c.integration.max_abs_error = 1e-300);
    match strict.price_unconditional(&snapshot(), &sabr()) {
        Err(Error::Postcondition(msg)) => assert!(msg.contains("error estimate")),
        other => panic!("expected a postcondition error, got {other:?}"),
    }
}

#[test]
fn test_error_policy_warn() {
    let lenient = engine_with(|c| {
        c.integration = IntegrationConfig {
            max_abs_error: 1e-300,
            error_policy: ErrorPolicy::Warn,
            ..IntegrationConfig::default()
        }
    });
    let r = lenient.price_unconditional(&snapshot(), &sabr()).unwrap();
    assert_relative_eq!(r.pv, V0, max_relative = 1e-6);
}

#[test]
fn test_subdivision_limit_surfaces_as_integration_error() {
    let starved = engine_with(|c| {
        c.integration.max_intervals = 1;
        c.integration.absolute_accuracy = 1e-30;
        c.integration.relative_accuracy = 0.0;
    });
    assert!(matches!(
        starved.price_unconditional(&snapshot(), &sabr()),
        Err(Error::Integration { .. })
    ));
}

// ───────────────────────── inputs ─────────────────────────

#[test]
fn test_frequency_mismatch_is_rejected() {
    let quarterly = MarketSnapshot::new(0.9859, 0.0437, 5.0, 4, 10.0).unwrap();
    assert!(matches!(
        engine().price_unconditional(&quarterly, &sabr()),
        Err(Error::Precondition(_))
    ));
}

#[test]
fn test_forward_above_upper_bound_is_rejected() {
    let e = engine_with(|c| c.upper_bound = 0.04);
    assert!(e.price_unconditional(&snapshot(), &sabr()).is_err());
}

// ───────────────────────── quadrature cross-check ─────────────────────────

#[test]
fn test_simpson_and_gauss_kronrod_agree_on_core_strikes() {
    let s = snapshot();
    let smile = SabrSmileSection::new(s.expiry, s.forward, sabr()).unwrap();
    let kernel = ReplicationIntegrand::new(s.discount, &smile, s.annuity(), PowerPayoff::default());

    let gk = GaussKronrodAdaptive::new(1e-13, 1e-12, 200)
        .integrate(|k| kernel.call(k), 0.0437, 0.2)
        .unwrap();
    let simpson = SimpsonIntegral::new(1e-11, 1 << 20)
        .integrate(|k| kernel.call(k), 0.0437, 0.2)
        .unwrap();
    assert_relative_eq!(gk.value, simpson.value, max_relative = 1e-7);
}
