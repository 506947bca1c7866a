use super::common::*;
use crate::valuation::domain::{BasePrice, ConditionGrade, DentLevel, EngineSmoke, PriceBasis};
use crate::valuation::engine::{age_in_years, ValuationEngine, ValuationError, ValuationRequest};
use crate::valuation::pricing::NoPriceResolver;
use crate::valuation::rates::{RateTableError, RateTables};
use crate::valuation::validation::InputViolation;

#[test]
fn three_year_old_petrol_hatchback_end_to_end() {
    let resolver = CountingResolver::with_price(on_road(700_000.0));
    let result = engine()
        .appraise(&request(hatchback()), &resolver)
        .expect("valuation succeeds");

    let age = age_in_years(date(2021, 3, 15), today());
    let depreciated = 700_000.0 * 0.83 * 0.89 * 0.89 * (1.0 - 0.09 * (age - 3.0));
    let expected_odometer = (age * 11_000.0).trunc();
    let usage = 1.0 - (45_000.0 - expected_odometer) / 10_000.0 * 2.0 / 100.0;
    let fmv = depreciated * usage;

    assert_eq!(resolver.calls(), 1);
    assert_eq!(result.base_price, 700_000.0);
    assert_eq!(result.base_price_source, "test_fixture");
    assert!(result.on_road_breakdown.is_none());
    assert_eq!(result.expected_odometer, 33_007);
    assert_eq!(result.odometer_deviation, 11_993);
    assert_close(result.depreciated_value, depreciated);
    assert_eq!(result.usage_multiplier, 0.976);
    assert_eq!(result.condition_grade, ConditionGrade::Good);
    assert_eq!(result.condition_multiplier, 1.0);
    assert_eq!(result.ownership_multiplier, 1.0);
    assert_eq!(result.location_multiplier, 1.0);
    assert_eq!(result.market_sentiment_multiplier, 1.0);
    assert_close(result.fair_market_value, fmv);
    assert_close(result.trade_in_price, fmv * 0.88);
    assert_close(result.retail_price, fmv * 1.1416);
    assert_close(result.wholesale_price, fmv * 0.80);
    assert_close(result.procurement_min, fmv * 0.88 * 0.95);
    assert_eq!(result.procurement_max, result.trade_in_price);
    assert!(result.warnings.is_empty());
    assert!(result.recommendations.is_empty());
    assert_eq!(
        result.depreciation_breakdown.labels().collect::<Vec<_>>(),
        vec!["year_0_1", "year_2", "year_3", "year_4_partial"]
    );
}

#[test]
fn price_ordering_holds_for_valued_vehicle() {
    let resolver = CountingResolver::with_price(on_road(1_250_000.0));
    let result = engine()
        .appraise(&request(hatchback()), &resolver)
        .expect("valuation succeeds");

    assert!(result.trade_in_price < result.fair_market_value);
    assert!(result.fair_market_value < result.retail_price);
    assert!(result.wholesale_price <= result.trade_in_price);
    assert!(result.procurement_min <= result.procurement_max);
}

#[test]
fn identical_inputs_produce_identical_results() {
    let engine = engine();
    let resolver = CountingResolver::with_price(on_road(700_000.0));
    let first = engine
        .appraise(&request(hatchback()), &resolver)
        .expect("first valuation");
    let second = engine
        .appraise(&request(hatchback()), &resolver)
        .expect("second valuation");
    assert_eq!(first, second);
}

#[test]
fn resolver_failure_falls_back_with_warning() {
    let result = engine()
        .appraise(&request(hatchback()), &FailingResolver)
        .expect("fallback keeps valuation alive");

    assert_eq!(result.base_price, 800_000.0);
    assert_eq!(result.base_price_source, "fallback_estimate");
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].starts_with("Price lookup failed (price source unavailable"));
    assert!(result.warnings[0].contains("Rs 800,000"));
}

#[test]
fn missing_price_falls_back_with_warning() {
    let result = engine()
        .appraise(&request(hatchback()), &NoPriceResolver)
        .expect("fallback keeps valuation alive");

    assert_eq!(result.base_price, 800_000.0);
    assert!(result.warnings[0].starts_with("No reference price found for Maruti Suzuki Swift"));
}

#[test]
fn unusable_price_falls_back_with_warning() {
    for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        let resolver = CountingResolver::with_price(BasePrice::on_road(amount, "scraper"));
        let result = engine()
            .appraise(&request(hatchback()), &resolver)
            .expect("fallback keeps valuation alive");
        assert_eq!(result.base_price, 800_000.0);
        assert!(result.warnings[0].contains("Reference price from scraper was not usable"));
    }
}

#[test]
fn ex_showroom_price_is_converted_to_on_road() {
    let resolver =
        CountingResolver::with_price(BasePrice::ex_showroom(600_000.0, "dealer_quote"));
    let result = engine()
        .appraise(&request(hatchback()), &resolver)
        .expect("valuation succeeds");

    let breakdown = result.on_road_breakdown.expect("conversion recorded");
    assert_eq!(breakdown.road_tax_rate, 0.125);
    assert_eq!(breakdown.road_tax, 75_000.0);
    assert_eq!(breakdown.insurance, 23_520.0);
    assert_eq!(breakdown.total_on_road, 701_520.0);
    assert_eq!(result.base_price, 701_520.0);
    assert_eq!(result.base_price_source, "dealer_quote");
}

#[test]
fn other_home_state_uses_default_road_tax() {
    let engine = engine().with_home_state("karnataka");
    let resolver =
        CountingResolver::with_price(BasePrice::ex_showroom(600_000.0, "dealer_quote"));
    let result = engine
        .appraise(&request(hatchback()), &resolver)
        .expect("valuation succeeds");
    let breakdown = result.on_road_breakdown.expect("conversion recorded");
    assert_eq!(breakdown.road_tax_rate, 0.12);
}

#[test]
fn invalid_inputs_are_rejected_before_resolution() {
    type Mutation = Box<dyn Fn(&mut ValuationRequest)>;
    let cases: Vec<(Mutation, InputViolation)> = vec![
        (
            Box::new(|req| req.vehicle.owners = 0),
            InputViolation::OwnerCount { found: 0 },
        ),
        (
            Box::new(|req| req.vehicle.inspection.tire_tread = 101),
            InputViolation::TireTread { found: 101 },
        ),
        (
            Box::new(|req| req.vehicle.make = "  ".to_string()),
            InputViolation::MissingField { field: "make" },
        ),
        (
            Box::new(|req| req.vehicle.model = String::new()),
            InputViolation::MissingField { field: "model" },
        ),
        (
            Box::new(|req| req.vehicle.registration_date = date(2024, 3, 16)),
            InputViolation::RegistrationInFuture {
                registration: date(2024, 3, 16),
                today: today(),
            },
        ),
    ];

    for (mutate, expected) in cases {
        let resolver = CountingResolver::with_price(on_road(700_000.0));
        let mut req = request(hatchback());
        mutate(&mut req);

        match engine().appraise(&req, &resolver) {
            Err(ValuationError::InvalidInput(violation)) => assert_eq!(violation, expected),
            other => panic!("expected {expected:?}, got {other:?}"),
        }
        assert_eq!(resolver.calls(), 0);
    }
}

#[test]
fn non_positive_fallback_is_rejected() {
    let mut req = request(hatchback());
    req.fallback = BasePrice::on_road(0.0, "fallback_estimate");
    assert!(matches!(
        engine().appraise(&req, &NoPriceResolver),
        Err(ValuationError::InvalidInput(InputViolation::Price { .. }))
    ));
}

#[test]
fn registration_on_valuation_day_is_allowed() {
    let mut vehicle = hatchback();
    vehicle.registration_date = today();
    vehicle.odometer = 0;
    let resolver = CountingResolver::with_price(on_road(700_000.0));
    let result = engine()
        .appraise(&request(vehicle), &resolver)
        .expect("same-day valuation");
    assert_eq!(result.age_years, 0.0);
    assert_eq!(result.depreciated_value, 700_000.0);
    assert_eq!(result.usage_multiplier, 1.0);
}

#[test]
fn findings_follow_step_order() {
    let mut vehicle = hatchback();
    vehicle.odometer = 33_007 + 95_000;
    vehicle.owners = 3;
    vehicle.inspection.electrical_issues = true;

    let resolver = CountingResolver::with_price(on_road(700_000.0));
    let result = engine()
        .appraise(&request(vehicle), &resolver)
        .expect("valuation succeeds");

    assert_eq!(result.warnings.len(), 3);
    assert!(result.warnings[0].contains("psychological barrier"));
    assert!(result.warnings[1].starts_with("Electrical issues"));
    assert!(result.warnings[2].starts_with("3 owners"));
}

#[test]
fn grade_driven_closing_recommendations() {
    let resolver = CountingResolver::with_price(on_road(700_000.0));

    let mut excellent = hatchback();
    excellent.inspection = pristine_inspection();
    let result = engine()
        .appraise(&request(excellent), &resolver)
        .expect("valuation succeeds");
    assert_eq!(result.condition_grade, ConditionGrade::Excellent);
    assert_eq!(
        result.recommendations.last().map(String::as_str),
        Some("EXCELLENT condition. Can be sold at premium pricing.")
    );

    let mut fair = hatchback();
    fair.inspection.dents_scratches = DentLevel::Severe;
    fair.inspection.engine_smoke = EngineSmoke::White;
    fair.inspection.ac_working = false;
    let result = engine()
        .appraise(&request(fair), &resolver)
        .expect("valuation succeeds");
    assert_eq!(result.condition_grade, ConditionGrade::Fair);
    assert_eq!(result.condition_multiplier, 0.85);
    assert_eq!(
        result.recommendations.last().map(String::as_str),
        Some("FAIR condition. Reconditioning required before resale.")
    );
}

#[test]
fn market_sentiment_feeds_fair_market_value() {
    let resolver = CountingResolver::with_price(on_road(700_000.0));
    let plain = engine()
        .appraise(&request(hatchback()), &resolver)
        .expect("valuation succeeds");
    let with_sentiment = sentiment_engine()
        .appraise(&request(hatchback()), &resolver)
        .expect("valuation succeeds");

    // Petrol 2024 1.03, hatchback 1.00, Maruti Suzuki 1.08, 2021 purchase 1.05
    let expected = 1.03 * 1.00 * 1.08 * 1.05;
    assert_eq!(with_sentiment.sentiment_factors.len(), 4);
    assert_eq!(
        with_sentiment.market_sentiment_multiplier,
        (expected * 10_000.0_f64).round() / 10_000.0
    );
    // both sides are rounded to the paisa before comparing
    assert!((with_sentiment.fair_market_value - plain.fair_market_value * expected).abs() < 0.02);
}

#[test]
fn on_road_price_rejects_non_positive_amounts() {
    let engine = engine();
    assert!(engine.on_road_price(0.0, 2020, "telangana").is_err());
    let breakdown = engine
        .on_road_price(450_000.0, 2016, "tg")
        .expect("valid amount");
    assert_eq!(breakdown.road_tax_rate, 0.12);
}

#[test]
fn malformed_tables_fail_engine_construction() {
    let mut tables = RateTables::standard();
    tables.ownership_multipliers.clear();
    assert!(matches!(
        ValuationEngine::new(tables),
        Err(RateTableError::EmptyOwnership)
    ));
}

#[test]
fn fallback_basis_can_be_ex_showroom() {
    let mut req = request(hatchback());
    req.fallback = BasePrice::ex_showroom(600_000.0, "fallback_estimate");
    let result = engine()
        .appraise(&req, &NoPriceResolver)
        .expect("valuation succeeds");
    assert_eq!(
        result.on_road_breakdown.map(|b| b.ex_showroom),
        Some(600_000.0)
    );
    assert_eq!(req.fallback.basis, PriceBasis::ExShowroom);
}
