use super::common::*;
use crate::valuation::adjustments::{location_adjustment, market_sentiment, ownership_adjustment};
use crate::valuation::domain::FuelType;
use crate::valuation::rates::RateTables;

#[test]
fn ownership_multiplier_steps_down_per_owner() {
    let tables = RateTables::standard();
    let multipliers: Vec<f64> = (1..=5)
        .map(|owners| ownership_adjustment(&tables, owners).multiplier)
        .collect();
    assert_eq!(multipliers, vec![1.00, 0.93, 0.85, 0.75, 0.75]);
}

#[test]
fn three_or_more_owners_warn_about_financing() {
    let tables = RateTables::standard();
    assert!(ownership_adjustment(&tables, 2).findings.is_empty());
    assert_eq!(
        ownership_adjustment(&tables, 3).findings.warnings,
        vec!["3 owners. Financing may be difficult for buyers."]
    );
}

#[test]
fn old_diesel_earns_no_ban_premium() {
    let rules = RateTables::standard().location;
    let outcome = location_adjustment(&rules, "Innova Crysta", FuelType::Diesel, 6.0);
    assert_eq!(outcome.multiplier, 1.05);
    assert_eq!(outcome.findings.recommendations.len(), 1);

    let young = location_adjustment(&rules, "Innova Crysta", FuelType::Diesel, 5.0);
    assert_eq!(young.multiplier, 1.0);
}

#[test]
fn high_demand_model_premium_applies_between_three_and_five_years() {
    let rules = RateTables::standard().location;
    for (age, expected) in [(2.9, 1.0), (3.0, 1.03), (4.2, 1.03), (5.0, 1.03), (5.1, 1.0)] {
        let outcome = location_adjustment(&rules, "Creta SX", FuelType::Petrol, age);
        assert_eq!(outcome.multiplier, expected, "age {age}");
    }
}

#[test]
fn location_premiums_stack() {
    let mut rules = RateTables::standard().location;
    rules.high_demand_max_age_years = 8.0;
    let outcome = location_adjustment(&rules, "Verna", FuelType::Diesel, 5.5);
    assert!((outcome.multiplier - 1.05 * 1.03).abs() < 1e-12);
    assert_eq!(outcome.findings.recommendations.len(), 2);
}

#[test]
fn sentiment_disabled_by_default() {
    let tables = RateTables::standard();
    let outcome = market_sentiment(&tables.sentiment, &hatchback(), 2024);
    assert_eq!(outcome.multiplier, 1.0);
    assert!(outcome.factors.is_empty());
    assert!(outcome.findings.is_empty());
}

#[test]
fn sentiment_combines_all_four_factors() {
    let tables = RateTables::standard().with_market_sentiment(true);
    let mut vehicle = hatchback();
    vehicle.make = "Ford".to_string();
    vehicle.model = "EcoSport".to_string();
    vehicle.fuel_type = FuelType::Diesel;
    vehicle.year = 2020;

    let outcome = market_sentiment(&tables.sentiment, &vehicle, 2024);
    let names: Vec<_> = outcome.factors.iter().map(|f| f.factor.as_str()).collect();
    assert_eq!(names, vec!["fuel_type", "segment", "brand", "economic"]);

    let expected = 0.91 * 1.08 * 0.80 * 0.90;
    assert!((outcome.multiplier - expected).abs() < 1e-12);

    assert_eq!(
        outcome.findings.recommendations,
        vec!["Compact Suv segment: Very high demand post-2020"]
    );
    assert_eq!(
        outcome.findings.warnings,
        vec![
            "Diesel market: Declining Demand",
            "Ford has lower resale value (-20%)",
            "COVID-19 Pandemic: Market crash, uncertainty, production halted",
        ]
    );
}

#[test]
fn unknown_sentiment_inputs_are_neutral() {
    let tables = RateTables::standard().with_market_sentiment(true);
    let mut vehicle = hatchback();
    vehicle.make = "Lada".to_string();
    vehicle.model = "Niva".to_string();
    vehicle.year = 2012;

    let outcome = market_sentiment(&tables.sentiment, &vehicle, 2031);
    assert!(outcome.factors.iter().all(|factor| factor.multiplier == 1.0));
    assert_eq!(outcome.multiplier, 1.0);
    assert_eq!(outcome.findings.recommendations.len(), 4);
}

#[test]
fn multi_word_model_keywords_match() {
    let tables = RateTables::standard().with_market_sentiment(true);
    let mut vehicle = hatchback();
    vehicle.model = "Wagon R".to_string();

    let outcome = market_sentiment(&tables.sentiment, &vehicle, 2024);
    let segment = &outcome.factors[1];
    assert_eq!(segment.reason, "Hatchback segment: Stable demand, entry-level buyers");
}
