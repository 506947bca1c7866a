/// Property-based tests for the numeric invariants of the valuation pipeline
use obv_engine::valuation::depreciation::depreciate;
use obv_engine::valuation::transaction::{procurement_range, transaction_prices};
use obv_engine::valuation::usage::adjust_for_usage;
use obv_engine::valuation::{FuelType, RateTables};
use proptest::prelude::*;

fn fuel_type() -> impl Strategy<Value = FuelType> {
    prop_oneof![
        Just(FuelType::Petrol),
        Just(FuelType::Diesel),
        Just(FuelType::Cng),
        Just(FuelType::Electric),
    ]
}

// Property: depreciation never increases with age and stays within [0, base]
proptest! {
    #[test]
    fn depreciation_is_monotone_and_bounded(
        base in 10_000.0f64..10_000_000.0,
        younger in 0.0f64..40.0,
        gap in 0.0f64..20.0,
    ) {
        let tables = RateTables::standard();
        let older = younger + gap;

        let young_value = depreciate(&tables.depreciation, younger, base).value;
        let old_value = depreciate(&tables.depreciation, older, base).value;

        prop_assert!(young_value >= 0.0 && young_value <= base);
        prop_assert!(old_value >= 0.0 && old_value <= base);
        prop_assert!(old_value <= young_value + base * 1e-12);
    }

    #[test]
    fn depreciation_breakdown_accounts_for_the_loss(
        base in 10_000.0f64..10_000_000.0,
        age in 0.0f64..15.0,
    ) {
        let tables = RateTables::standard();
        let outcome = depreciate(&tables.depreciation, age, base);
        let loss = base - outcome.value;
        prop_assert!((outcome.breakdown.total() - loss).abs() < base * 1e-9);
    }
}

// Property: the usage multiplier stays between the floor and the capped bonus
proptest! {
    #[test]
    fn usage_multiplier_is_bounded(
        age in 0.0f64..25.0,
        odometer in 0u64..1_000_000,
        fuel in fuel_type(),
    ) {
        let tables = RateTables::standard();
        let outcome = adjust_for_usage(&tables.mileage, &tables.usage, age, odometer, fuel);

        prop_assert!(outcome.multiplier >= tables.usage.multiplier_floor);
        prop_assert!(outcome.multiplier <= 1.0 + tables.usage.bonus_cap_percent / 100.0 + 1e-12);
        prop_assert_eq!(outcome.deviation > 0, outcome.multiplier < 1.0);
    }
}

// Property: trade-in < fair market value < retail and wholesale <= trade-in
proptest! {
    #[test]
    fn transaction_prices_are_ordered(fmv in 1.0f64..50_000_000.0) {
        let rates = RateTables::standard().transaction;
        let prices = transaction_prices(&rates, fmv);

        prop_assert!(prices.c2b < prices.c2c);
        prop_assert!(prices.c2c < prices.b2c);
        prop_assert!(prices.b2b <= prices.c2b);

        let window = procurement_range(&rates, prices.c2b);
        prop_assert!(window.min <= window.max);
        prop_assert!(window.max <= prices.c2c);
    }
}
