use std::collections::BTreeMap;

use super::{
    CategoryCaps, ConditionRubric, DentScale, DepreciationBracket, EconomicEvent, FixedCharges,
    FuelTrendPoint, FuelTrends, GearboxScale, GradeMultipliers, GradeThresholds, InsuranceBand,
    LocationRules, MarketTrend, MileageStandards, ModelSegment, NoiseScale, OnRoadSchedule,
    PartScale, PenaltyTier, RateTables, SegmentTrend, SentimentTables, SmokeScale, TierCharge,
    TransactionRates, TreadBand, UsageSchedule,
};

impl RateTables {
    /// Hyderabad / Telangana calibration. Market sentiment starts disabled.
    pub fn standard() -> Self {
        Self {
            depreciation: vec![
                bracket(0.0, Some(1.0), 0.17),
                bracket(1.0, Some(3.0), 0.11),
                bracket(3.0, Some(5.0), 0.09),
                bracket(5.0, None, 0.06),
            ],
            mileage: MileageStandards {
                petrol: 11_000,
                diesel: 16_500,
                cng: 20_000,
                electric: 11_000,
            },
            usage: UsageSchedule {
                tamper_km_per_year: 2_000.0,
                tamper_deviation_cap: 0.3,
                penalty_tiers: vec![
                    PenaltyTier {
                        span_km: Some(40_000.0),
                        charge: TierCharge::PerTenThousand { percent: 2.0 },
                    },
                    PenaltyTier {
                        span_km: Some(50_000.0),
                        charge: TierCharge::PerTenThousand { percent: 4.0 },
                    },
                    PenaltyTier {
                        span_km: Some(10_000.0),
                        charge: TierCharge::Barrier {
                            percent: 8.0,
                            barrier_km: 100_000,
                        },
                    },
                    PenaltyTier {
                        span_km: None,
                        charge: TierCharge::PerTenThousand { percent: 6.0 },
                    },
                ],
                bonus_percent_per_10k: 1.5,
                bonus_cap_percent: 10.0,
                multiplier_floor: 0.4,
            },
            condition: standard_rubric(),
            ownership_multipliers: vec![1.00, 0.93, 0.85, 0.75],
            transaction: TransactionRates {
                dealer_margin: 0.12,
                wholesale_discount: 0.08,
                tax_on_margin: 0.18,
                procurement_floor: 0.95,
                procurement_ceiling: 1.00,
            },
            location: LocationRules {
                diesel_no_ban_premium: 1.05,
                diesel_min_age_years: 5.0,
                high_demand_premium: 1.03,
                high_demand_models: ["baleno", "i20", "creta", "venue", "seltos", "city", "verna"]
                    .iter()
                    .map(|model| model.to_string())
                    .collect(),
                high_demand_min_age_years: 3.0,
                high_demand_max_age_years: 5.0,
            },
            sentiment: standard_sentiment(),
            on_road: standard_on_road(),
        }
    }
}

fn bracket(start_year: f64, end_year: Option<f64>, annual_rate: f64) -> DepreciationBracket {
    DepreciationBracket {
        start_year,
        end_year,
        annual_rate,
    }
}

fn standard_rubric() -> ConditionRubric {
    ConditionRubric {
        caps: CategoryCaps {
            engine: 35,
            body: 25,
            mechanical: 15,
            comfort: 15,
            documentation: 10,
        },
        frame_damage_points: -20,
        frame_intact_points: 5,
        engine_smoke: SmokeScale {
            none: 10,
            white: 3,
            black: 0,
        },
        engine_noise: NoiseScale {
            normal: 10,
            slight: 6,
            heavy: 0,
        },
        gearbox: GearboxScale {
            smooth: 10,
            rough: 5,
            slipping: 0,
        },
        dents: DentScale {
            none: 15,
            minor: 10,
            moderate: 5,
            severe: 0,
        },
        not_repainted_points: 5,
        rust_free_points: 5,
        tire_tread_bands: vec![
            TreadBand {
                min_percent: 75,
                points: 7,
            },
            TreadBand {
                min_percent: 50,
                points: 5,
            },
            TreadBand {
                min_percent: 30,
                points: 2,
            },
        ],
        worn_tire_points: 0,
        suspension: PartScale {
            excellent: 5,
            good: 4,
            fair: 2,
            poor: 0,
        },
        brakes: PartScale {
            excellent: 3,
            good: 2,
            fair: 1,
            poor: 0,
        },
        ac_working_points: 5,
        electrical_ok_points: 5,
        interior: PartScale {
            excellent: 5,
            good: 3,
            fair: 1,
            poor: 0,
        },
        service_history_points: 5,
        insurance_valid_points: 3,
        accident_free_points: 2,
        grade_thresholds: GradeThresholds {
            excellent: 90.0,
            very_good: 75.0,
            good: 50.0,
        },
        grade_multipliers: GradeMultipliers {
            excellent: 1.10,
            very_good: 1.05,
            good: 1.00,
            fair: 0.85,
        },
    }
}

fn trend_series(points: &[(i32, MarketTrend, f64)]) -> BTreeMap<i32, FuelTrendPoint> {
    points
        .iter()
        .map(|(year, trend, multiplier)| {
            (
                *year,
                FuelTrendPoint {
                    trend: *trend,
                    multiplier: *multiplier,
                },
            )
        })
        .collect()
}

fn standard_sentiment() -> SentimentTables {
    use MarketTrend::{Declining, Rising, Stable};

    let fuel_trends = FuelTrends {
        petrol: trend_series(&[
            (2015, Stable, 1.00),
            (2016, Stable, 1.00),
            (2017, Stable, 1.00),
            (2018, Stable, 1.00),
            (2019, Stable, 1.00),
            (2020, Rising, 1.03),
            (2021, Rising, 1.04),
            (2022, Rising, 1.05),
            (2023, Rising, 1.05),
            (2024, Stable, 1.03),
            (2025, Stable, 1.03),
        ]),
        diesel: trend_series(&[
            (2015, Stable, 1.05),
            (2016, Stable, 1.05),
            (2017, Stable, 1.05),
            (2018, Stable, 1.04),
            (2019, Declining, 1.02),
            (2020, Declining, 0.98),
            (2021, Declining, 0.95),
            (2022, Declining, 0.93),
            (2023, Declining, 0.92),
            (2024, Declining, 0.91),
            (2025, Declining, 0.90),
        ]),
        cng: trend_series(&[
            (2015, Stable, 0.98),
            (2016, Stable, 0.98),
            (2017, Rising, 1.00),
            (2018, Rising, 1.02),
            (2019, Rising, 1.03),
            (2020, Rising, 1.04),
            (2021, Rising, 1.06),
            (2022, Rising, 1.08),
            (2023, Rising, 1.08),
            (2024, Stable, 1.07),
            (2025, Stable, 1.07),
        ]),
        electric: trend_series(&[
            (2015, Stable, 0.85),
            (2016, Stable, 0.87),
            (2017, Stable, 0.89),
            (2018, Rising, 0.92),
            (2019, Rising, 0.95),
            (2020, Rising, 1.00),
            (2021, Rising, 1.05),
            (2022, Rising, 1.10),
            (2023, Rising, 1.12),
            (2024, Rising, 1.15),
            (2025, Rising, 1.18),
        ]),
    };

    let segments = [
        ("hatchback", 1.00, "Stable demand, entry-level buyers"),
        ("compact_suv", 1.08, "Very high demand post-2020"),
        ("suv", 1.05, "Growing demand"),
        ("sedan", 0.95, "Declining popularity, SUV preference"),
        ("mpv", 0.98, "Niche segment"),
        ("luxury", 0.85, "Steep depreciation"),
    ]
    .iter()
    .map(|(name, multiplier, trend)| {
        (
            name.to_string(),
            SegmentTrend {
                multiplier: *multiplier,
                trend: trend.to_string(),
            },
        )
    })
    .collect();

    let model_segments = [
        ("alto", "hatchback"),
        ("kwid", "hatchback"),
        ("wagon r", "hatchback"),
        ("swift", "hatchback"),
        ("baleno", "hatchback"),
        ("i20", "hatchback"),
        ("polo", "hatchback"),
        ("jazz", "hatchback"),
        ("altroz", "hatchback"),
        ("glanza", "hatchback"),
        ("venue", "compact_suv"),
        ("sonet", "compact_suv"),
        ("nexon", "compact_suv"),
        ("brezza", "compact_suv"),
        ("ecosport", "compact_suv"),
        ("xuv300", "compact_suv"),
        ("magnite", "compact_suv"),
        ("kiger", "compact_suv"),
        ("punch", "compact_suv"),
        ("creta", "suv"),
        ("seltos", "suv"),
        ("harrier", "suv"),
        ("hector", "suv"),
        ("xuv700", "suv"),
        ("compass", "suv"),
        ("alcazar", "suv"),
        ("safari", "suv"),
        ("scorpio", "suv"),
        ("dzire", "sedan"),
        ("amaze", "sedan"),
        ("aura", "sedan"),
        ("city", "sedan"),
        ("verna", "sedan"),
        ("ciaz", "sedan"),
        ("slavia", "sedan"),
        ("virtus", "sedan"),
        ("ertiga", "mpv"),
        ("marazzo", "mpv"),
        ("carens", "mpv"),
        ("innova", "mpv"),
        ("carnival", "mpv"),
    ]
    .iter()
    .map(|(keyword, segment)| ModelSegment {
        keyword: keyword.to_string(),
        segment: segment.to_string(),
    })
    .collect();

    let brand_resale_index = [
        ("maruti suzuki", 1.08),
        ("maruti", 1.08),
        ("honda", 1.05),
        ("toyota", 1.06),
        ("hyundai", 1.04),
        ("kia", 1.02),
        ("tata", 1.00),
        ("mahindra", 1.01),
        ("volkswagen", 0.95),
        ("skoda", 0.94),
        ("renault", 0.92),
        ("nissan", 0.93),
        ("ford", 0.80),
        ("chevrolet", 0.75),
        ("fiat", 0.70),
    ]
    .iter()
    .map(|(brand, multiplier)| (brand.to_string(), *multiplier))
    .collect();

    let economic_events = [
        (
            2020,
            "COVID-19 Pandemic",
            -0.10,
            "Market crash, uncertainty, production halted",
        ),
        (
            2021,
            "Chip Shortage + COVID Recovery",
            0.05,
            "High demand, limited new car supply",
        ),
        (
            2022,
            "Chip Shortage Continues",
            0.08,
            "New car waiting periods extended",
        ),
        (2023, "Market Normalization", 0.00, "Supply chains recovered"),
        (2024, "Stable Market", 0.00, "Normal market conditions"),
        (2025, "Stable Market", 0.00, "Normal market conditions"),
    ]
    .iter()
    .map(|(year, event, impact, notes)| {
        (
            *year,
            EconomicEvent {
                event: event.to_string(),
                impact: *impact,
                notes: notes.to_string(),
            },
        )
    })
    .collect();

    SentimentTables {
        enabled: false,
        fuel_trends,
        segments,
        model_segments,
        brand_resale_index,
        economic_events,
    }
}

fn standard_on_road() -> OnRoadSchedule {
    let road_tax_by_year = (2015..=2025)
        .map(|year| {
            let rate = match year {
                2015..=2017 => 0.12,
                2018..=2020 => 0.14,
                _ => 0.125,
            };
            (year, rate)
        })
        .collect();

    let charges = |registration: f64, smart_card: f64, cess: f64, other: f64| FixedCharges {
        registration,
        smart_card,
        cess,
        other,
    };
    let fixed_charges_by_year = BTreeMap::from([
        (2015, charges(600.0, 300.0, 200.0, 500.0)),
        (2016, charges(600.0, 300.0, 200.0, 500.0)),
        (2017, charges(800.0, 400.0, 300.0, 600.0)),
        (2018, charges(1_000.0, 500.0, 300.0, 700.0)),
        (2019, charges(1_000.0, 500.0, 300.0, 700.0)),
        (2020, charges(1_200.0, 600.0, 400.0, 800.0)),
        (2021, charges(1_200.0, 600.0, 400.0, 800.0)),
        (2022, charges(1_500.0, 700.0, 500.0, 1_000.0)),
        (2023, charges(1_500.0, 700.0, 500.0, 1_000.0)),
        (2024, charges(1_800.0, 800.0, 600.0, 1_200.0)),
        (2025, charges(2_000.0, 900.0, 700.0, 1_400.0)),
    ]);

    OnRoadSchedule {
        home_state_codes: vec![
            "telangana".to_string(),
            "tg".to_string(),
            "hyderabad".to_string(),
        ],
        road_tax_by_year,
        default_road_tax_rate: 0.12,
        fixed_charges_by_year,
        insurance_bands: vec![
            InsuranceBand {
                below: Some(500_000.0),
                rate: 0.04,
            },
            InsuranceBand {
                below: Some(1_000_000.0),
                rate: 0.035,
            },
            InsuranceBand {
                below: None,
                rate: 0.03,
            },
        ],
        insurance_baseline_year: 2015,
        insurance_annual_escalation: 0.02,
    }
}
