use super::domain::{FuelType, SentimentFactor, VehicleInput};
use super::findings::Findings;
use super::rates::{LocationRules, MarketTrend, RateTables, SentimentTables};

/// A single multiplier and whatever it had to say about the vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentOutcome {
    pub multiplier: f64,
    pub findings: Findings,
}

impl AdjustmentOutcome {
    fn neutral() -> Self {
        Self {
            multiplier: 1.0,
            findings: Findings::new(),
        }
    }
}

/// Counts past the end of the ownership table reuse its last entry.
pub fn ownership_adjustment(tables: &RateTables, owners: u32) -> AdjustmentOutcome {
    let multiplier = tables.ownership_multiplier(owners);

    let mut findings = Findings::new();
    if owners >= 3 {
        findings.warn(format!(
            "{owners} owners. Financing may be difficult for buyers."
        ));
    }

    AdjustmentOutcome {
        multiplier,
        findings,
    }
}

pub fn location_adjustment(
    rules: &LocationRules,
    model: &str,
    fuel: FuelType,
    age_years: f64,
) -> AdjustmentOutcome {
    let mut outcome = AdjustmentOutcome::neutral();

    if fuel == FuelType::Diesel && age_years > rules.diesel_min_age_years {
        outcome.multiplier *= rules.diesel_no_ban_premium;
        outcome
            .findings
            .recommend("Diesel vehicle in Hyderabad market: No age-based ban. Premium applied.");
    }

    let model = model.to_lowercase();
    let in_demand = rules
        .high_demand_models
        .iter()
        .any(|keyword| model.contains(keyword.as_str()));
    let in_window = (rules.high_demand_min_age_years..=rules.high_demand_max_age_years)
        .contains(&age_years);
    if in_demand && in_window {
        outcome.multiplier *= rules.high_demand_premium;
        outcome
            .findings
            .recommend("High-demand model in Hyderabad IT corridor market. Premium applied.");
    }

    outcome
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentOutcome {
    pub multiplier: f64,
    pub factors: Vec<SentimentFactor>,
    pub findings: Findings,
}

/// Combines fuel trend, segment, brand and economic-year factors.
///
/// The fuel trend is read for the valuation year, the economic factor for the
/// purchase year. Returns a neutral outcome when sentiment is disabled.
pub fn market_sentiment(
    tables: &SentimentTables,
    vehicle: &VehicleInput,
    valuation_year: i32,
) -> SentimentOutcome {
    if !tables.enabled {
        return SentimentOutcome {
            multiplier: 1.0,
            factors: Vec::new(),
            findings: Findings::new(),
        };
    }

    let factors = vec![
        fuel_factor(tables, vehicle.fuel_type, valuation_year),
        segment_factor(tables, &vehicle.model),
        brand_factor(tables, &vehicle.make),
        economic_factor(tables, vehicle.year),
    ];

    let mut findings = Findings::new();
    for factor in &factors {
        if factor.multiplier >= 1.0 {
            findings.recommend(factor.reason.clone());
        } else {
            findings.warn(factor.reason.clone());
        }
    }

    SentimentOutcome {
        multiplier: factors.iter().map(|factor| factor.multiplier).product(),
        factors,
        findings,
    }
}

fn factor(name: &str, multiplier: f64, reason: String) -> SentimentFactor {
    SentimentFactor {
        factor: name.to_string(),
        multiplier,
        reason,
    }
}

fn fuel_factor(tables: &SentimentTables, fuel: FuelType, year: i32) -> SentimentFactor {
    let (multiplier, trend) = tables
        .fuel_trends
        .for_fuel(fuel)
        .get(&year)
        .map(|point| (point.multiplier, point.trend))
        .unwrap_or((1.0, MarketTrend::Stable));
    factor(
        "fuel_type",
        multiplier,
        format!("{} market: {}", fuel.label(), trend.label()),
    )
}

fn segment_factor(tables: &SentimentTables, model: &str) -> SentimentFactor {
    let model = model.to_lowercase();
    let segment = tables
        .model_segments
        .iter()
        .find(|mapping| model.contains(mapping.keyword.as_str()))
        .and_then(|mapping| {
            tables
                .segments
                .get(&mapping.segment)
                .map(|trend| (mapping.segment.as_str(), trend))
        });

    match segment {
        Some((name, trend)) => factor(
            "segment",
            trend.multiplier,
            format!("{} segment: {}", title_case(name), trend.trend),
        ),
        None => factor("segment", 1.0, "Unknown segment, using baseline".to_string()),
    }
}

fn brand_factor(tables: &SentimentTables, make: &str) -> SentimentFactor {
    let key = make.trim().to_lowercase();
    let Some(multiplier) = tables.brand_resale_index.get(&key).copied() else {
        return factor("brand", 1.0, format!("{make} - standard resale value"));
    };

    let delta = (multiplier - 1.0) * 100.0;
    let reason = if multiplier > 1.0 {
        format!("{make} has excellent resale value (+{delta:.0}%)")
    } else if multiplier < 1.0 {
        format!("{make} has lower resale value ({delta:.0}%)")
    } else {
        format!("{make} has standard resale value")
    };
    factor("brand", multiplier, reason)
}

fn economic_factor(tables: &SentimentTables, purchase_year: i32) -> SentimentFactor {
    match tables.economic_events.get(&purchase_year) {
        Some(event) => factor(
            "economic",
            1.0 + event.impact,
            format!("{}: {}", event.event, event.notes),
        ),
        None => factor("economic", 1.0, "No significant economic events".to_string()),
    }
}

fn title_case(segment: &str) -> String {
    segment
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
