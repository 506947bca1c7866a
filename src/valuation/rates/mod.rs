//! Calibration tables consumed by every valuation step.
//!
//! `RateTables::standard()` carries the Hyderabad calibration. Callers that need
//! different numbers (tests, other regions) build or deserialize their own copy
//! and hand it to `ValuationEngine::new`, which validates it once up front so a
//! malformed table can never surface halfway through a valuation.

mod standard;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{FuelType, PartCondition};

/// Every constant the engine reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTables {
    pub depreciation: Vec<DepreciationBracket>,
    pub mileage: MileageStandards,
    pub usage: UsageSchedule,
    pub condition: ConditionRubric,
    /// Index 0 is the first owner; counts past the end use the last entry.
    pub ownership_multipliers: Vec<f64>,
    pub transaction: TransactionRates,
    pub location: LocationRules,
    pub sentiment: SentimentTables,
    pub on_road: OnRoadSchedule,
}

/// One age bracket of the depreciation curve. `end_year: None` is open ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationBracket {
    pub start_year: f64,
    pub end_year: Option<f64>,
    pub annual_rate: f64,
}

/// Standard kilometres per year by fuel type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MileageStandards {
    pub petrol: u64,
    pub diesel: u64,
    pub cng: u64,
    pub electric: u64,
}

impl MileageStandards {
    pub fn annual_km(&self, fuel: FuelType) -> u64 {
        match fuel {
            FuelType::Petrol => self.petrol,
            FuelType::Diesel => self.diesel,
            FuelType::Cng => self.cng,
            FuelType::Electric => self.electric,
        }
    }
}

/// Odometer deviation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSchedule {
    /// Readings below `age * tamper_km_per_year` are treated as suspicious.
    pub tamper_km_per_year: f64,
    /// A suspicious reading may not claim more than this share of the expected
    /// distance as under-use.
    pub tamper_deviation_cap: f64,
    pub penalty_tiers: Vec<PenaltyTier>,
    pub bonus_percent_per_10k: f64,
    pub bonus_cap_percent: f64,
    pub multiplier_floor: f64,
}

/// A slice of excess kilometres and how it is charged. `span_km: None` is open ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyTier {
    pub span_km: Option<f64>,
    pub charge: TierCharge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TierCharge {
    /// Percent per 10,000 km consumed from the tier.
    PerTenThousand { percent: f64 },
    /// Charged in full once any distance reaches the tier; flags a psychological barrier.
    Barrier { percent: f64, barrier_km: u64 },
}

/// Points and caps of the 16-point inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRubric {
    pub caps: CategoryCaps,
    pub frame_damage_points: i32,
    pub frame_intact_points: i32,
    pub engine_smoke: SmokeScale,
    pub engine_noise: NoiseScale,
    pub gearbox: GearboxScale,
    pub dents: DentScale,
    pub not_repainted_points: i32,
    pub rust_free_points: i32,
    /// Checked in order; the first band whose minimum is met wins.
    pub tire_tread_bands: Vec<TreadBand>,
    pub worn_tire_points: i32,
    pub suspension: PartScale,
    pub brakes: PartScale,
    pub ac_working_points: i32,
    pub electrical_ok_points: i32,
    pub interior: PartScale,
    pub service_history_points: i32,
    pub insurance_valid_points: i32,
    pub accident_free_points: i32,
    pub grade_thresholds: GradeThresholds,
    pub grade_multipliers: GradeMultipliers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCaps {
    pub engine: i32,
    pub body: i32,
    pub mechanical: i32,
    pub comfort: i32,
    pub documentation: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmokeScale {
    pub none: i32,
    pub white: i32,
    pub black: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseScale {
    pub normal: i32,
    pub slight: i32,
    pub heavy: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearboxScale {
    pub smooth: i32,
    pub rough: i32,
    pub slipping: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DentScale {
    pub none: i32,
    pub minor: i32,
    pub moderate: i32,
    pub severe: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartScale {
    pub excellent: i32,
    pub good: i32,
    pub fair: i32,
    pub poor: i32,
}

impl PartScale {
    pub fn points(&self, condition: PartCondition) -> i32 {
        match condition {
            PartCondition::Excellent => self.excellent,
            PartCondition::Good => self.good,
            PartCondition::Fair => self.fair,
            PartCondition::Poor => self.poor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreadBand {
    pub min_percent: u8,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeThresholds {
    pub excellent: f64,
    pub very_good: f64,
    pub good: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeMultipliers {
    pub excellent: f64,
    pub very_good: f64,
    pub good: f64,
    pub fair: f64,
}

/// Dealer economics used to derive the transaction-context prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRates {
    pub dealer_margin: f64,
    pub wholesale_discount: f64,
    pub tax_on_margin: f64,
    pub procurement_floor: f64,
    pub procurement_ceiling: f64,
}

/// Regional premiums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRules {
    pub diesel_no_ban_premium: f64,
    /// Diesel premium applies strictly above this age.
    pub diesel_min_age_years: f64,
    pub high_demand_premium: f64,
    pub high_demand_models: Vec<String>,
    pub high_demand_min_age_years: f64,
    pub high_demand_max_age_years: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketTrend {
    #[serde(rename = "Rising Demand")]
    Rising,
    Stable,
    #[serde(rename = "Declining Demand")]
    Declining,
}

impl MarketTrend {
    pub const fn label(self) -> &'static str {
        match self {
            MarketTrend::Rising => "Rising Demand",
            MarketTrend::Stable => "Stable",
            MarketTrend::Declining => "Declining Demand",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelTrendPoint {
    pub trend: MarketTrend,
    pub multiplier: f64,
}

/// Year-indexed trend per fuel type, keyed by the valuation year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelTrends {
    pub petrol: BTreeMap<i32, FuelTrendPoint>,
    pub diesel: BTreeMap<i32, FuelTrendPoint>,
    pub cng: BTreeMap<i32, FuelTrendPoint>,
    pub electric: BTreeMap<i32, FuelTrendPoint>,
}

impl FuelTrends {
    pub fn for_fuel(&self, fuel: FuelType) -> &BTreeMap<i32, FuelTrendPoint> {
        match fuel {
            FuelType::Petrol => &self.petrol,
            FuelType::Diesel => &self.diesel,
            FuelType::Cng => &self.cng,
            FuelType::Electric => &self.electric,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentTrend {
    pub multiplier: f64,
    pub trend: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSegment {
    pub keyword: String,
    pub segment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicEvent {
    pub event: String,
    pub impact: f64,
    pub notes: String,
}

/// Market sentiment inputs. Disabled unless `enabled` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentTables {
    pub enabled: bool,
    pub fuel_trends: FuelTrends,
    pub segments: BTreeMap<String, SegmentTrend>,
    /// Matched in order against the lower-cased model name.
    pub model_segments: Vec<ModelSegment>,
    pub brand_resale_index: BTreeMap<String, f64>,
    /// Keyed by purchase year.
    pub economic_events: BTreeMap<i32, EconomicEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCharges {
    pub registration: f64,
    pub smart_card: f64,
    pub cess: f64,
    pub other: f64,
}

/// Insurance premium rate for ex-showroom prices below `below` (`None` = no upper bound).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceBand {
    pub below: Option<f64>,
    pub rate: f64,
}

/// Taxes and charges used to convert ex-showroom into on-road prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnRoadSchedule {
    /// Lower-cased state names and codes that use `road_tax_by_year`.
    pub home_state_codes: Vec<String>,
    pub road_tax_by_year: BTreeMap<i32, f64>,
    pub default_road_tax_rate: f64,
    pub fixed_charges_by_year: BTreeMap<i32, FixedCharges>,
    pub insurance_bands: Vec<InsuranceBand>,
    pub insurance_baseline_year: i32,
    pub insurance_annual_escalation: f64,
}

impl OnRoadSchedule {
    pub fn is_home_state(&self, state: &str) -> bool {
        let normalized = state.trim().to_ascii_lowercase();
        self.home_state_codes.iter().any(|code| *code == normalized)
    }
}

/// Malformed calibration detected while building an engine.
#[derive(Debug, thiserror::Error)]
pub enum RateTableError {
    #[error("depreciation schedule needs at least one bracket")]
    EmptyDepreciation,
    #[error("depreciation bracket {index} starts at {found} but should start at {expected}")]
    BracketGap {
        index: usize,
        expected: f64,
        found: f64,
    },
    #[error("depreciation bracket {index} must end after it starts")]
    BracketOrder { index: usize },
    #[error("depreciation bracket {index} must end on a whole year, found {end}")]
    FractionalBracketEnd { index: usize, end: f64 },
    #[error("only the last depreciation bracket may be open ended (bracket {index})")]
    OpenBracket { index: usize },
    #[error("the last depreciation bracket must be open ended")]
    ClosedSchedule,
    #[error("depreciation rate {rate} in bracket {index} must be within [0, 1)")]
    BracketRate { index: usize, rate: f64 },
    #[error("first depreciation bracket would remove more than the whole price")]
    FirstBracketOverrun,
    #[error("standard mileage for {fuel} must be positive")]
    Mileage { fuel: &'static str },
    #[error("usage penalty tiers are malformed: {0}")]
    UsageTiers(String),
    #[error("usage bonus/floor settings are malformed: {0}")]
    UsageLimits(String),
    #[error("ownership multiplier table must not be empty")]
    EmptyOwnership,
    #[error("ownership multiplier {value} for owner {owner} must be within (0, 2]")]
    OwnershipMultiplier { owner: usize, value: f64 },
    #[error("condition category caps must be positive")]
    CategoryCaps,
    #[error("condition grade thresholds must descend strictly within (0, 100]")]
    GradeThresholds,
    #[error("condition grade multipliers must be positive")]
    GradeMultipliers,
    #[error("tire tread bands must list strictly descending minimums within [0, 100]")]
    TreadBands,
    #[error("transaction rates are malformed: {0}")]
    Transaction(String),
    #[error("location premium {name} must be positive")]
    LocationPremium { name: &'static str },
    #[error("sentiment model keyword '{keyword}' maps to unknown segment '{segment}'")]
    UnknownSegment { keyword: String, segment: String },
    #[error("sentiment multiplier for {name} must be positive")]
    SentimentMultiplier { name: String },
    #[error("on-road fixed charge table must not be empty")]
    EmptyFixedCharges,
    #[error("on-road insurance bands must be non-empty, ascending, and end unbounded")]
    InsuranceBands,
    #[error("on-road tax rate for {year} must be within [0, 1)")]
    RoadTax { year: String },
    #[error("rate table file could not be read: {0}")]
    Io(#[from] std::io::Error),
    #[error("rate table file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Default for RateTables {
    fn default() -> Self {
        Self::standard()
    }
}

impl RateTables {
    /// Reads a JSON rate table and validates it.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RateTableError> {
        let tables: RateTables = serde_json::from_reader(reader)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RateTableError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn with_market_sentiment(mut self, enabled: bool) -> Self {
        self.sentiment.enabled = enabled;
        self
    }

    pub fn ownership_multiplier(&self, owners: u32) -> f64 {
        let index = (owners.max(1) as usize) - 1;
        self.ownership_multipliers
            .get(index)
            .or_else(|| self.ownership_multipliers.last())
            .copied()
            .unwrap_or(1.0)
    }

    pub fn validate(&self) -> Result<(), RateTableError> {
        self.validate_depreciation()?;
        self.validate_usage()?;
        self.validate_condition()?;
        self.validate_ownership()?;
        self.validate_transaction()?;
        self.validate_location()?;
        self.validate_sentiment()?;
        self.validate_on_road()
    }

    fn validate_depreciation(&self) -> Result<(), RateTableError> {
        let brackets = &self.depreciation;
        if brackets.is_empty() {
            return Err(RateTableError::EmptyDepreciation);
        }

        let mut expected_start = 0.0;
        for (index, bracket) in brackets.iter().enumerate() {
            if (bracket.start_year - expected_start).abs() > f64::EPSILON {
                return Err(RateTableError::BracketGap {
                    index,
                    expected: expected_start,
                    found: bracket.start_year,
                });
            }
            if !(0.0..1.0).contains(&bracket.annual_rate) {
                return Err(RateTableError::BracketRate {
                    index,
                    rate: bracket.annual_rate,
                });
            }

            let is_last = index + 1 == brackets.len();
            match bracket.end_year {
                Some(end) if end <= bracket.start_year || !end.is_finite() => {
                    return Err(RateTableError::BracketOrder { index });
                }
                Some(end) if end.fract() != 0.0 => {
                    return Err(RateTableError::FractionalBracketEnd { index, end });
                }
                Some(_) if is_last => return Err(RateTableError::ClosedSchedule),
                Some(end) => expected_start = end,
                None if !is_last => return Err(RateTableError::OpenBracket { index }),
                None => {}
            }
        }

        if let Some(end) = brackets[0].end_year {
            if brackets[0].annual_rate * end > 1.0 {
                return Err(RateTableError::FirstBracketOverrun);
            }
        }

        Ok(())
    }

    fn validate_usage(&self) -> Result<(), RateTableError> {
        let mileage = [
            ("Petrol", self.mileage.petrol),
            ("Diesel", self.mileage.diesel),
            ("CNG", self.mileage.cng),
            ("Electric", self.mileage.electric),
        ];
        if let Some((fuel, _)) = mileage.iter().find(|(_, km)| *km == 0) {
            return Err(RateTableError::Mileage { fuel });
        }

        let usage = &self.usage;
        let tiers = &usage.penalty_tiers;
        if tiers.is_empty() {
            return Err(RateTableError::UsageTiers("no tiers defined".to_string()));
        }
        for (index, tier) in tiers.iter().enumerate() {
            let is_last = index + 1 == tiers.len();
            match tier.span_km {
                Some(span) if !(span.is_finite() && span > 0.0) => {
                    return Err(RateTableError::UsageTiers(format!(
                        "tier {index} span must be positive"
                    )));
                }
                None if !is_last => {
                    return Err(RateTableError::UsageTiers(format!(
                        "tier {index} is open ended but is not the last tier"
                    )));
                }
                _ => {}
            }
            let percent = match tier.charge {
                TierCharge::PerTenThousand { percent } | TierCharge::Barrier { percent, .. } => {
                    percent
                }
            };
            if !(percent.is_finite() && percent >= 0.0) {
                return Err(RateTableError::UsageTiers(format!(
                    "tier {index} percent must be non-negative"
                )));
            }
        }

        if !(usage.multiplier_floor > 0.0 && usage.multiplier_floor <= 1.0) {
            return Err(RateTableError::UsageLimits(
                "multiplier floor must be within (0, 1]".to_string(),
            ));
        }
        if usage.bonus_percent_per_10k < 0.0 || usage.bonus_cap_percent < 0.0 {
            return Err(RateTableError::UsageLimits(
                "bonus settings must be non-negative".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&usage.tamper_deviation_cap) || usage.tamper_km_per_year < 0.0 {
            return Err(RateTableError::UsageLimits(
                "tamper settings are out of range".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_condition(&self) -> Result<(), RateTableError> {
        let rubric = &self.condition;
        let caps = &rubric.caps;
        if [
            caps.engine,
            caps.body,
            caps.mechanical,
            caps.comfort,
            caps.documentation,
        ]
        .iter()
        .any(|cap| *cap <= 0)
        {
            return Err(RateTableError::CategoryCaps);
        }

        let grades = &rubric.grade_thresholds;
        let descending = grades.excellent <= 100.0
            && grades.excellent > grades.very_good
            && grades.very_good > grades.good
            && grades.good > 0.0;
        if !descending {
            return Err(RateTableError::GradeThresholds);
        }

        let multipliers = &rubric.grade_multipliers;
        if [
            multipliers.excellent,
            multipliers.very_good,
            multipliers.good,
            multipliers.fair,
        ]
        .iter()
        .any(|value| !(value.is_finite() && *value > 0.0))
        {
            return Err(RateTableError::GradeMultipliers);
        }

        let bands = &rubric.tire_tread_bands;
        let ordered = bands
            .windows(2)
            .all(|pair| pair[0].min_percent > pair[1].min_percent);
        if !ordered || bands.iter().any(|band| band.min_percent > 100) {
            return Err(RateTableError::TreadBands);
        }
        Ok(())
    }

    fn validate_ownership(&self) -> Result<(), RateTableError> {
        if self.ownership_multipliers.is_empty() {
            return Err(RateTableError::EmptyOwnership);
        }
        for (index, value) in self.ownership_multipliers.iter().enumerate() {
            if !(value.is_finite() && *value > 0.0 && *value <= 2.0) {
                return Err(RateTableError::OwnershipMultiplier {
                    owner: index + 1,
                    value: *value,
                });
            }
        }
        Ok(())
    }

    fn validate_transaction(&self) -> Result<(), RateTableError> {
        let rates = &self.transaction;
        if !(0.0..1.0).contains(&rates.dealer_margin) {
            return Err(RateTableError::Transaction(
                "dealer margin must be within [0, 1)".to_string(),
            ));
        }
        if rates.wholesale_discount < 0.0 || rates.dealer_margin + rates.wholesale_discount >= 1.0
        {
            return Err(RateTableError::Transaction(
                "dealer margin plus wholesale discount must stay below 100%".to_string(),
            ));
        }
        if rates.tax_on_margin < 0.0 {
            return Err(RateTableError::Transaction(
                "tax on margin must be non-negative".to_string(),
            ));
        }
        if !(rates.procurement_floor > 0.0 && rates.procurement_floor <= rates.procurement_ceiling)
        {
            return Err(RateTableError::Transaction(
                "procurement floor must be positive and not exceed the ceiling".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_location(&self) -> Result<(), RateTableError> {
        let rules = &self.location;
        if rules.diesel_no_ban_premium <= 0.0 {
            return Err(RateTableError::LocationPremium {
                name: "diesel_no_ban_premium",
            });
        }
        if rules.high_demand_premium <= 0.0 {
            return Err(RateTableError::LocationPremium {
                name: "high_demand_premium",
            });
        }
        Ok(())
    }

    fn validate_sentiment(&self) -> Result<(), RateTableError> {
        let sentiment = &self.sentiment;
        for mapping in &sentiment.model_segments {
            if !sentiment.segments.contains_key(&mapping.segment) {
                return Err(RateTableError::UnknownSegment {
                    keyword: mapping.keyword.clone(),
                    segment: mapping.segment.clone(),
                });
            }
        }

        let positive = |value: f64| value.is_finite() && value > 0.0;
        for (name, segment) in &sentiment.segments {
            if !positive(segment.multiplier) {
                return Err(RateTableError::SentimentMultiplier {
                    name: format!("segment {name}"),
                });
            }
        }
        for (brand, multiplier) in &sentiment.brand_resale_index {
            if !positive(*multiplier) {
                return Err(RateTableError::SentimentMultiplier {
                    name: format!("brand {brand}"),
                });
            }
        }
        for (year, event) in &sentiment.economic_events {
            if !positive(1.0 + event.impact) {
                return Err(RateTableError::SentimentMultiplier {
                    name: format!("economic year {year}"),
                });
            }
        }
        for fuel in [
            FuelType::Petrol,
            FuelType::Diesel,
            FuelType::Cng,
            FuelType::Electric,
        ] {
            for (year, point) in sentiment.fuel_trends.for_fuel(fuel) {
                if !positive(point.multiplier) {
                    return Err(RateTableError::SentimentMultiplier {
                        name: format!("{} trend {year}", fuel.label()),
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_on_road(&self) -> Result<(), RateTableError> {
        let schedule = &self.on_road;
        if schedule.fixed_charges_by_year.is_empty() {
            return Err(RateTableError::EmptyFixedCharges);
        }

        let bands = &schedule.insurance_bands;
        let bounded_ascending = bands.windows(2).all(|pair| match (pair[0].below, pair[1].below) {
            (Some(lower), Some(upper)) => lower < upper,
            (Some(_), None) => true,
            (None, _) => false,
        });
        let ends_unbounded = bands.last().map(|band| band.below.is_none()).unwrap_or(false);
        if !bounded_ascending || !ends_unbounded {
            return Err(RateTableError::InsuranceBands);
        }

        if !(0.0..1.0).contains(&schedule.default_road_tax_rate) {
            return Err(RateTableError::RoadTax {
                year: "default".to_string(),
            });
        }
        for (year, rate) in &schedule.road_tax_by_year {
            if !(0.0..1.0).contains(rate) {
                return Err(RateTableError::RoadTax {
                    year: year.to_string(),
                });
            }
        }
        Ok(())
    }
}
