use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::breakdown::Breakdown;

/// Fuel type drives the expected annual mileage and the market trend tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FuelType {
    Petrol,
    Diesel,
    #[serde(rename = "CNG", alias = "Cng")]
    Cng,
    Electric,
}

impl FuelType {
    pub const fn label(self) -> &'static str {
        match self {
            FuelType::Petrol => "Petrol",
            FuelType::Diesel => "Diesel",
            FuelType::Cng => "CNG",
            FuelType::Electric => "Electric",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transmission {
    Manual,
    Automatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DentLevel {
    None,
    Minor,
    Moderate,
    Severe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineSmoke {
    None,
    White,
    Black,
}

impl EngineSmoke {
    pub const fn label(self) -> &'static str {
        match self {
            EngineSmoke::None => "None",
            EngineSmoke::White => "White",
            EngineSmoke::Black => "Black",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineNoise {
    Normal,
    Slight,
    Heavy,
}

/// Gearbox feel reported by the inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GearboxCondition {
    Smooth,
    Rough,
    Slipping,
}

/// Four-step scale shared by suspension, brakes and interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartCondition {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// The 16-point inspection captured for every appraisal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionReport {
    pub frame_damage: bool,
    pub dents_scratches: DentLevel,
    pub repainted: bool,
    pub engine_smoke: EngineSmoke,
    /// Remaining tread, in percent.
    pub tire_tread: u8,
    pub ac_working: bool,
    pub electrical_issues: bool,
    pub service_history: bool,
    pub insurance_valid: bool,
    pub accident_history: bool,
    pub engine_noise: EngineNoise,
    pub transmission_condition: GearboxCondition,
    pub suspension_condition: PartCondition,
    pub brake_condition: PartCondition,
    pub interior_condition: PartCondition,
    pub rust_present: bool,
}

fn default_location() -> String {
    "Hyderabad".to_string()
}

/// Vehicle facts submitted for a valuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleInput {
    pub make: String,
    pub model: String,
    pub variant: String,
    /// Purchase / model year.
    pub year: i32,
    pub registration_date: NaiveDate,
    pub fuel_type: FuelType,
    pub odometer: u64,
    pub owners: u32,
    pub transmission: Transmission,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(flatten)]
    pub inspection: InspectionReport,
}

/// Discrete condition bucket derived from the inspection score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionGrade {
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    Good,
    Fair,
}

impl ConditionGrade {
    pub const fn label(self) -> &'static str {
        match self {
            ConditionGrade::Excellent => "Excellent",
            ConditionGrade::VeryGood => "Very Good",
            ConditionGrade::Good => "Good",
            ConditionGrade::Fair => "Fair",
        }
    }
}

/// Whether a resolved price already includes taxes, registration and insurance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBasis {
    OnRoad,
    ExShowroom,
}

/// A reference price together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasePrice {
    pub amount: f64,
    pub basis: PriceBasis,
    #[serde(default = "default_provenance")]
    pub provenance: String,
}

fn default_provenance() -> String {
    "caller_supplied".to_string()
}

impl BasePrice {
    pub fn on_road(amount: f64, provenance: impl Into<String>) -> Self {
        Self {
            amount,
            basis: PriceBasis::OnRoad,
            provenance: provenance.into(),
        }
    }

    pub fn ex_showroom(amount: f64, provenance: impl Into<String>) -> Self {
        Self {
            amount,
            basis: PriceBasis::ExShowroom,
            provenance: provenance.into(),
        }
    }

    pub(crate) fn is_usable(&self) -> bool {
        self.amount.is_finite() && self.amount > 0.0
    }
}

/// The four transaction-context prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransactionPrices {
    /// Peer-to-peer fair market value.
    pub c2c: f64,
    /// Dealer retail price including tax on the margin.
    pub b2c: f64,
    /// Trade-in / procurement price.
    pub c2b: f64,
    /// Dealer-to-dealer wholesale price.
    pub b2b: f64,
}

/// Negotiation window for buying the vehicle from its owner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcurementRange {
    pub min: f64,
    pub max: f64,
}

/// One market-sentiment factor and the reason it was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentFactor {
    pub factor: String,
    pub multiplier: f64,
    pub reason: String,
}

/// Line items making up an on-road price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnRoadBreakdown {
    pub ex_showroom: f64,
    pub road_tax: f64,
    pub road_tax_rate: f64,
    pub registration: f64,
    pub smart_card: f64,
    pub cess: f64,
    pub other_charges: f64,
    pub insurance: f64,
    pub total_on_road: f64,
}

/// Complete appraisal output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub fair_market_value: f64,
    pub retail_price: f64,
    pub trade_in_price: f64,
    pub wholesale_price: f64,

    pub base_price: f64,
    pub base_price_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_road_breakdown: Option<OnRoadBreakdown>,
    pub depreciated_value: f64,
    pub usage_adjusted_value: f64,
    pub condition_adjusted_value: f64,

    pub age_years: f64,
    pub depreciation_percentage: f64,
    pub usage_multiplier: f64,
    pub condition_score: f64,
    pub condition_multiplier: f64,
    pub ownership_multiplier: f64,
    pub location_multiplier: f64,
    pub market_sentiment_multiplier: f64,

    pub condition_grade: ConditionGrade,
    pub odometer_deviation: i64,
    pub expected_odometer: u64,

    pub procurement_min: f64,
    pub procurement_max: f64,

    pub depreciation_breakdown: Breakdown,
    pub condition_breakdown: Breakdown,
    pub condition_categories: Breakdown,
    #[serde(default)]
    pub sentiment_factors: Vec<SentimentFactor>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}
