//! Used-vehicle valuation: segmented depreciation, odometer usage, 16-point
//! condition scoring, ownership/location/sentiment multipliers and the four
//! transaction-context prices.

pub mod adjustments;
pub mod batch;
pub mod breakdown;
pub mod condition;
pub mod depreciation;
pub mod domain;
pub mod engine;
pub mod findings;
pub mod onroad;
pub mod pricing;
pub mod rates;
pub mod router;
pub mod service;
pub mod transaction;
pub mod usage;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use batch::{
    run_batch, BatchImportError, BatchReport, BatchRow, BatchSummaryRow, VehicleImport,
};
pub use breakdown::Breakdown;
pub use domain::{
    BasePrice, ConditionGrade, DentLevel, EngineNoise, EngineSmoke, FuelType, GearboxCondition,
    InspectionReport, OnRoadBreakdown, PartCondition, PriceBasis, ProcurementRange,
    SentimentFactor, TransactionPrices, Transmission, ValuationResult, VehicleInput,
};
pub use engine::{age_in_years, ValuationEngine, ValuationError, ValuationRequest};
pub use findings::Findings;
pub use pricing::{
    BasePriceResolver, CatalogPriceResolver, FixedPriceResolver, NoPriceResolver, PriceQuery,
    ResolverError,
};
pub use rates::{RateTableError, RateTables};
pub use router::valuation_router;
pub use service::{OnRoadRequest, ValuationService, ValuationSubmission};
pub use validation::InputViolation;

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

/// Rounds a monetary amount to paise.
pub(crate) fn round_money(value: f64) -> f64 {
    round_to(value, 2)
}

pub(crate) fn round_factor(value: f64) -> f64 {
    round_to(value, 4)
}
