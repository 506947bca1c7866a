use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::valuation::domain::{
    BasePrice, DentLevel, EngineNoise, EngineSmoke, FuelType, GearboxCondition, InspectionReport,
    PartCondition, Transmission, VehicleInput,
};
use crate::valuation::engine::{ValuationEngine, ValuationRequest};
use crate::valuation::pricing::{BasePriceResolver, PriceQuery, ResolverError};
use crate::valuation::rates::RateTables;
use crate::valuation::service::ValuationService;

pub(super) const TOLERANCE: f64 = 0.01;

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn today() -> NaiveDate {
    date(2024, 3, 15)
}

pub(super) fn engine() -> ValuationEngine {
    ValuationEngine::new(RateTables::standard()).expect("standard tables validate")
}

pub(super) fn sentiment_engine() -> ValuationEngine {
    ValuationEngine::new(RateTables::standard().with_market_sentiment(true))
        .expect("standard tables validate")
}

/// Every field at its best value; scores 100.
pub(super) fn pristine_inspection() -> InspectionReport {
    InspectionReport {
        frame_damage: false,
        dents_scratches: DentLevel::None,
        repainted: false,
        engine_smoke: EngineSmoke::None,
        tire_tread: 100,
        ac_working: true,
        electrical_issues: false,
        service_history: true,
        insurance_valid: true,
        accident_history: false,
        engine_noise: EngineNoise::Normal,
        transmission_condition: GearboxCondition::Smooth,
        suspension_condition: PartCondition::Excellent,
        brake_condition: PartCondition::Excellent,
        interior_condition: PartCondition::Excellent,
        rust_present: false,
    }
}

/// Serviceable but used; scores 65 with no findings.
pub(super) fn good_inspection() -> InspectionReport {
    InspectionReport {
        frame_damage: false,
        dents_scratches: DentLevel::Moderate,
        repainted: true,
        engine_smoke: EngineSmoke::None,
        tire_tread: 55,
        ac_working: true,
        electrical_issues: false,
        service_history: false,
        insurance_valid: true,
        accident_history: false,
        engine_noise: EngineNoise::Slight,
        transmission_condition: GearboxCondition::Rough,
        suspension_condition: PartCondition::Good,
        brake_condition: PartCondition::Good,
        interior_condition: PartCondition::Good,
        rust_present: false,
    }
}

/// Three years and one day old petrol hatchback with 45,000 km.
pub(super) fn hatchback() -> VehicleInput {
    VehicleInput {
        make: "Maruti Suzuki".to_string(),
        model: "Swift".to_string(),
        variant: "VXi".to_string(),
        year: 2021,
        registration_date: date(2021, 3, 15),
        fuel_type: FuelType::Petrol,
        odometer: 45_000,
        owners: 1,
        transmission: Transmission::Manual,
        location: "Hyderabad".to_string(),
        inspection: good_inspection(),
    }
}

pub(super) fn request(vehicle: VehicleInput) -> ValuationRequest {
    ValuationRequest {
        vehicle,
        today: today(),
        fallback: BasePrice::on_road(800_000.0, "fallback_estimate"),
    }
}

pub(super) fn on_road(amount: f64) -> BasePrice {
    BasePrice::on_road(amount, "test_fixture")
}

/// Resolver whose backing source is down.
pub(super) struct FailingResolver;

impl BasePriceResolver for FailingResolver {
    fn resolve(&self, _query: &PriceQuery) -> Result<Option<BasePrice>, ResolverError> {
        Err(ResolverError::Unavailable("pricing api timed out".to_string()))
    }
}

/// Resolver that hands back a fixed price and counts how often it was asked.
#[derive(Default)]
pub(super) struct CountingResolver {
    pub price: Option<BasePrice>,
    pub calls: AtomicUsize,
}

impl CountingResolver {
    pub fn with_price(price: BasePrice) -> Self {
        Self {
            price: Some(price),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BasePriceResolver for CountingResolver {
    fn resolve(&self, _query: &PriceQuery) -> Result<Option<BasePrice>, ResolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.price.clone())
    }
}

pub(super) fn service_with(resolver: CountingResolver) -> Arc<ValuationService<CountingResolver>> {
    Arc::new(ValuationService::new(
        Arc::new(engine()),
        Arc::new(resolver),
        800_000.0,
    ))
}

pub(super) async fn response_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}
