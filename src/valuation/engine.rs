use chrono::{Datelike, NaiveDate};
use tracing::{debug, debug_span, info, warn};

use super::adjustments::{location_adjustment, market_sentiment, ownership_adjustment};
use super::condition::score_condition;
use super::depreciation::depreciate;
use super::domain::{
    BasePrice, ConditionGrade, OnRoadBreakdown, PriceBasis, ValuationResult, VehicleInput,
};
use super::findings::{grouped, Findings};
use super::onroad::on_road_price;
use super::pricing::{BasePriceResolver, PriceQuery};
use super::rates::{RateTables, RateTableError};
use super::transaction::{procurement_range, transaction_prices};
use super::usage::adjust_for_usage;
use super::validation::{validate_price, validate_vehicle, InputViolation};
use super::{round_factor, round_money};

pub const DEFAULT_HOME_STATE: &str = "telangana";

/// One appraisal: the vehicle, the date it is valued on, and the estimate to
/// fall back to when no reference price can be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationRequest {
    pub vehicle: VehicleInput,
    pub today: NaiveDate,
    pub fallback: BasePrice,
}

#[derive(Debug, thiserror::Error)]
pub enum ValuationError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputViolation),
}

/// Stateless valuation pipeline over a validated set of rate tables.
#[derive(Debug, Clone)]
pub struct ValuationEngine {
    tables: RateTables,
    home_state: String,
}

impl ValuationEngine {
    pub fn new(tables: RateTables) -> Result<Self, RateTableError> {
        tables.validate()?;
        Ok(Self {
            tables,
            home_state: DEFAULT_HOME_STATE.to_string(),
        })
    }

    /// State used when an ex-showroom base price has to be converted to on-road.
    pub fn with_home_state(mut self, state: impl Into<String>) -> Self {
        self.home_state = state.into();
        self
    }

    pub fn tables(&self) -> &RateTables {
        &self.tables
    }

    pub fn home_state(&self) -> &str {
        &self.home_state
    }

    pub fn on_road_price(
        &self,
        ex_showroom: f64,
        year: i32,
        state: &str,
    ) -> Result<OnRoadBreakdown, ValuationError> {
        validate_price("ex-showroom price", ex_showroom)?;
        Ok(on_road_price(&self.tables.on_road, ex_showroom, year, state))
    }

    pub fn appraise(
        &self,
        request: &ValuationRequest,
        resolver: &dyn BasePriceResolver,
    ) -> Result<ValuationResult, ValuationError> {
        let vehicle = &request.vehicle;
        let span = debug_span!(
            "appraise",
            make = %vehicle.make,
            model = %vehicle.model,
            year = vehicle.year
        );
        let _entered = span.enter();

        validate_vehicle(vehicle, request.today, &request.fallback)?;

        let mut findings = Findings::new();
        let base = self.resolve_base_price(vehicle, &request.fallback, resolver, &mut findings);
        let (base_price, on_road_breakdown) = match base.basis {
            PriceBasis::OnRoad => (base.amount, None),
            PriceBasis::ExShowroom => {
                let breakdown = on_road_price(
                    &self.tables.on_road,
                    base.amount,
                    vehicle.year,
                    &self.home_state,
                );
                (breakdown.total_on_road, Some(breakdown))
            }
        };
        debug!(base_price, provenance = %base.provenance, "resolved base price");

        let age_years = age_in_years(vehicle.registration_date, request.today);

        let depreciation = depreciate(&self.tables.depreciation, age_years, base_price);

        let usage = adjust_for_usage(
            &self.tables.mileage,
            &self.tables.usage,
            age_years,
            vehicle.odometer,
            vehicle.fuel_type,
        );
        let usage_adjusted_value = depreciation.value * usage.multiplier;
        findings.absorb(usage.findings);

        let condition = score_condition(&self.tables.condition, &vehicle.inspection);
        let condition_adjusted_value = usage_adjusted_value * condition.multiplier;
        findings.absorb(condition.findings);

        let ownership = ownership_adjustment(&self.tables, vehicle.owners);
        findings.absorb(ownership.findings);

        let location = location_adjustment(
            &self.tables.location,
            &vehicle.model,
            vehicle.fuel_type,
            age_years,
        );
        findings.absorb(location.findings);

        let sentiment = market_sentiment(&self.tables.sentiment, vehicle, request.today.year());
        findings.absorb(sentiment.findings);

        let fair_market_value = condition_adjusted_value
            * ownership.multiplier
            * location.multiplier
            * sentiment.multiplier;
        let prices = transaction_prices(&self.tables.transaction, fair_market_value);
        let procurement = procurement_range(&self.tables.transaction, prices.c2b);

        match condition.grade {
            ConditionGrade::Excellent => {
                findings.recommend("EXCELLENT condition. Can be sold at premium pricing.")
            }
            ConditionGrade::Fair => {
                findings.recommend("FAIR condition. Reconditioning required before resale.")
            }
            ConditionGrade::VeryGood | ConditionGrade::Good => {}
        }

        info!(
            fair_market_value = round_money(fair_market_value),
            grade = condition.grade.label(),
            warnings = findings.warnings.len(),
            "valuation complete"
        );

        Ok(ValuationResult {
            fair_market_value: round_money(prices.c2c),
            retail_price: round_money(prices.b2c),
            trade_in_price: round_money(prices.c2b),
            wholesale_price: round_money(prices.b2b),

            base_price: round_money(base_price),
            base_price_source: base.provenance,
            on_road_breakdown,
            depreciated_value: round_money(depreciation.value),
            usage_adjusted_value: round_money(usage_adjusted_value),
            condition_adjusted_value: round_money(condition_adjusted_value),

            age_years: round_factor(age_years),
            depreciation_percentage: round_money(depreciation.percentage),
            usage_multiplier: round_factor(usage.multiplier),
            condition_score: round_money(condition.score),
            condition_multiplier: round_factor(condition.multiplier),
            ownership_multiplier: round_factor(ownership.multiplier),
            location_multiplier: round_factor(location.multiplier),
            market_sentiment_multiplier: round_factor(sentiment.multiplier),

            condition_grade: condition.grade,
            odometer_deviation: usage.deviation,
            expected_odometer: usage.expected_odometer,

            procurement_min: round_money(procurement.min),
            procurement_max: round_money(procurement.max),

            depreciation_breakdown: depreciation.breakdown.map_amounts(round_money),
            condition_breakdown: condition.breakdown,
            condition_categories: condition.categories,
            sentiment_factors: sentiment
                .factors
                .into_iter()
                .map(|mut factor| {
                    factor.multiplier = round_factor(factor.multiplier);
                    factor
                })
                .collect(),
            warnings: findings.warnings,
            recommendations: findings.recommendations,
        })
    }

    fn resolve_base_price(
        &self,
        vehicle: &VehicleInput,
        fallback: &BasePrice,
        resolver: &dyn BasePriceResolver,
        findings: &mut Findings,
    ) -> BasePrice {
        let fallback_note = format!(
            "using estimated base price (Rs {})",
            grouped(fallback.amount.round() as i64)
        );

        match resolver.resolve(&PriceQuery::for_vehicle(vehicle)) {
            Ok(Some(price)) if price.is_usable() => price,
            Ok(Some(price)) => {
                warn!(
                    amount = price.amount,
                    provenance = %price.provenance,
                    "discarding unusable base price"
                );
                findings.warn(format!(
                    "Reference price from {} was not usable; {fallback_note}.",
                    price.provenance
                ));
                fallback.clone()
            }
            Ok(None) => {
                findings.warn(format!(
                    "No reference price found for {} {}; {fallback_note}.",
                    vehicle.make, vehicle.model
                ));
                fallback.clone()
            }
            Err(error) => {
                warn!(%error, "base price resolver failed");
                findings.warn(format!("Price lookup failed ({error}); {fallback_note}."));
                fallback.clone()
            }
        }
    }
}

/// Fractional years between registration and the valuation date.
pub fn age_in_years(registration: NaiveDate, today: NaiveDate) -> f64 {
    let days = (today - registration).num_days().max(0);
    days as f64 / 365.25
}
