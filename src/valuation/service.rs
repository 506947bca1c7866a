use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{BasePrice, OnRoadBreakdown, ValuationResult, VehicleInput};
use super::engine::{ValuationEngine, ValuationError, ValuationRequest};
use super::pricing::{BasePriceResolver, FixedPriceResolver};

/// Inbound valuation payload for the HTTP surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationSubmission {
    pub vehicle: VehicleInput,
    /// Valuation date; defaults to the current UTC date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
    /// Known reference price. Skips the configured resolver when present.
    #[serde(default)]
    pub base_price: Option<BasePrice>,
    /// On-road estimate used when no reference price resolves.
    #[serde(default)]
    pub fallback_base_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnRoadRequest {
    pub ex_showroom: f64,
    pub year: i32,
    #[serde(default)]
    pub state: Option<String>,
}

/// Service pairing a shared engine with the configured price resolver.
pub struct ValuationService<R> {
    engine: Arc<ValuationEngine>,
    resolver: Arc<R>,
    fallback_base_price: f64,
}

impl<R> ValuationService<R>
where
    R: BasePriceResolver + 'static,
{
    pub fn new(engine: Arc<ValuationEngine>, resolver: Arc<R>, fallback_base_price: f64) -> Self {
        Self {
            engine,
            resolver,
            fallback_base_price,
        }
    }

    pub fn engine(&self) -> &ValuationEngine {
        &self.engine
    }

    pub fn appraise(
        &self,
        submission: ValuationSubmission,
    ) -> Result<ValuationResult, ValuationError> {
        let fallback = BasePrice::on_road(
            submission
                .fallback_base_price
                .unwrap_or(self.fallback_base_price),
            "fallback_estimate",
        );
        let request = ValuationRequest {
            vehicle: submission.vehicle,
            today: submission
                .today
                .unwrap_or_else(|| Utc::now().date_naive()),
            fallback,
        };

        match submission.base_price {
            Some(price) => self
                .engine
                .appraise(&request, &FixedPriceResolver::new(price)),
            None => self.engine.appraise(&request, self.resolver.as_ref()),
        }
    }

    pub fn on_road(&self, request: OnRoadRequest) -> Result<OnRoadBreakdown, ValuationError> {
        let state = request
            .state
            .as_deref()
            .unwrap_or_else(|| self.engine.home_state());
        self.engine
            .on_road_price(request.ex_showroom, request.year, state)
    }
}
