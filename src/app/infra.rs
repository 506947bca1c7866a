use super::cli::EngineArgs;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use obv_engine::config::ValuationConfig;
use obv_engine::error::AppError;
use obv_engine::valuation::{RateTables, ValuationEngine};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Folds command-line overrides over the environment configuration.
pub(crate) fn merge_overrides(mut config: ValuationConfig, args: &EngineArgs) -> ValuationConfig {
    if let Some(path) = &args.rates {
        config.rates_path = Some(path.clone());
    }
    if args.market_sentiment {
        config.market_sentiment = true;
    }
    if let Some(state) = &args.home_state {
        config.home_state = state.trim().to_ascii_lowercase();
    }
    config
}

pub(crate) fn load_tables(config: &ValuationConfig) -> Result<RateTables, AppError> {
    let tables = match &config.rates_path {
        Some(path) => {
            info!(path = %path.display(), "loading rate tables");
            RateTables::from_path(path)?
        }
        None => RateTables::standard(),
    };
    Ok(tables.with_market_sentiment(config.market_sentiment))
}

pub(crate) fn build_engine(config: &ValuationConfig) -> Result<ValuationEngine, AppError> {
    let engine = ValuationEngine::new(load_tables(config)?)?;
    Ok(engine.with_home_state(config.home_state.clone()))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
