use super::cli::ServeArgs;
use super::infra::{build_engine, merge_overrides, AppState};
use super::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use obv_engine::config::AppConfig;
use obv_engine::error::AppError;
use obv_engine::telemetry;
use obv_engine::valuation::{CatalogPriceResolver, ValuationService};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    let valuation = merge_overrides(config.valuation.clone(), &args.engine);

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = Arc::new(build_engine(&valuation)?);
    let service = Arc::new(ValuationService::new(
        engine,
        Arc::new(CatalogPriceResolver::standard()),
        valuation.fallback_base_price,
    ));

    let app = with_operational_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        home_state = %valuation.home_state,
        market_sentiment = valuation.market_sentiment,
        "valuation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
