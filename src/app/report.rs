use super::cli::EngineArgs;
use super::infra::{build_engine, merge_overrides, parse_date};
use chrono::{Local, NaiveDate};
use clap::Args;
use obv_engine::config::{AppConfig, ValuationConfig};
use obv_engine::error::AppError;
use obv_engine::valuation::findings::grouped;
use obv_engine::valuation::{
    run_batch, BasePrice, BasePriceResolver, CatalogPriceResolver, FixedPriceResolver,
    OnRoadBreakdown, ValuationRequest, ValuationResult, VehicleInput,
};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AppraiseArgs {
    /// JSON file describing the vehicle and its inspection
    #[arg(long)]
    pub(crate) vehicle: PathBuf,
    /// Known reference price; skips the built-in catalog
    #[arg(long)]
    pub(crate) base_price: Option<f64>,
    /// Treat --base-price as ex-showroom and convert it to on-road
    #[arg(long, requires = "base_price")]
    pub(crate) ex_showroom: bool,
    /// On-road estimate used when no reference price is found
    #[arg(long)]
    pub(crate) fallback_base_price: Option<f64>,
    /// Valuation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the raw JSON result instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) engine: EngineArgs,
}

#[derive(Args, Debug)]
pub(crate) struct OnRoadArgs {
    /// Ex-showroom price in rupees
    #[arg(long)]
    pub(crate) ex_showroom: f64,
    /// Purchase year
    #[arg(long)]
    pub(crate) year: i32,
    /// Registration state (defaults to the configured home state)
    #[arg(long)]
    pub(crate) state: Option<String>,
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) engine: EngineArgs,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export with one vehicle per row
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Summary CSV destination (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    #[arg(long)]
    pub(crate) fallback_base_price: Option<f64>,
    /// Valuation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    #[command(flatten)]
    pub(crate) engine: EngineArgs,
}

#[derive(Args, Debug)]
pub(crate) struct RatesArgs {
    #[command(flatten)]
    pub(crate) engine: EngineArgs,
}

fn valuation_config(args: &EngineArgs) -> Result<ValuationConfig, AppError> {
    let config = AppConfig::load()?;
    Ok(merge_overrides(config.valuation, args))
}

pub(crate) fn run_appraise(args: AppraiseArgs) -> Result<(), AppError> {
    let config = valuation_config(&args.engine)?;
    let engine = build_engine(&config)?;

    let vehicle: VehicleInput =
        serde_json::from_reader(BufReader::new(File::open(&args.vehicle)?))?;
    let request = ValuationRequest {
        vehicle,
        today: args.today.unwrap_or_else(|| Local::now().date_naive()),
        fallback: BasePrice::on_road(
            args.fallback_base_price.unwrap_or(config.fallback_base_price),
            "fallback_estimate",
        ),
    };

    let result = match args.base_price {
        Some(amount) => {
            let price = if args.ex_showroom {
                BasePrice::ex_showroom(amount, "command_line")
            } else {
                BasePrice::on_road(amount, "command_line")
            };
            engine.appraise(&request, &FixedPriceResolver::new(price))?
        }
        None => engine.appraise(&request, &CatalogPriceResolver::standard())?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_valuation(&request, &result));
    }
    Ok(())
}

pub(crate) fn run_on_road(args: OnRoadArgs) -> Result<(), AppError> {
    let config = valuation_config(&args.engine)?;
    let engine = build_engine(&config)?;
    let state = args.state.as_deref().unwrap_or_else(|| engine.home_state());
    let breakdown = engine.on_road_price(args.ex_showroom, args.year, state)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        print!("{}", render_on_road(args.year, state, &breakdown));
    }
    Ok(())
}

pub(crate) fn run_batch_report(args: BatchArgs) -> Result<(), AppError> {
    let config = valuation_config(&args.engine)?;
    let engine = build_engine(&config)?;
    let resolver: &dyn BasePriceResolver = &CatalogPriceResolver::standard();
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let fallback = args
        .fallback_base_price
        .unwrap_or(config.fallback_base_price);
    let input = BufReader::new(File::open(&args.input)?);

    let report = match &args.output {
        Some(path) => run_batch(
            &engine,
            resolver,
            today,
            fallback,
            input,
            BufWriter::new(File::create(path)?),
        )?,
        None => run_batch(&engine, resolver, today, fallback, input, std::io::stdout().lock())?,
    };

    eprintln!(
        "Valued {} vehicles ({} rows skipped)",
        report.valued, report.rejected
    );
    Ok(())
}

pub(crate) fn run_rates(args: RatesArgs) -> Result<(), AppError> {
    let config = valuation_config(&args.engine)?;
    let engine = build_engine(&config)?;
    println!("{}", serde_json::to_string_pretty(engine.tables())?);
    Ok(())
}

fn rupees(amount: f64) -> String {
    format!("Rs {}", grouped(amount.round() as i64))
}

pub(crate) fn render_valuation(request: &ValuationRequest, result: &ValuationResult) -> String {
    let vehicle = &request.vehicle;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Valuation: {} {} {} ({}, {})",
        vehicle.year,
        vehicle.make,
        vehicle.model,
        vehicle.fuel_type.label(),
        vehicle.location
    );
    let _ = writeln!(
        out,
        "Valued {} | age {:.2} years | {} km | {} owner(s)",
        request.today, result.age_years, vehicle.odometer, vehicle.owners
    );

    let _ = writeln!(out, "\nTransaction prices");
    let _ = writeln!(
        out,
        "- Fair market value (C2C): {}",
        rupees(result.fair_market_value)
    );
    let _ = writeln!(
        out,
        "- Dealer retail (B2C):     {}",
        rupees(result.retail_price)
    );
    let _ = writeln!(
        out,
        "- Trade-in (C2B):          {}",
        rupees(result.trade_in_price)
    );
    let _ = writeln!(
        out,
        "- Wholesale (B2B):         {}",
        rupees(result.wholesale_price)
    );
    let _ = writeln!(
        out,
        "- Procurement window:      {} to {}",
        rupees(result.procurement_min),
        rupees(result.procurement_max)
    );

    let _ = writeln!(out, "\nBuild-up");
    let _ = writeln!(
        out,
        "- Base price: {} ({})",
        rupees(result.base_price),
        result.base_price_source
    );
    if let Some(breakdown) = &result.on_road_breakdown {
        let _ = writeln!(
            out,
            "  from ex-showroom {} with road tax {:.1}%",
            rupees(breakdown.ex_showroom),
            breakdown.road_tax_rate * 100.0
        );
    }
    let _ = writeln!(
        out,
        "- Depreciated: {} (-{:.2}%)",
        rupees(result.depreciated_value),
        result.depreciation_percentage
    );
    let _ = writeln!(
        out,
        "- Usage x{:.4}: expected {} km, deviation {} km",
        result.usage_multiplier, result.expected_odometer, result.odometer_deviation
    );
    let _ = writeln!(
        out,
        "- Condition x{:.4}: score {:.0}/100 ({})",
        result.condition_multiplier,
        result.condition_score,
        result.condition_grade.label()
    );
    let _ = writeln!(out, "- Ownership x{:.4}", result.ownership_multiplier);
    let _ = writeln!(out, "- Location x{:.4}", result.location_multiplier);
    if !result.sentiment_factors.is_empty() {
        let _ = writeln!(
            out,
            "- Market sentiment x{:.4}",
            result.market_sentiment_multiplier
        );
        for factor in &result.sentiment_factors {
            let _ = writeln!(
                out,
                "  - {} x{:.4}: {}",
                factor.factor, factor.multiplier, factor.reason
            );
        }
    }

    let _ = writeln!(out, "\nDepreciation schedule");
    for (label, amount) in result.depreciation_breakdown.iter() {
        let _ = writeln!(out, "- {label}: {}", rupees(amount));
    }

    let _ = writeln!(out, "\nCondition categories");
    for (label, points) in result.condition_categories.iter() {
        let _ = writeln!(out, "- {label}: {points:.0}");
    }

    if result.warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings: none");
    } else {
        let _ = writeln!(out, "\nWarnings");
        for warning in &result.warnings {
            let _ = writeln!(out, "- {warning}");
        }
    }

    if !result.recommendations.is_empty() {
        let _ = writeln!(out, "\nRecommendations");
        for recommendation in &result.recommendations {
            let _ = writeln!(out, "- {recommendation}");
        }
    }

    out
}

pub(crate) fn render_on_road(year: i32, state: &str, breakdown: &OnRoadBreakdown) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "On-road price for {year} ({state})");
    let _ = writeln!(out, "- Ex-showroom:   {}", rupees(breakdown.ex_showroom));
    let _ = writeln!(
        out,
        "- Road tax:      {} ({:.1}%)",
        rupees(breakdown.road_tax),
        breakdown.road_tax_rate * 100.0
    );
    let _ = writeln!(out, "- Registration:  {}", rupees(breakdown.registration));
    let _ = writeln!(out, "- Smart card:    {}", rupees(breakdown.smart_card));
    let _ = writeln!(out, "- Cess:          {}", rupees(breakdown.cess));
    let _ = writeln!(out, "- Other charges: {}", rupees(breakdown.other_charges));
    let _ = writeln!(out, "- Insurance:     {}", rupees(breakdown.insurance));
    let _ = writeln!(out, "Total on-road:   {}", rupees(breakdown.total_on_road));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rupees_group_thousands() {
        assert_eq!(rupees(708_760.0), "Rs 708,760");
        assert_eq!(rupees(999.4), "Rs 999");
        assert_eq!(rupees(-1_500.0), "Rs -1,500");
    }

    #[test]
    fn on_road_report_lists_every_charge() {
        let engine = build_engine(&ValuationConfig::default()).expect("engine builds");
        let breakdown = engine
            .on_road_price(600_000.0, 2018, "telangana")
            .expect("valid price");
        let text = render_on_road(2018, "telangana", &breakdown);
        assert!(text.contains("Road tax:      Rs 84,000 (14.0%)"));
        assert!(text.ends_with("Total on-road:   Rs 708,760\n"));
    }
}
