//! Base-price resolution seam.
//!
//! The engine never looks prices up itself. It asks a `BasePriceResolver` and
//! falls back to the caller's estimate when the resolver fails or has nothing.

use serde::{Deserialize, Serialize};

use super::domain::{BasePrice, FuelType, VehicleInput};

/// What a resolver is asked to price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuery {
    pub make: String,
    pub model: String,
    pub variant: String,
    pub year: i32,
    pub fuel_type: FuelType,
    pub region: String,
}

impl PriceQuery {
    pub fn for_vehicle(vehicle: &VehicleInput) -> Self {
        Self {
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            variant: vehicle.variant.clone(),
            year: vehicle.year,
            fuel_type: vehicle.fuel_type,
            region: vehicle.location.clone(),
        }
    }
}

/// Source of new-vehicle reference prices (catalog, scraper, pricing API...).
pub trait BasePriceResolver: Send + Sync {
    fn resolve(&self, query: &PriceQuery) -> Result<Option<BasePrice>, ResolverError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    #[error("price source unavailable: {0}")]
    Unavailable(String),
}

/// Always answers with the price it was built with.
#[derive(Debug, Clone)]
pub struct FixedPriceResolver {
    price: BasePrice,
}

impl FixedPriceResolver {
    pub fn new(price: BasePrice) -> Self {
        Self { price }
    }
}

impl BasePriceResolver for FixedPriceResolver {
    fn resolve(&self, _query: &PriceQuery) -> Result<Option<BasePrice>, ResolverError> {
        Ok(Some(self.price.clone()))
    }
}

/// Resolver that never has a price, forcing the fallback estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPriceResolver;

impl BasePriceResolver for NoPriceResolver {
    fn resolve(&self, _query: &PriceQuery) -> Result<Option<BasePrice>, ResolverError> {
        Ok(None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Matched against the lower-cased model name.
    pub keyword: String,
    pub ex_showroom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscontinuedModel {
    pub make_aliases: Vec<String>,
    pub model: String,
    pub last_ex_showroom: f64,
    pub last_year: i32,
}

/// Static ex-showroom catalog.
///
/// Models still in production are priced at today's ex-showroom figure.
/// Discontinued models start from their last known price and are deflated back
/// to the purchase year at `annual_inflation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPriceResolver {
    pub current: Vec<CatalogEntry>,
    pub discontinued: Vec<DiscontinuedModel>,
    pub annual_inflation: f64,
}

impl CatalogPriceResolver {
    pub fn standard() -> Self {
        let current = [
            ("alto", 450_000.0),
            ("kwid", 450_000.0),
            ("wagon r", 550_000.0),
            ("wagonr", 550_000.0),
            ("santro", 500_000.0),
            ("swift", 650_000.0),
            ("baleno", 750_000.0),
            ("grand i10", 600_000.0),
            ("i20", 750_000.0),
            ("polo", 750_000.0),
            ("jazz", 800_000.0),
            ("city", 1_200_000.0),
            ("verna", 1_200_000.0),
            ("ciaz", 1_000_000.0),
            ("creta", 1_500_000.0),
            ("seltos", 1_600_000.0),
            ("venue", 1_200_000.0),
            ("brezza", 1_100_000.0),
            ("compass", 2_500_000.0),
            ("harrier", 2_000_000.0),
            ("fortuner", 3_500_000.0),
            ("innova", 2_500_000.0),
            ("crysta", 2_500_000.0),
            ("ertiga", 1_000_000.0),
            ("xuv", 1_800_000.0),
            ("thar", 1_500_000.0),
            ("nexon", 900_000.0),
            ("punch", 700_000.0),
            ("altroz", 700_000.0),
            ("safari", 1_800_000.0),
            ("scorpio", 1_600_000.0),
            ("elantra", 2_000_000.0),
            ("tucson", 3_000_000.0),
            ("kona", 2_500_000.0),
            ("alcazar", 1_800_000.0),
            ("sonet", 900_000.0),
            ("carens", 1_200_000.0),
            ("carnival", 3_500_000.0),
            ("glanza", 700_000.0),
            ("urban cruiser", 1_100_000.0),
            ("hyryder", 1_200_000.0),
            ("fronx", 800_000.0),
            ("jimny", 1_300_000.0),
            ("ignis", 600_000.0),
            ("dzire", 700_000.0),
            ("s-presso", 450_000.0),
            ("eeco", 500_000.0),
        ]
        .iter()
        .map(|(keyword, price)| CatalogEntry {
            keyword: keyword.to_string(),
            ex_showroom: *price,
        })
        .collect();

        let discontinued = vec![
            discontinued(&["volkswagen", "vw"], "beetle", 3_000_000.0, 2019),
            discontinued(&["ford"], "ecosport", 1_100_000.0, 2021),
            discontinued(&["chevrolet"], "beat", 500_000.0, 2017),
            discontinued(&["fiat"], "punto", 700_000.0, 2019),
            discontinued(&["nissan"], "micra", 650_000.0, 2020),
        ];

        Self {
            current,
            discontinued,
            annual_inflation: 0.06,
        }
    }

    fn discontinued_price(&self, make: &str, model: &str, year: i32) -> Option<BasePrice> {
        let entry = self.discontinued.iter().find(|entry| {
            entry.make_aliases.iter().any(|alias| make.contains(alias.as_str()))
                && model.contains(entry.model.as_str())
        })?;

        let years_back = (entry.last_year - year).max(0);
        let amount = entry.last_ex_showroom / (1.0 + self.annual_inflation).powi(years_back);
        Some(BasePrice::ex_showroom(amount, "catalog_discontinued"))
    }
}

fn discontinued(aliases: &[&str], model: &str, price: f64, last_year: i32) -> DiscontinuedModel {
    DiscontinuedModel {
        make_aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
        model: model.to_string(),
        last_ex_showroom: price,
        last_year,
    }
}

impl Default for CatalogPriceResolver {
    fn default() -> Self {
        Self::standard()
    }
}

impl BasePriceResolver for CatalogPriceResolver {
    fn resolve(&self, query: &PriceQuery) -> Result<Option<BasePrice>, ResolverError> {
        let make = query.make.trim().to_lowercase();
        let model = query.model.trim().to_lowercase();

        if let Some(price) = self.discontinued_price(&make, &model, query.year) {
            return Ok(Some(price));
        }

        Ok(self
            .current
            .iter()
            .find(|entry| model.contains(entry.keyword.as_str()))
            .map(|entry| BasePrice::ex_showroom(entry.ex_showroom, "catalog_current")))
    }
}
