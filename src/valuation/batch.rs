use std::io::{Read, Write};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::domain::{
    BasePrice, DentLevel, EngineNoise, EngineSmoke, FuelType, GearboxCondition, InspectionReport,
    PartCondition, Transmission, ValuationResult, VehicleInput,
};
use super::engine::{ValuationEngine, ValuationRequest};
use super::pricing::{BasePriceResolver, FixedPriceResolver};

#[derive(Debug, thiserror::Error)]
pub enum BatchImportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// One imported vehicle and its optional known on-road price.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub vehicle: VehicleInput,
    pub base_price: Option<f64>,
}

/// Rows parsed from a CSV export plus the count of rows whose fields could
/// not be read (negative odometer, unknown fuel type and the like).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleImport {
    pub rows: Vec<BatchRow>,
    pub rejected: usize,
}

/// Reads one vehicle per CSV record.
///
/// A record whose values fail to deserialize is logged and counted. Ragged
/// records and IO failures abort the import.
pub fn read_vehicles<R: Read>(reader: R) -> Result<VehicleImport, BatchImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut import = VehicleImport::default();

    for (index, record) in csv_reader.deserialize::<CsvVehicleRow>().enumerate() {
        match record {
            Ok(row) => import.rows.push(row.into_batch_row()),
            Err(error) if matches!(error.kind(), csv::ErrorKind::Deserialize { .. }) => {
                warn!(row = index + 1, %error, "skipping unreadable batch row");
                import.rejected += 1;
            }
            Err(error) => return Err(error.into()),
        }
    }

    Ok(import)
}

#[derive(Debug, Deserialize)]
struct CsvVehicleRow {
    make: String,
    model: String,
    #[serde(default)]
    variant: String,
    year: i32,
    registration_date: NaiveDate,
    fuel_type: FuelType,
    odometer: u64,
    owners: u32,
    transmission: Transmission,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
    #[serde(default)]
    base_price: Option<f64>,
    frame_damage: bool,
    dents_scratches: DentLevel,
    repainted: bool,
    engine_smoke: EngineSmoke,
    tire_tread: u8,
    ac_working: bool,
    electrical_issues: bool,
    service_history: bool,
    insurance_valid: bool,
    accident_history: bool,
    engine_noise: EngineNoise,
    transmission_condition: GearboxCondition,
    suspension_condition: PartCondition,
    brake_condition: PartCondition,
    interior_condition: PartCondition,
    rust_present: bool,
}

impl CsvVehicleRow {
    fn into_batch_row(self) -> BatchRow {
        let inspection = InspectionReport {
            frame_damage: self.frame_damage,
            dents_scratches: self.dents_scratches,
            repainted: self.repainted,
            engine_smoke: self.engine_smoke,
            tire_tread: self.tire_tread,
            ac_working: self.ac_working,
            electrical_issues: self.electrical_issues,
            service_history: self.service_history,
            insurance_valid: self.insurance_valid,
            accident_history: self.accident_history,
            engine_noise: self.engine_noise,
            transmission_condition: self.transmission_condition,
            suspension_condition: self.suspension_condition,
            brake_condition: self.brake_condition,
            interior_condition: self.interior_condition,
            rust_present: self.rust_present,
        };

        BatchRow {
            vehicle: VehicleInput {
                make: self.make,
                model: self.model,
                variant: self.variant,
                year: self.year,
                registration_date: self.registration_date,
                fuel_type: self.fuel_type,
                odometer: self.odometer,
                owners: self.owners,
                transmission: self.transmission,
                location: self.location.unwrap_or_else(|| "Hyderabad".to_string()),
                inspection,
            },
            base_price: self.base_price,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Flattened result written back out by the batch command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummaryRow {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub fair_market_value: f64,
    pub retail_price: f64,
    pub trade_in_price: f64,
    pub wholesale_price: f64,
    pub condition_grade: &'static str,
    pub warnings: String,
}

impl BatchSummaryRow {
    pub fn new(vehicle: &VehicleInput, result: &ValuationResult) -> Self {
        Self {
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year,
            fair_market_value: result.fair_market_value,
            retail_price: result.retail_price,
            trade_in_price: result.trade_in_price,
            wholesale_price: result.wholesale_price,
            condition_grade: result.condition_grade.label(),
            warnings: result.warnings.join("; "),
        }
    }
}

pub fn write_summary<W: Write>(
    writer: W,
    rows: &[BatchSummaryRow],
) -> Result<(), BatchImportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Counts from one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub valued: usize,
    pub rejected: usize,
}

/// Values every imported row and writes the summary CSV.
///
/// Rows with a `base_price` are valued against it directly; the rest go through
/// `resolver`. Rows that cannot be read or fail validation are skipped and
/// counted.
pub fn run_batch<R, W>(
    engine: &ValuationEngine,
    resolver: &dyn BasePriceResolver,
    today: NaiveDate,
    fallback_base_price: f64,
    input: R,
    output: W,
) -> Result<BatchReport, BatchImportError>
where
    R: Read,
    W: Write,
{
    let import = read_vehicles(input)?;
    let mut report = BatchReport {
        rejected: import.rejected,
        ..BatchReport::default()
    };
    let mut summaries = Vec::with_capacity(import.rows.len());

    for (index, row) in import.rows.into_iter().enumerate() {
        let request = ValuationRequest {
            vehicle: row.vehicle,
            today,
            fallback: BasePrice::on_road(fallback_base_price, "fallback_estimate"),
        };
        let outcome = match row.base_price {
            Some(amount) => engine.appraise(
                &request,
                &FixedPriceResolver::new(BasePrice::on_road(amount, "batch_input")),
            ),
            None => engine.appraise(&request, resolver),
        };

        match outcome {
            Ok(result) => {
                summaries.push(BatchSummaryRow::new(&request.vehicle, &result));
                report.valued += 1;
            }
            Err(error) => {
                warn!(row = index + 1, %error, "skipping batch row");
                report.rejected += 1;
            }
        }
    }

    write_summary(output, &summaries)?;
    Ok(report)
}
