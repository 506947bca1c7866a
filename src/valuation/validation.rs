use chrono::NaiveDate;

use super::domain::{BasePrice, VehicleInput};

/// Input problems rejected before any calculation runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputViolation {
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },
    #[error("owner count must be at least 1 (found {found})")]
    OwnerCount { found: u32 },
    #[error("tire tread must be within 0-100 percent (found {found})")]
    TireTread { found: u8 },
    #[error("registration date {registration} is after valuation date {today}")]
    RegistrationInFuture {
        registration: NaiveDate,
        today: NaiveDate,
    },
    #[error("{label} must be a positive, finite amount (found {found})")]
    Price { label: &'static str, found: f64 },
}

/// Checks a vehicle and the fallback price it will be valued against.
pub fn validate_vehicle(
    vehicle: &VehicleInput,
    today: NaiveDate,
    fallback: &BasePrice,
) -> Result<(), InputViolation> {
    if vehicle.make.trim().is_empty() {
        return Err(InputViolation::MissingField { field: "make" });
    }
    if vehicle.model.trim().is_empty() {
        return Err(InputViolation::MissingField { field: "model" });
    }
    if vehicle.owners < 1 {
        return Err(InputViolation::OwnerCount {
            found: vehicle.owners,
        });
    }
    if vehicle.inspection.tire_tread > 100 {
        return Err(InputViolation::TireTread {
            found: vehicle.inspection.tire_tread,
        });
    }
    if vehicle.registration_date > today {
        return Err(InputViolation::RegistrationInFuture {
            registration: vehicle.registration_date,
            today,
        });
    }
    validate_price("fallback base price", fallback.amount)
}

pub fn validate_price(label: &'static str, amount: f64) -> Result<(), InputViolation> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(InputViolation::Price {
            label,
            found: amount,
        })
    }
}
