use super::domain::FuelType;
use super::findings::{grouped, Findings};
use super::rates::{MileageStandards, TierCharge, UsageSchedule};

#[derive(Debug, Clone, PartialEq)]
pub struct UsageOutcome {
    pub multiplier: f64,
    /// Actual minus expected kilometres, after the tamper cap.
    pub deviation: i64,
    pub expected_odometer: u64,
    pub findings: Findings,
}

/// Compares the odometer against the fuel type's expected mileage and turns the
/// deviation into a multiplicative adjustment.
pub fn adjust_for_usage(
    standards: &MileageStandards,
    schedule: &UsageSchedule,
    age_years: f64,
    odometer: u64,
    fuel: FuelType,
) -> UsageOutcome {
    let mut findings = Findings::new();
    let age = age_years.max(0.0);
    let expected_odometer = (age * standards.annual_km(fuel) as f64).trunc() as u64;
    let actual = odometer as f64;

    let mut deviation = actual - expected_odometer as f64;
    if actual < age * schedule.tamper_km_per_year {
        findings.warn(format!(
            "Odometer reading ({} km) suspiciously low for a {age:.1} year old vehicle. Possible tampering.",
            grouped(odometer as i64)
        ));
        deviation = deviation.max(-(expected_odometer as f64) * schedule.tamper_deviation_cap);
    }
    let deviation = deviation.trunc() as i64;

    let percent = if deviation > 0 {
        excess_penalty(schedule, deviation as f64, &mut findings)
    } else if deviation < 0 {
        findings.recommend(format!(
            "Low mileage vehicle: {} km vs expected {} km. Premium applied.",
            grouped(odometer as i64),
            grouped(expected_odometer as i64)
        ));
        let bonus = deviation.unsigned_abs() as f64 / 10_000.0 * schedule.bonus_percent_per_10k;
        -bonus.min(schedule.bonus_cap_percent)
    } else {
        0.0
    };

    let multiplier = (1.0 - percent / 100.0).max(schedule.multiplier_floor);

    UsageOutcome {
        multiplier,
        deviation,
        expected_odometer,
        findings,
    }
}

/// Consumes the excess tier by tier and returns the total penalty in percent.
fn excess_penalty(schedule: &UsageSchedule, excess_km: f64, findings: &mut Findings) -> f64 {
    let mut remaining = excess_km;
    let mut percent = 0.0;

    for tier in &schedule.penalty_tiers {
        if remaining <= 0.0 {
            break;
        }
        let consumed = tier.span_km.map_or(remaining, |span| remaining.min(span));
        match tier.charge {
            TierCharge::PerTenThousand { percent: rate } => {
                percent += consumed / 10_000.0 * rate;
            }
            TierCharge::Barrier {
                percent: flat,
                barrier_km,
            } => {
                percent += flat;
                findings.warn(format!(
                    "Vehicle has crossed {} km psychological barrier. Expect lower market demand and financing difficulty.",
                    grouped(barrier_km as i64)
                ));
            }
        }
        remaining -= consumed;
    }

    percent
}
