use super::domain::OnRoadBreakdown;
use super::rates::{FixedCharges, OnRoadSchedule};
use super::round_money;

/// Converts an ex-showroom price into an on-road price for the given
/// purchase year and registration state.
///
/// Callers validate `ex_showroom` beforehand; this step cannot fail.
pub fn on_road_price(
    schedule: &OnRoadSchedule,
    ex_showroom: f64,
    year: i32,
    state: &str,
) -> OnRoadBreakdown {
    let road_tax_rate = road_tax_rate(schedule, year, state);
    let road_tax = ex_showroom * road_tax_rate;
    let charges = fixed_charges(schedule, year);
    let insurance = insurance_estimate(schedule, ex_showroom, year);

    let total = ex_showroom
        + road_tax
        + charges.registration
        + charges.smart_card
        + charges.cess
        + charges.other
        + insurance;

    OnRoadBreakdown {
        ex_showroom: round_money(ex_showroom),
        road_tax: round_money(road_tax),
        road_tax_rate,
        registration: charges.registration,
        smart_card: charges.smart_card,
        cess: charges.cess,
        other_charges: charges.other,
        insurance: round_money(insurance),
        total_on_road: round_money(total),
    }
}

pub(crate) fn road_tax_rate(schedule: &OnRoadSchedule, year: i32, state: &str) -> f64 {
    if !schedule.is_home_state(state) {
        return schedule.default_road_tax_rate;
    }
    schedule
        .road_tax_by_year
        .get(&year)
        .copied()
        .unwrap_or(schedule.default_road_tax_rate)
}

/// Unknown years fall back to the most recent schedule entry.
fn fixed_charges(schedule: &OnRoadSchedule, year: i32) -> FixedCharges {
    schedule
        .fixed_charges_by_year
        .get(&year)
        .or_else(|| schedule.fixed_charges_by_year.values().next_back())
        .cloned()
        .unwrap_or(FixedCharges {
            registration: 0.0,
            smart_card: 0.0,
            cess: 0.0,
            other: 0.0,
        })
}

pub(crate) fn insurance_estimate(schedule: &OnRoadSchedule, ex_showroom: f64, year: i32) -> f64 {
    let rate = schedule
        .insurance_bands
        .iter()
        .find(|band| band.below.map_or(true, |limit| ex_showroom < limit))
        .map(|band| band.rate)
        .unwrap_or(0.0);
    let years_since_baseline = f64::from(year - schedule.insurance_baseline_year);
    let year_factor = 1.0 + years_since_baseline * schedule.insurance_annual_escalation;
    ex_showroom * rate * year_factor
}
