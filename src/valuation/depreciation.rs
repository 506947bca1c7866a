use super::breakdown::Breakdown;
use super::rates::DepreciationBracket;

#[derive(Debug, Clone, PartialEq)]
pub struct DepreciationOutcome {
    pub value: f64,
    pub percentage: f64,
    pub breakdown: Breakdown,
}

/// Applies the segmented depreciation curve to `base_price`.
///
/// The first bracket is charged linearly on the base price. Every later
/// bracket compounds on the remaining value one full year at a time and then
/// charges a partial-year slice for the fraction left over. An age equal to a
/// bracket's upper bound never reaches the next bracket.
pub fn depreciate(
    brackets: &[DepreciationBracket],
    age_years: f64,
    base_price: f64,
) -> DepreciationOutcome {
    let age = age_years.max(0.0);
    let mut remaining = base_price;
    let mut breakdown = Breakdown::new();

    for (index, bracket) in brackets.iter().enumerate() {
        if index == 0 {
            let span = bracket.end_year.map_or(age, |end| age.min(end));
            let amount = base_price * bracket.annual_rate * span;
            remaining -= amount;
            breakdown.insert(first_label(bracket), amount);
            continue;
        }

        if age <= bracket.start_year {
            break;
        }

        let bracket_end = bracket.end_year.map_or(age, |end| age.min(end));
        let years_in_bracket = bracket_end - bracket.start_year;
        let full_years = years_in_bracket.trunc();
        let partial = years_in_bracket - full_years;
        let first_year = bracket.start_year.trunc() as i64 + 1;

        for offset in 0..full_years as i64 {
            let amount = remaining * bracket.annual_rate;
            remaining -= amount;
            breakdown.insert(format!("year_{}", first_year + offset), amount);
        }

        if partial > 0.0 {
            let amount = remaining * bracket.annual_rate * partial;
            remaining -= amount;
            breakdown.insert(
                format!("year_{}_partial", first_year + full_years as i64),
                amount,
            );
        }
    }

    let value = remaining.max(0.0);
    let percentage = if base_price > 0.0 {
        (base_price - value) / base_price * 100.0
    } else {
        0.0
    };

    DepreciationOutcome {
        value,
        percentage,
        breakdown,
    }
}

fn first_label(bracket: &DepreciationBracket) -> String {
    match bracket.end_year {
        Some(end) => format!("year_{}_{}", bracket.start_year.trunc(), end.trunc()),
        None => format!("year_{}_plus", bracket.start_year.trunc()),
    }
}
