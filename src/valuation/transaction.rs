use super::domain::{ProcurementRange, TransactionPrices};
use super::rates::TransactionRates;

/// Derives the four transaction-context prices from a fair market value.
///
/// Retail adds the dealer margin plus tax charged on that margin; trade-in
/// removes the margin; wholesale removes the margin and the wholesale discount.
pub fn transaction_prices(rates: &TransactionRates, fair_market_value: f64) -> TransactionPrices {
    let margin = fair_market_value * rates.dealer_margin;
    let tax_on_margin = margin * rates.tax_on_margin;

    TransactionPrices {
        c2c: fair_market_value,
        b2c: fair_market_value + margin + tax_on_margin,
        c2b: fair_market_value * (1.0 - rates.dealer_margin),
        b2b: fair_market_value * (1.0 - rates.dealer_margin - rates.wholesale_discount),
    }
}

pub fn procurement_range(rates: &TransactionRates, trade_in: f64) -> ProcurementRange {
    ProcurementRange {
        min: trade_in * rates.procurement_floor,
        max: trade_in * rates.procurement_ceiling,
    }
}
