//! Daily aggregation of raw sale events.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use priceflow_core::SaleEvent;

/// Total units sold per calendar day (UTC), ordered by date.
pub fn daily_totals(sales: &[SaleEvent]) -> BTreeMap<NaiveDate, i64> {
    let mut totals: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for sale in sales {
        *totals.entry(sale.sold_at.date_naive()).or_insert(0) += sale.quantity;
    }
    totals
}

/// Round to 2 decimal places (presentation/score boundary).
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 1 decimal place (forecast unit counts).
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
