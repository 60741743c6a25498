use super::schema::LineItem;

/// Monetary totals of a line-item list.
///
/// Prices are VAT-inclusive, so VAT is carved out of the gross sum and the
/// net subtotal is what remains; `subtotal + vat` equals `total` up to
/// floating-point error. Nothing is rounded here: display rounding to two
/// decimals happens at render time only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    /// Итого без НДС
    pub subtotal: f64,
    /// В том числе НДС
    pub vat: f64,
    /// Итого к оплате
    pub total: f64,
}

impl Totals {
    pub fn from_items(items: &[LineItem]) -> Self {
        let total: f64 = items.iter().map(LineItem::total).sum();
        let vat: f64 = items.iter().map(LineItem::vat_amount).sum();
        Totals {
            subtotal: total - vat,
            vat,
            total,
        }
    }
}
