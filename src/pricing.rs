//! Pricing

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::cart::{Cart, CartLine};

/// Sum of `price * quantity` over every line, zero for an empty cart.
///
/// Saturates instead of overflowing the decimal range.
pub fn total_price<'a>(lines: impl IntoIterator<Item = &'a CartLine>) -> Decimal {
    lines
        .into_iter()
        .fold(Decimal::ZERO, |acc, line| acc.saturating_add(line.subtotal()))
}

/// Sum of quantities over every line, zero for an empty cart.
pub fn item_count<'a>(lines: impl IntoIterator<Item = &'a CartLine>) -> u64 {
    lines
        .into_iter()
        .map(|line| u64::from(line.quantity))
        .sum()
}

/// Format an amount in the display currency, e.g. `$20.00`.
pub fn format_amount(amount: Decimal, currency: &'static Currency) -> String {
    Money::from_decimal(amount, currency).to_string()
}

/// Cart totals in one pass over the lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    /// Sum of line subtotals
    pub total: Decimal,

    /// Sum of quantities
    pub item_count: u64,
}

impl From<&Cart> for Totals {
    fn from(cart: &Cart) -> Self {
        cart.iter().fold(Totals::default(), |acc, line| Totals {
            total: acc.total.saturating_add(line.subtotal()),
            item_count: acc.item_count + u64::from(line.quantity),
        })
    }
}
