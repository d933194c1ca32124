//! Price arithmetic and display helpers.
//!
//! Cart prices are plain [`Decimal`] unit prices in the store's currency. The
//! mobile client never carried a currency code alongside the amount, so neither
//! does the cart.

pub use rust_decimal::Decimal;

/// Format an amount for display (e.g., `$19.99`).
///
/// Always rounds to two decimal places using banker's rounding.
///
/// ```
/// use gomarketplace_core::format_price;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_price(Decimal::new(1999, 2)), "$19.99");
/// assert_eq!(format_price(Decimal::from(10)), "$10.00");
/// ```
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded.abs())
    }
}

/// Total for a line: unit price times quantity.
///
/// Quantities may be zero or negative (the cart never clamps), in which case
/// the total is zero or negative too.
#[must_use]
pub fn line_total(price: Decimal, quantity: i32) -> Decimal {
    price * Decimal::from(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_pads_cents() {
        assert_eq!(format_price(Decimal::new(5, 1)), "$0.50");
        assert_eq!(format_price(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn test_format_price_rounds() {
        assert_eq!(format_price(Decimal::new(12_345, 3)), "$12.34");
        assert_eq!(format_price(Decimal::new(12_355, 3)), "$12.36");
    }

    #[test]
    fn test_format_price_negative() {
        assert_eq!(format_price(Decimal::new(-250, 2)), "-$2.50");
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(Decimal::new(250, 2), 3), Decimal::new(750, 2));
        assert_eq!(line_total(Decimal::new(250, 2), 0), Decimal::ZERO);
        assert_eq!(line_total(Decimal::new(250, 2), -1), Decimal::new(-250, 2));
    }
}
