//! Type-safe money representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount as reported by the host.
///
/// The amount is a decimal in the currency's standard unit (dollars, not
/// cents). Hosts send it either as a JSON number or as a string; both
/// deserialize to the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code, when the host includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<CurrencyCode>,
}

impl Money {
    /// Create a new amount without currency information.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self {
            amount,
            currency_code: None,
        }
    }

    /// Create a new amount in the given currency.
    #[must_use]
    pub const fn with_currency(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code: Some(currency_code),
        }
    }

    /// Total for `quantity` units at this price, `None` on overflow.
    #[must_use]
    pub fn times(&self, quantity: i64) -> Option<Decimal> {
        self.amount.checked_mul(Decimal::from(quantity))
    }
}

/// ISO 4217 currency codes.
///
/// Codes outside the explicit list deserialize to [`CurrencyCode::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    #[serde(other)]
    Other,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_from_string() {
        let money: Money =
            serde_json::from_str(r#"{"amount": "100.0", "currencyCode": "EUR"}"#).unwrap();
        assert_eq!(money.amount, Decimal::new(100, 0));
        assert_eq!(money.currency_code, Some(CurrencyCode::EUR));
    }

    #[test]
    fn test_amount_from_number() {
        let money: Money = serde_json::from_str(r#"{"amount": 358.00}"#).unwrap();
        assert_eq!(money.amount, Decimal::new(358, 0));
        assert_eq!(money.currency_code, None);
    }

    #[test]
    fn test_unknown_currency() {
        let money: Money =
            serde_json::from_str(r#"{"amount": "1", "currencyCode": "JPY"}"#).unwrap();
        assert_eq!(money.currency_code, Some(CurrencyCode::Other));
    }

    #[test]
    fn test_times() {
        let money = Money::with_currency(Decimal::new(1999, 2), CurrencyCode::USD);
        assert_eq!(money.times(3), Some(Decimal::new(5997, 2)));
        assert_eq!(money.times(0), Some(Decimal::ZERO));
    }

    #[test]
    fn test_times_overflow() {
        let money = Money::new(Decimal::new(100_000_000_000_000, 0));
        assert_eq!(money.times(9_000_000_000_000_000_000), None);
    }
}
