//! Currency formatting for balances

use coaweb_config::{CurrencyConfig, SymbolPosition};
use coaweb_utils::group_thousands;
use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount according to the currency settings, e.g. `-$1,234.50`
pub fn format_currency(amount: Decimal, currency: &CurrencyConfig) -> String {
    let rounded = amount
        .round_dp_with_strategy(currency.decimal_places, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let mut digits = rounded.abs();
    digits.rescale(currency.decimal_places);
    let text = digits.to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut number = group_thousands(int_part, &currency.thousands_separator);
    if let Some(frac) = frac_part {
        number.push_str(&currency.decimal_separator);
        number.push_str(frac);
    }

    let sign = if negative { "-" } else { "" };
    match currency.symbol_position {
        SymbolPosition::Before => format!("{}{}{}", sign, currency.symbol, number),
        SymbolPosition::After => format!("{}{} {}", sign, number, currency.symbol),
    }
}

/// Sign class used by the table
pub fn balance_class(amount: Decimal) -> &'static str {
    if amount.is_sign_negative() && !amount.is_zero() {
        "text-red-600"
    } else if amount.is_zero() {
        "text-gray-400"
    } else {
        "text-gray-900"
    }
}
