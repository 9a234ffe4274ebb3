//! Money
//!
//! Every monetary field in the registers is an amount in Brazilian reais.

use rust_decimal::Decimal;
use rusty_money::{
    FormattableCurrency, Formatter, LocalFormat, Money, MoneyError, Params, Position,
    iso::{self, Currency},
};

/// Monetary amount in BRL.
pub type Amount = Money<'static, Currency>;

/// Wrap a decimal value as BRL.
pub fn brl(value: Decimal) -> Amount {
    Money::from_decimal(value, iso::BRL)
}

/// Zero reais.
pub fn zero() -> Amount {
    brl(Decimal::ZERO)
}

/// Sum a sequence of amounts.
///
/// # Errors
///
/// Returns a [`MoneyError`] if the amounts are not all in the same currency.
pub fn sum<I>(amounts: I) -> Result<Amount, MoneyError>
where
    I: IntoIterator<Item = Amount>,
{
    amounts
        .into_iter()
        .try_fold(zero(), |total, amount| total.add(amount))
}

const AMOUNT_ONLY: &[Position] = &[Position::Sign, Position::Amount];

const SYMBOL_FIRST: &[Position] = &[
    Position::Sign,
    Position::Symbol,
    Position::Space,
    Position::Amount,
];

fn params(amount: &Amount, positions: &'static [Position]) -> Params<'static> {
    let currency = amount.currency();
    let format = LocalFormat::from_locale(currency.locale());

    Params {
        digit_separator: format.digit_separator,
        exponent_separator: format.exponent_separator,
        separator_pattern: format.digit_separator_pattern,
        positions,
        rounding: Some(currency.exponent()),
        symbol: Some(currency.symbol()),
        code: Some(currency.code()),
    }
}

/// Format an amount without currency symbol, e.g. `250.000,00`.
pub fn format_amount(amount: &Amount) -> String {
    Formatter::money(amount, params(amount, AMOUNT_ONLY))
}

/// Format an amount with the real sign, e.g. `R$ 250.000,00`.
pub fn format_brl(amount: &Amount) -> String {
    Formatter::money(amount, params(amount, SYMBOL_FIRST))
}
