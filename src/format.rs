//! Text formatting for amounts and shares.

use numfmt::{Formatter, Precision};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::Error;

/// Formats amounts as currency with two decimal places, e.g. "-$234.50".
pub struct CurrencyFormatter {
    symbol: String,
    positive: Formatter,
    negative: Formatter,
}

impl CurrencyFormatter {
    /// Create a formatter using `symbol` as the currency prefix.
    ///
    /// # Errors
    /// Returns [Error::InvalidCurrencySymbol] if the prefix is rejected by the
    /// number formatter (e.g. it is too long).
    pub fn new(symbol: &str) -> Result<Self, Error> {
        let invalid = |_| Error::InvalidCurrencySymbol(symbol.to_owned());

        Ok(Self {
            symbol: symbol.to_owned(),
            positive: Formatter::currency(symbol)
                .map_err(invalid)?
                .precision(Precision::Decimals(2)),
            negative: Formatter::currency(&format!("-{symbol}"))
                .map_err(invalid)?
                .precision(Precision::Decimals(2)),
        })
    }

    /// Format `amount`.
    pub fn format(&self, amount: Decimal) -> String {
        // numfmt switches to scientific notation below one cent
        let number = amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or_default();

        let mut formatted_string = if number < 0.0 {
            self.negative.fmt_string(number.abs())
        } else if number > 0.0 {
            self.positive.fmt_string(number)
        } else {
            // numfmt renders zero as a bare "0"
            return format!("{}0.00", self.symbol);
        };

        // numfmt drops trailing zeros, e.g. "12.30" comes out as "12.3"
        match formatted_string.rfind('.') {
            Some(position) => {
                let decimals = formatted_string.len() - position - 1;
                formatted_string.push_str(&"0".repeat(2usize.saturating_sub(decimals)));
            }
            None => formatted_string.push_str(".00"),
        }

        formatted_string
    }
}

/// Format a share between 0 and 1 as a whole percentage, e.g. "86%".
///
/// Values that round to zero are shown as "0%", never "-0%".
pub fn format_percent(share: f64) -> String {
    let rounded = (share * 100.0).round();

    if rounded.abs() < 0.5 {
        "0%".to_owned()
    } else {
        format!("{rounded:.0}%")
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::format::{CurrencyFormatter, format_percent};

    #[test]
    fn formats_positive_and_negative_amounts() {
        let formatter = CurrencyFormatter::new("$").unwrap();

        assert_eq!(formatter.format(dec!(234.5)), "$234.50");
        assert_eq!(formatter.format(dec!(-12.3)), "-$12.30");
        assert_eq!(formatter.format(dec!(7)), "$7.00");
    }

    #[test]
    fn formats_zero() {
        let formatter = CurrencyFormatter::new("R$").unwrap();

        assert_eq!(formatter.format(dec!(0)), "R$0.00");
    }

    #[test]
    fn rounds_sub_cent_amounts() {
        let formatter = CurrencyFormatter::new("$").unwrap();

        assert_eq!(formatter.format(dec!(0.004)), "$0.00");
        assert_eq!(formatter.format(dec!(-0.004)), "$0.00");
        assert_eq!(formatter.format(dec!(12.345)), "$12.35");
    }

    #[test]
    fn formats_percentages() {
        assert_eq!(format_percent(0.857142), "86%");
        assert_eq!(format_percent(1.0), "100%");
        assert_eq!(format_percent(0.001), "0%");
        assert_eq!(format_percent(-0.001), "0%");
    }
}
