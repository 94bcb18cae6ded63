//! Currency and calendar date formatting for display.
//!
//! Dates are stored as `YYYY-MM-DD` (or `YYYY-MM` for months) and are always
//! treated as local calendar dates, never as instants, so that a balance
//! recorded on the 1st does not show up as the 31st in a negative UTC offset.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use time::{Date, Month, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// Format `number` as US dollars with two decimal places, e.g. "$1,234.56".
///
/// Negative numbers are rendered with a leading minus sign, e.g. "-$12.30".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .expect("'$' is a valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .expect("'-$' is a valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    // Round first so that values like -0.001 do not render as "-$0.00".
    let number = (number * 100.0).round() / 100.0;

    let formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "$0.00".to_owned();
    };

    pad_to_two_decimals(formatted_string)
}

/// numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3", so pad
/// the fractional part back out to two digits.
fn pad_to_two_decimals(mut formatted: String) -> String {
    match formatted.rfind('.') {
        Some(point) => {
            let decimals = formatted.len() - point - 1;

            for _ in decimals..2 {
                formatted.push('0');
            }
        }
        None => formatted.push_str(".00"),
    }

    formatted
}

const COMPACT_SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

/// Format `number` as US dollars in short compact notation, e.g. "$1.2K".
///
/// The number is scaled by powers of 1000 and suffixed with K, M, B or T.
/// Scaled values below 10 keep two significant digits, larger values are
/// rounded to a whole number.
pub fn format_compact_currency(number: f64) -> String {
    let sign = if number < 0.0 { "-" } else { "" };
    let mut magnitude = number.abs();
    let mut scale = 0;

    while magnitude >= 1000.0 && scale < COMPACT_SUFFIXES.len() - 1 {
        magnitude /= 1000.0;
        scale += 1;
    }

    let (mut rounded, mut decimals) = round_compact(magnitude);

    // e.g. 999,999 rounds up to "1000K", which should be "1M" instead.
    if rounded >= 1000.0 && scale < COMPACT_SUFFIXES.len() - 1 {
        scale += 1;
        (rounded, decimals) = round_compact(rounded / 1000.0);
    }

    if rounded == 0.0 {
        return "$0".to_owned();
    }

    let digits = if decimals == 0 {
        get_grouped_integer_formatter().fmt_string(rounded)
    } else {
        format!("{rounded:.decimals$}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_owned()
    };

    format!("{sign}${digits}{}", COMPACT_SUFFIXES[scale])
}

/// Round `magnitude` for compact display, returning the value and how many
/// decimal places it keeps.
fn round_compact(magnitude: f64) -> (f64, usize) {
    if magnitude == 0.0 || !magnitude.is_finite() {
        return (0.0, 0);
    }

    if magnitude >= 10.0 {
        return (magnitude.round(), 0);
    }

    // Two significant digits.
    let decimals = (1 - magnitude.log10().floor() as i32).max(0) as usize;
    let factor = 10f64.powi(decimals as i32);

    ((magnitude * factor).round() / factor, decimals)
}

fn get_grouped_integer_formatter() -> &'static Formatter {
    static FORMATTER: OnceLock<Formatter> = OnceLock::new();

    FORMATTER.get_or_init(|| {
        Formatter::new()
            .separator(',')
            .expect("',' is a valid separator")
            .precision(Precision::Decimals(0))
    })
}

/// Parse a `YYYY-MM-DD` or `YYYY-MM` string as a calendar date.
///
/// A missing (or zero) day defaults to the first day of the month, so
/// "2024-03" parses to 2024-03-01.
///
/// # Errors
///
/// Returns [Error::InvalidDate] if `text` does not name a real date.
pub fn parse_local_date(text: &str) -> Result<Date, Error> {
    let invalid_date = || Error::InvalidDate(text.to_owned());

    let mut parts = text.trim().split('-');

    let year: i32 = parts
        .next()
        .and_then(|part| part.parse().ok())
        .ok_or_else(invalid_date)?;
    let month: u8 = parts
        .next()
        .and_then(|part| part.parse().ok())
        .ok_or_else(invalid_date)?;
    let day: u8 = match parts.next() {
        Some(part) => part.parse().map_err(|_| invalid_date())?,
        None => 1,
    };

    if parts.next().is_some() {
        return Err(invalid_date());
    }

    let month = Month::try_from(month).map_err(|_| invalid_date())?;
    let day = if day == 0 { 1 } else { day };

    Date::from_calendar_date(year, month, day).map_err(|_| invalid_date())
}

/// The ways a calendar date can be displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateStyle {
    /// Abbreviated month, day and year, e.g. "Jan 5, 2024".
    #[default]
    MediumDate,
    /// Full month name, day and year, e.g. "January 5, 2024".
    LongDate,
    /// Abbreviated month and year, e.g. "Jan 2024".
    MonthYear,
    /// Abbreviated month only, e.g. "Jan".
    ShortMonth,
    /// Month, day and year as numbers, e.g. "1/5/2024".
    Numeric,
}

impl DateStyle {
    fn format_description(self) -> &'static [BorrowedFormatItem<'static>] {
        match self {
            DateStyle::MediumDate => {
                format_description!("[month repr:short] [day padding:none], [year]")
            }
            DateStyle::LongDate => {
                format_description!("[month repr:long] [day padding:none], [year]")
            }
            DateStyle::MonthYear => format_description!("[month repr:short] [year]"),
            DateStyle::ShortMonth => format_description!("[month repr:short]"),
            DateStyle::Numeric => {
                format_description!("[month padding:none]/[day padding:none]/[year]")
            }
        }
    }
}

/// Format a calendar date with the given style.
pub fn format_date(date: Date, style: DateStyle) -> String {
    date.format(style.format_description())
        .unwrap_or_else(|_| date.to_string())
}

/// Parse a `YYYY-MM-DD` or `YYYY-MM` string and format it for display.
///
/// This is part of the library API for callers holding date text. The
/// handlers already hold [Date] values and call [format_date] directly.
///
/// # Errors
///
/// Returns [Error::InvalidDate] if `text` does not name a real date.
pub fn format_local_date(text: &str, style: DateStyle) -> Result<String, Error> {
    parse_local_date(text).map(|date| format_date(date, style))
}


#[cfg(test)]
mod format_compact_currency_tests {
    use super::format_compact_currency;

    #[test]
    fn small_numbers_are_not_scaled() {
        assert_eq!(format_compact_currency(999.0), "$999");
        assert_eq!(format_compact_currency(12.34), "$12");
        assert_eq!(format_compact_currency(1.5), "$1.5");
    }

    #[test]
    fn scales_thousands() {
        assert_eq!(format_compact_currency(1234.0), "$1.2K");
        assert_eq!(format_compact_currency(12_345.0), "$12K");
        assert_eq!(format_compact_currency(123_456.0), "$123K");
        assert_eq!(format_compact_currency(1000.0), "$1K");
    }

    #[test]
    fn scales_millions_and_beyond() {
        assert_eq!(format_compact_currency(1_500_000.0), "$1.5M");
        assert_eq!(format_compact_currency(2_000_000_000.0), "$2B");
        assert_eq!(format_compact_currency(3_400_000_000_000.0), "$3.4T");
    }

    #[test]
    fn rounding_up_moves_to_next_suffix() {
        assert_eq!(format_compact_currency(999_999.0), "$1M");
    }

    #[test]
    fn formats_negative_numbers() {
        assert_eq!(format_compact_currency(-2500.0), "-$2.5K");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_compact_currency(0.0), "$0");
    }

    #[test]
    fn fractions_of_a_cent_keep_two_significant_digits() {
        assert_eq!(format_compact_currency(0.001), "$0.001");
        assert_eq!(format_compact_currency(-0.004), "-$0.004");
        assert_eq!(format_compact_currency(0.0123), "$0.012");
        assert_eq!(format_compact_currency(0.5), "$0.5");
    }

    #[test]
    fn huge_numbers_are_grouped() {
        assert_eq!(format_compact_currency(1e18), "$1,000,000T");
        assert_eq!(format_compact_currency(12_345e12), "$12,345T");
    }
}

#[cfg(test)]
mod local_date_tests {
    use time::macros::date;

    use crate::Error;

    use super::{DateStyle, format_date, format_local_date, parse_local_date};

    #[test]
    fn parses_full_date() {
        assert_eq!(parse_local_date("2024-01-05"), Ok(date!(2024 - 01 - 05)));
    }

    #[test]
    fn missing_day_defaults_to_first() {
        assert_eq!(parse_local_date("2024-03"), Ok(date!(2024 - 03 - 01)));
    }

    #[test]
    fn zero_day_defaults_to_first() {
        assert_eq!(parse_local_date("2024-03-00"), Ok(date!(2024 - 03 - 01)));
    }

    #[test]
    fn rejects_invalid_dates() {
        for text in ["", "2024", "2024-13-01", "2024-02-30", "abc-01-01", "2024-01-01-01"] {
            assert_eq!(
                parse_local_date(text),
                Err(Error::InvalidDate(text.to_owned())),
                "want error for {text:?}"
            );
        }
    }

    #[test]
    fn default_style_is_medium_date() {
        assert_eq!(
            format_local_date("2024-01-05", DateStyle::default()),
            Ok("Jan 5, 2024".to_owned())
        );
    }

    #[test]
    fn formats_each_style() {
        let date = date!(2024 - 01 - 05);

        assert_eq!(format_date(date, DateStyle::LongDate), "January 5, 2024");
        assert_eq!(format_date(date, DateStyle::MonthYear), "Jan 2024");
        assert_eq!(format_date(date, DateStyle::ShortMonth), "Jan");
        assert_eq!(format_date(date, DateStyle::Numeric), "1/5/2024");
    }

    #[test]
    fn formats_month_strings() {
        assert_eq!(
            format_local_date("2023-11", DateStyle::MonthYear),
            Ok("Nov 2023".to_owned())
        );
    }
}
