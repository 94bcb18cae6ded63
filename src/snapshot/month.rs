//! Calendar month arithmetic on [Date]s.
//!
//! A month is represented by the date of its first day and stored as `YYYY-MM`.

use time::{Date, Month, format_description::BorrowedFormatItem, macros::format_description};

const MONTH_KEY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]");

/// The first day of the month containing `date`.
pub fn month_start(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}

/// The last day of the month containing `date`.
pub fn month_end(date: Date) -> Date {
    next_month(date)
        .and_then(Date::previous_day)
        .unwrap_or(Date::MAX)
}

/// The first day of the month after the one containing `date`.
pub fn next_month(date: Date) -> Option<Date> {
    let (year, month) = match date.month() {
        Month::December => (date.year() + 1, Month::January),
        month => (date.year(), month.next()),
    };

    Date::from_calendar_date(year, month, 1).ok()
}

/// The month containing `date` formatted as `YYYY-MM`.
pub fn month_key(date: Date) -> String {
    date.format(MONTH_KEY_FORMAT)
        .unwrap_or_else(|_| format!("{}-{:02}", date.year(), u8::from(date.month())))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{month_end, month_key, month_start, next_month};

    #[test]
    fn start_and_end_of_month() {
        assert_eq!(month_start(date!(2024 - 02 - 17)), date!(2024 - 02 - 01));
        assert_eq!(month_end(date!(2024 - 02 - 17)), date!(2024 - 02 - 29));
        assert_eq!(month_end(date!(2023 - 02 - 01)), date!(2023 - 02 - 28));
        assert_eq!(month_end(date!(2023 - 12 - 31)), date!(2023 - 12 - 31));
    }

    #[test]
    fn next_month_wraps_year() {
        assert_eq!(next_month(date!(2023 - 12 - 15)), Some(date!(2024 - 01 - 01)));
        assert_eq!(next_month(date!(2024 - 01 - 31)), Some(date!(2024 - 02 - 01)));
    }

    #[test]
    fn formats_month_key() {
        assert_eq!(month_key(date!(2024 - 03 - 09)), "2024-03");
    }
}
