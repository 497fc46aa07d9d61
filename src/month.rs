//! Calendar month parsing and labelling.
//!
//! The upstream payload tags each month with a short code (`monthShort`) and a
//! display label (`month`). Short codes may be English or Portuguese
//! abbreviations, so both are accepted.

use time::{Date, Month, macros::format_description};

use crate::Error;

const ENGLISH_CODES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const PORTUGUESE_CODES: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Gets the calendar month for a zero-based month index (0 = January).
///
/// Returns `None` if `index` is greater than 11.
pub fn month_from_index(index: usize) -> Option<Month> {
    MONTHS.get(index).copied()
}

/// Gets the zero-based index of `month` (0 = January).
pub fn month_index(month: Month) -> usize {
    u8::from(month) as usize - 1
}

/// Parses a short month code such as "Jan", "fev" or "DEZ".
///
/// A trailing period is ignored, so "Set." parses as September.
pub fn parse_month_code(code: &str) -> Option<Month> {
    let code = code.trim().trim_end_matches('.').to_lowercase();

    ENGLISH_CODES
        .iter()
        .position(|candidate| *candidate == code)
        .or_else(|| {
            PORTUGUESE_CODES
                .iter()
                .position(|candidate| *candidate == code)
        })
        .and_then(month_from_index)
}

/// Parses a month label in one of the forms the upstream sends: `YYYY-MM`,
/// a full English month name, or a short month code.
pub fn parse_month_label(label: &str) -> Option<Month> {
    let label = label.trim();

    if let Some((_, month_number)) = sscanf::sscanf!(label, "{i32}-{u8}") {
        return Month::try_from(month_number).ok();
    }

    MONTHS
        .iter()
        .find(|month| month.to_string().eq_ignore_ascii_case(label))
        .copied()
        .or_else(|| parse_month_code(label))
}

/// Resolves the calendar month of an upstream month record, preferring the
/// short code and falling back to the display label.
///
/// # Errors
/// Returns [Error::InvalidMonthCode] if neither field can be parsed.
pub fn resolve_month(month_short: &str, month_label: &str) -> Result<Month, Error> {
    parse_month_code(month_short)
        .or_else(|| parse_month_label(month_label))
        .ok_or_else(|| Error::InvalidMonthCode(format!("{month_short} / {month_label}")))
}

/// Parses a year and month written as `YYYY-MM`, e.g. "2024-03".
///
/// # Errors
/// Returns [Error::InvalidMonthCode] if the text is not in that form or the
/// month number is not between 1 and 12.
pub fn parse_year_month(text: &str) -> Result<(i32, Month), Error> {
    let invalid = || Error::InvalidMonthCode(text.to_owned());

    let (year, month_number) = sscanf::sscanf!(text.trim(), "{i32}-{u8}").ok_or_else(invalid)?;
    let month = Month::try_from(month_number).map_err(|_| invalid())?;

    Ok((year, month))
}

/// Parses a calendar date written as `YYYY-MM-DD`.
///
/// # Errors
/// Returns [Error::InvalidDate] if the text is not a valid date in that form.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|error| Error::InvalidDate(format!("{text}: {error}")))
}

/// Formats a month as a three-letter abbreviation, e.g. "Jan".
pub fn short_label(month: Month) -> String {
    let mut label = month.to_string();
    label.truncate(3);
    label
}

/// Gets the first day of `month` in `year`.
pub fn first_day(year: i32, month: Month) -> Result<Date, Error> {
    Ok(Date::from_calendar_date(year, month, 1)?)
}

/// Gets the last day of `month` in `year`.
pub fn last_day(year: i32, month: Month) -> Result<Date, Error> {
    let (next_year, next_month) = match month {
        Month::December => (year + 1, Month::January),
        _ => (year, month.next()),
    };

    first_day(next_year, next_month)?
        .previous_day()
        .ok_or_else(|| Error::InvalidDate(format!("no day before {next_month} {next_year}")))
}
