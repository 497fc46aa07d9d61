//! Resolves "today" for a canonical timezone.
//!
//! The engine never reads the clock itself; callers resolve the reference
//! date here and pass it in.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// Get the current UTC offset of a canonical timezone, e.g. "Pacific/Auckland".
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Get today's date in a canonical timezone.
///
/// # Errors
/// Returns [Error::InvalidTimezone] if the timezone name is not known.
pub fn today_in(canonical_timezone: &str) -> Result<Date, Error> {
    let offset = get_local_offset(canonical_timezone)
        .ok_or_else(|| Error::InvalidTimezone(canonical_timezone.to_owned()))?;

    Ok(OffsetDateTime::now_utc().to_offset(offset).date())
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        timezone::{get_local_offset, today_in},
    };

    #[test]
    fn utc_has_zero_offset() {
        let offset = get_local_offset("UTC").unwrap();

        assert!(offset.is_utc());
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        assert_eq!(
            today_in("Mars/Olympus_Mons"),
            Err(Error::InvalidTimezone("Mars/Olympus_Mons".to_owned()))
        );
    }

    #[test]
    fn today_is_close_to_utc_today() {
        let utc_today = time::OffsetDateTime::now_utc().date();

        let today = today_in("America/Sao_Paulo").unwrap();

        assert!((today - utc_today).whole_days().abs() <= 1);
    }
}
