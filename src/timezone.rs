//! Resolves "today" for a household that lives in a particular timezone.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// The UTC offset of `canonical_timezone` at the moment `now`.
///
/// Returns `None` if the timezone name is unknown.
pub fn get_local_offset(canonical_timezone: &str, now: OffsetDateTime) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&now).to_utc())
}

/// The local calendar date in `canonical_timezone` at the moment `now`.
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if the timezone name is unknown.
pub fn local_date(canonical_timezone: &str, now: OffsetDateTime) -> Result<Date, Error> {
    let offset = get_local_offset(canonical_timezone, now).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", canonical_timezone);
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })?;

    Ok(now.to_offset(offset).date())
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use crate::Error;

    use super::local_date;

    #[test]
    fn local_date_can_be_ahead_of_utc() {
        let now = datetime!(2024 - 03 - 31 20:00 UTC);

        assert_eq!(local_date("Etc/UTC", now), Ok(date!(2024 - 03 - 31)));
        // Auckland is UTC+13 until the first Sunday of April.
        assert_eq!(local_date("Pacific/Auckland", now), Ok(date!(2024 - 04 - 01)));
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        let now = datetime!(2024 - 03 - 31 20:00 UTC);

        assert_eq!(
            local_date("Mars/Olympus_Mons", now),
            Err(Error::InvalidTimezoneError("Mars/Olympus_Mons".to_owned()))
        );
    }
}
