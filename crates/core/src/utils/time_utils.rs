use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

/// Default timezone for business dates ("today" for overdue checks).
pub const DEFAULT_BUSINESS_TZ: Tz = chrono_tz::Europe::Berlin;

/// Converts a UTC instant to the business date in the given timezone.
pub fn business_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's business date in `tz`.
pub fn business_date_today(tz: Tz) -> NaiveDate {
    business_date_from_utc(Utc::now(), tz)
}

/// Signed number of days from `start` to `end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// `date` shifted by `days`; `None` if the result is out of chrono's range.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|delta| date.checked_add_signed(delta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_days_between_is_signed() {
        let a = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(days_between(a, b), 30);
        assert_eq!(days_between(b, a), -30);
    }

    #[test]
    fn test_add_days_crosses_leap_day() {
        let a = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        assert_eq!(add_days(a, 2), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(add_days(a, -28), NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(add_days(a, i64::MAX), None);
    }

    #[test]
    fn test_business_date_uses_timezone() {
        // 23:30 UTC on Dec 31 is already Jan 1 in Berlin
        let instant = Utc.with_ymd_and_hms(2023, 12, 31, 23, 30, 0).unwrap();
        assert_eq!(
            business_date_from_utc(instant, DEFAULT_BUSINESS_TZ),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }
}
