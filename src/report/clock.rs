use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc, Weekday};

/// Converts a UTC instant to Central European wall-clock time.
///
/// Summer time (CEST, UTC+2) runs from 01:00 UTC on the last Sunday of March
/// to 01:00 UTC on the last Sunday of October; CET (UTC+1) otherwise.
pub fn central_european(now: DateTime<Utc>) -> (NaiveDateTime, &'static str) {
    let (offset, zone) = if is_summer_time(now) {
        (2, "CEST")
    } else {
        (1, "CET")
    };
    (now.naive_utc() + Duration::hours(offset), zone)
}

pub fn footer_stamp(now: DateTime<Utc>) -> String {
    let (local, zone) = central_european(now);
    format!("{} {}", local.format("%d.%m.%Y %H:%M"), zone)
}

fn is_summer_time(now: DateTime<Utc>) -> bool {
    let year = now.year();
    match (switch_instant(year, 3), switch_instant(year, 10)) {
        (Some(start), Some(end)) => {
            let instant = now.naive_utc();
            instant >= start && instant < end
        }
        _ => false,
    }
}

fn switch_instant(year: i32, month: u32) -> Option<NaiveDateTime> {
    let last_day = NaiveDate::from_ymd_opt(year, month, 31)?;
    let back = last_day.weekday().num_days_from_sunday() as i64;
    let sunday = last_day - Duration::days(back);
    debug_assert_eq!(sunday.weekday(), Weekday::Sun);
    sunday.and_hms_opt(1, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_winter_is_cet() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap();
        assert_eq!(footer_stamp(now), "15.01.2024 09:30 CET");
    }

    #[test]
    fn test_summer_is_cest() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 22, 5, 0).unwrap();
        assert_eq!(footer_stamp(now), "02.07.2024 00:05 CEST");
    }

    #[test]
    fn test_switch_boundaries() {
        // 2024: last Sunday of March is the 31st, of October the 27th.
        let before = Utc.with_ymd_and_hms(2024, 3, 31, 0, 59, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 3, 31, 1, 0, 0).unwrap();
        assert_eq!(central_european(before).1, "CET");
        assert_eq!(central_european(after).1, "CEST");

        let autumn = Utc.with_ymd_and_hms(2024, 10, 27, 1, 0, 0).unwrap();
        assert_eq!(central_european(autumn).1, "CET");
    }
}
