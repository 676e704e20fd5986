//! Calendar arithmetic for recurrence expansion.
//!
//! Recurrence expansion walks every candidate day of every period up to the
//! horizon, so these helpers stay on plain integers: Rata Die day numbers for
//! day offsets and a flat month index for month stepping, with no `jiff::Span`
//! construction per step.

use jiff::civil::{Date, Weekday};

/// Fast leap year check.
#[inline]
pub fn is_leap_year(year: i16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Days in a month without building a `jiff::civil::Date`.
#[inline]
pub fn days_in_month(year: i16, month: i8) -> i8 {
    const DAYS: [i8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS[(month - 1) as usize]
    }
}

#[inline]
pub fn days_in_year(year: i16) -> i16 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Convert a civil date to a Rata Die day number (days since 0001-01-01).
///
/// Proleptic Gregorian calendar, Baum (2017). Divisions floor so years at
/// or before zero land on the same day grid.
#[inline]
fn rata_die(d: Date) -> i32 {
    let y = d.year() as i32;
    let m = d.month() as i32;
    let day = d.day() as i32;

    // Shift March = month 1 so Feb (end of "year") is month 12
    let a = (14 - m) / 12;
    let y2 = y - a;
    let m2 = m + 12 * a - 3;

    let leap_days = y2.div_euclid(4) - y2.div_euclid(100) + y2.div_euclid(400);
    day + (153 * m2 + 2) / 5 + 365 * y2 + leap_days - 306
}

/// Inverse of `rata_die()`.
#[inline]
fn rd_to_date(rd: i32) -> Date {
    // Shift so day 0 = March 1, year 0
    let z = rd + 306;
    let h = 100 * z - 25;
    let a = h.div_euclid(3_652_425);
    let b = a - a.div_euclid(4);
    let y = (100 * b + h).div_euclid(36_525);
    let c = b + z - 365 * y - y.div_euclid(4);
    let m = (5 * c + 456).div_euclid(153);
    let day = c - (153 * m - 457).div_euclid(5);

    let (year, month) = if m > 12 { (y + 1, m - 12) } else { (y, m) };

    jiff::civil::date(year as i16, month as i8, day as i8)
}

/// Number of days between two dates (d2 - d1), positive when `d2 > d1`.
#[inline]
pub fn days_between(d1: Date, d2: Date) -> i32 {
    rata_die(d2) - rata_die(d1)
}

/// Add `n` days to a date; `None` instead of leaving jiff's supported years.
#[inline]
pub fn checked_add_days(d: Date, n: i32) -> Option<Date> {
    let rd = rata_die(d).checked_add(n)?;
    if !(rata_die(Date::MIN)..=rata_die(Date::MAX)).contains(&rd) {
        return None;
    }
    Some(rd_to_date(rd))
}

/// Flat month index (`year * 12 + month - 1`) used to step monthly periods.
#[inline]
pub fn month_index(year: i16, month: i8) -> i32 {
    year as i32 * 12 + (month as i32 - 1)
}

/// Inverse of `month_index`; `None` once the year leaves jiff's range.
#[inline]
pub fn from_month_index(index: i32) -> Option<(i16, i8)> {
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) + 1;
    if !(-9999..=9999).contains(&year) {
        return None;
    }
    Some((year as i16, month as i8))
}

/// First day of the week containing `d`, where weeks begin on `week_start`.
#[inline]
pub fn week_start(d: Date, week_start: Weekday) -> Option<Date> {
    let offset = (d.weekday().to_monday_zero_offset() - week_start.to_monday_zero_offset())
        .rem_euclid(7);
    checked_add_days(d, -(offset as i32))
}

/// Position of `d` among the same weekdays of its month: `(from_start, from_end)`,
/// both 1-based. The last Friday of a month is `(_, 1)`.
#[inline]
pub fn weekday_position_in_month(d: Date) -> (i16, i16) {
    let day = d.day() as i16;
    let dim = days_in_month(d.year(), d.month()) as i16;
    ((day - 1) / 7 + 1, (dim - day) / 7 + 1)
}

/// Position of `d` among the same weekdays of its year: `(from_start, from_end)`.
#[inline]
pub fn weekday_position_in_year(d: Date) -> (i16, i16) {
    let doy = d.day_of_year();
    let diy = days_in_year(d.year());
    ((doy - 1) / 7 + 1, (diy - doy) / 7 + 1)
}

/// Whether `d` is selected by a BYMONTHDAY value; negatives count from month end.
#[inline]
pub fn matches_month_day(d: Date, month_day: i8) -> bool {
    if month_day > 0 {
        d.day() == month_day
    } else {
        let dim = days_in_month(d.year(), d.month());
        d.day() == dim + month_day + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn test_days_between_across_year() {
        // 2024 is a leap year
        assert_eq!(days_between(date(2024, 1, 1), date(2025, 1, 1)), 366);
        assert_eq!(days_between(date(2025, 1, 1), date(2026, 1, 1)), 365);
        assert_eq!(days_between(date(2025, 1, 2), date(2025, 1, 1)), -1);
    }

    #[test]
    fn test_days_between_matches_jiff() {
        let pairs = [
            (date(2020, 1, 1), date(2030, 6, 15)),
            (date(2024, 2, 29), date(2025, 2, 28)),
            (date(2000, 3, 1), date(2100, 3, 1)),
        ];
        for (d1, d2) in pairs {
            let jiff_days = (d2 - d1).get_days();
            assert_eq!(days_between(d1, d2), jiff_days, "mismatch for {d1} → {d2}");
        }
    }

    #[test]
    fn test_add_days_crosses_boundaries() {
        assert_eq!(checked_add_days(date(2025, 1, 31), 1), Some(date(2025, 2, 1)));
        assert_eq!(checked_add_days(date(2025, 12, 31), 1), Some(date(2026, 1, 1)));
        assert_eq!(checked_add_days(date(2024, 2, 28), 1), Some(date(2024, 2, 29)));
        assert_eq!(checked_add_days(date(2025, 1, 1), -1), Some(date(2024, 12, 31)));
        assert_eq!(checked_add_days(date(2025, 1, 1), 365), Some(date(2026, 1, 1)));
        assert_eq!(checked_add_days(date(9999, 12, 25), 7), None);
        assert_eq!(checked_add_days(date(-9999, 1, 3), -7), None);
    }

    #[test]
    fn test_day_numbers_before_year_one() {
        // Year 0 is a leap year; year -1 is not
        assert_eq!(checked_add_days(date(0, 2, 28), 1), Some(date(0, 2, 29)));
        assert_eq!(checked_add_days(date(0, 1, 1), -1), Some(date(-1, 12, 31)));
        assert_eq!(checked_add_days(date(-1, 6, 1), 7), Some(date(-1, 6, 8)));
        assert_eq!(checked_add_days(date(-1, 2, 28), 1), Some(date(-1, 3, 1)));
        assert_eq!(days_between(date(-1, 1, 1), date(1, 1, 1)), 365 + 366);

        let pairs = [
            (date(-400, 3, 1), date(0, 2, 29)),
            (date(-9999, 1, 1), date(9999, 12, 31)),
        ];
        for (d1, d2) in pairs {
            let jiff_days = d1.until((jiff::Unit::Day, d2)).unwrap().get_days();
            assert_eq!(days_between(d1, d2), jiff_days, "mismatch for {d1} → {d2}");
        }
    }

    #[test]
    fn test_month_index_roundtrip() {
        let index = month_index(2025, 11);
        assert_eq!(from_month_index(index + 3), Some((2026, 2)));
        assert_eq!(from_month_index(index - 11), Some((2024, 12)));
        assert_eq!(from_month_index(month_index(9999, 12) + 1), None);
    }

    #[test]
    fn test_week_start() {
        // 2025-06-18 is a Wednesday
        let wed = date(2025, 6, 18);
        assert_eq!(week_start(wed, Weekday::Monday), Some(date(2025, 6, 16)));
        assert_eq!(week_start(wed, Weekday::Sunday), Some(date(2025, 6, 15)));
        assert_eq!(week_start(wed, Weekday::Wednesday), Some(wed));
        assert_eq!(week_start(wed, Weekday::Thursday), Some(date(2025, 6, 12)));
        // -9999-01-01 is a Monday; the Sunday before it is out of range
        assert_eq!(week_start(date(-9999, 1, 1), Weekday::Monday), Some(date(-9999, 1, 1)));
        assert_eq!(week_start(date(-9999, 1, 1), Weekday::Sunday), None);
    }

    #[test]
    fn test_weekday_positions() {
        // Last Friday of Jan 2025 is the 31st, fifth Friday from the start
        assert_eq!(weekday_position_in_month(date(2025, 1, 31)), (5, 1));
        assert_eq!(weekday_position_in_month(date(2025, 1, 3)), (1, 5));
        // First and last days of a leap year
        assert_eq!(weekday_position_in_year(date(2024, 1, 1)), (1, 53));
        assert_eq!(weekday_position_in_year(date(2024, 12, 31)), (53, 1));
    }

    #[test]
    fn test_matches_month_day() {
        assert!(matches_month_day(date(2024, 2, 29), -1));
        assert!(matches_month_day(date(2025, 2, 28), -1));
        assert!(matches_month_day(date(2025, 4, 29), -2));
        assert!(matches_month_day(date(2025, 4, 15), 15));
        assert!(!matches_month_day(date(2025, 4, 30), 31));
    }
}
