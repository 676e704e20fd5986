use std::collections::VecDeque;

use super::{Frequency, RecurrenceRule, WeekdayRule};
use crate::date_math::{
    checked_add_days, days_in_month, from_month_index, matches_month_day, month_index,
    week_start, weekday_position_in_month, weekday_position_in_year,
};
use jiff::civil::{Date, DateTime, Time};

/// Ascending instances of a rule, bounded by a limit date-time.
///
/// Works one period (year, month, week or day) at a time: every day of the
/// period is filtered through the rule's selectors, `BYSETPOS` picks from the
/// survivors, and the start's time of day is attached. Iteration stops at the
/// first period that begins after the limit, so a rule that can never match
/// still terminates.
#[derive(Debug)]
pub struct Instances<'r> {
    rule: &'r RecurrenceRule,
    by_month: Vec<i8>,
    by_month_day: Vec<i8>,
    by_day: Vec<WeekdayRule>,
    dtstart: DateTime,
    time: Time,
    limit: DateTime,
    cursor: Cursor,
    pending: VecDeque<DateTime>,
    emitted: u32,
    exhausted: bool,
}

#[derive(Debug, Clone, Copy)]
enum Cursor {
    Year(i32),
    Month(i32),
    Week(Date),
    Day(Date),
    Done,
}

impl<'r> Instances<'r> {
    pub(super) fn new(rule: &'r RecurrenceRule, dtstart: DateTime, limit: DateTime) -> Self {
        let start = dtstart.date();
        let mut by_month = rule.by_month.clone();
        let mut by_month_day = rule.by_month_day.clone();
        let mut by_day = rule.by_day.clone();

        // With no day selector, the start date supplies one
        if by_month_day.is_empty() && by_day.is_empty() {
            match rule.frequency {
                Frequency::Yearly => {
                    if by_month.is_empty() {
                        by_month.push(start.month());
                    }
                    by_month_day.push(start.day());
                }
                Frequency::Monthly => by_month_day.push(start.day()),
                Frequency::Weekly => by_day.push(WeekdayRule::every(start.weekday())),
                Frequency::Daily => {}
            }
        }
        by_month.sort_unstable();
        by_month.dedup();

        let cursor = match rule.frequency {
            Frequency::Yearly => Cursor::Year(start.year() as i32),
            Frequency::Monthly => Cursor::Month(month_index(start.year(), start.month())),
            Frequency::Weekly => {
                week_start(start, rule.week_start).map_or(Cursor::Done, Cursor::Week)
            }
            Frequency::Daily => Cursor::Day(start),
        };

        Self {
            rule,
            by_month,
            by_month_day,
            by_day,
            dtstart,
            time: dtstart.time(),
            limit,
            cursor,
            pending: VecDeque::new(),
            emitted: 0,
            exhausted: false,
        }
    }

    fn matches(&self, d: Date) -> bool {
        if !self.by_month.is_empty() && !self.by_month.contains(&d.month()) {
            return false;
        }
        if !self.by_month_day.is_empty()
            && !self.by_month_day.iter().any(|&md| matches_month_day(d, md))
        {
            return false;
        }
        if !self.by_day.is_empty() && !self.by_day.iter().any(|rule| self.matches_weekday(rule, d))
        {
            return false;
        }
        true
    }

    fn matches_weekday(&self, rule: &WeekdayRule, d: Date) -> bool {
        if d.weekday() != rule.weekday {
            return false;
        }
        let Some(n) = rule.ordinal else {
            return true;
        };
        // Yearly ordinals count within the year unless BYMONTH narrows to months
        let (from_start, from_end) =
            if self.rule.frequency == Frequency::Yearly && self.by_month.is_empty() {
                weekday_position_in_year(d)
            } else {
                weekday_position_in_month(d)
            };
        if n > 0 {
            from_start == n as i16
        } else {
            from_end == -(n as i16)
        }
    }

    /// Matching days of the period under the cursor, then advance the cursor.
    /// `None` once the period begins after the limit.
    fn next_period(&mut self) -> Option<Vec<Date>> {
        let interval = self.rule.interval as i32;
        let limit = self.limit.date();

        let days: Vec<Date> = match self.cursor {
            Cursor::Year(year) => {
                let year = i16::try_from(year).ok().filter(|y| *y <= 9999)?;
                if jiff::civil::date(year, 1, 1) > limit {
                    return None;
                }
                self.cursor = Cursor::Year(year as i32 + interval);
                let months: Vec<i8> = if self.by_month.is_empty() {
                    (1..=12).collect()
                } else {
                    self.by_month.clone()
                };
                months
                    .into_iter()
                    .flat_map(|m| {
                        (1..=days_in_month(year, m)).map(move |d| jiff::civil::date(year, m, d))
                    })
                    .filter(|d| self.matches(*d))
                    .collect()
            }
            Cursor::Month(index) => {
                let (year, month) = from_month_index(index)?;
                if jiff::civil::date(year, month, 1) > limit {
                    return None;
                }
                self.cursor = Cursor::Month(index + interval);
                (1..=days_in_month(year, month))
                    .map(|d| jiff::civil::date(year, month, d))
                    .filter(|d| self.matches(*d))
                    .collect()
            }
            Cursor::Week(first) => {
                if first > limit {
                    return None;
                }
                self.cursor =
                    checked_add_days(first, 7 * interval).map_or(Cursor::Done, Cursor::Week);
                (0..7)
                    .filter_map(|offset| checked_add_days(first, offset))
                    .filter(|d| self.matches(*d))
                    .collect()
            }
            Cursor::Day(day) => {
                if day > limit {
                    return None;
                }
                self.cursor =
                    checked_add_days(day, interval).map_or(Cursor::Done, Cursor::Day);
                if self.matches(day) { vec![day] } else { Vec::new() }
            }
            Cursor::Done => return None,
        };

        if self.rule.by_set_pos.is_empty() {
            Some(days)
        } else {
            Some(select_positions(&days, &self.rule.by_set_pos))
        }
    }
}

fn select_positions(days: &[Date], positions: &[i16]) -> Vec<Date> {
    let len = days.len() as i16;
    let mut picked: Vec<Date> = positions
        .iter()
        .filter_map(|&pos| {
            let index = if pos > 0 { pos - 1 } else { len + pos };
            (0..len).contains(&index).then(|| days[index as usize])
        })
        .collect();
    picked.sort_unstable();
    picked.dedup();
    picked
}

impl Iterator for Instances<'_> {
    type Item = DateTime;

    fn next(&mut self) -> Option<DateTime> {
        loop {
            if self.rule.count.is_some_and(|count| self.emitted >= count) {
                return None;
            }
            if let Some(dt) = self.pending.pop_front() {
                if dt < self.dtstart {
                    continue;
                }
                if dt > self.limit {
                    self.exhausted = true;
                    self.pending.clear();
                    return None;
                }
                self.emitted += 1;
                return Some(dt);
            }
            if self.exhausted {
                return None;
            }
            match self.next_period() {
                Some(days) => {
                    let time = self.time;
                    self.pending
                        .extend(days.into_iter().map(|d| d.to_datetime(time)));
                }
                None => {
                    self.exhausted = true;
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::rrule::RecurrenceRule;
    use jiff::civil::{DateTime, date, datetime};
    use jiff::tz::TimeZone;

    fn expand(rule: &str, start: DateTime, end: DateTime) -> Vec<DateTime> {
        let rule: RecurrenceRule = rule.parse().unwrap();
        rule.instances(start, end, &TimeZone::UTC).collect()
    }

    fn dates(instances: &[DateTime]) -> Vec<jiff::civil::Date> {
        instances.iter().map(|dt| dt.date()).collect()
    }

    #[test]
    fn monthly_keeps_start_day_and_time() {
        let got = expand(
            "FREQ=MONTHLY;COUNT=3",
            datetime(2025, 1, 15, 9, 30, 0, 0),
            datetime(2030, 1, 1, 0, 0, 0, 0),
        );
        assert_eq!(
            got,
            vec![
                datetime(2025, 1, 15, 9, 30, 0, 0),
                datetime(2025, 2, 15, 9, 30, 0, 0),
                datetime(2025, 3, 15, 9, 30, 0, 0),
            ]
        );
    }

    #[test]
    fn monthly_on_31st_skips_short_months() {
        let got = expand(
            "FREQ=MONTHLY",
            datetime(2025, 1, 31, 0, 0, 0, 0),
            datetime(2025, 6, 30, 0, 0, 0, 0),
        );
        assert_eq!(
            dates(&got),
            vec![date(2025, 1, 31), date(2025, 3, 31), date(2025, 5, 31)]
        );
    }

    #[test]
    fn last_day_of_month_via_negative_month_day() {
        let got = expand(
            "FREQ=MONTHLY;BYMONTHDAY=-1;COUNT=3",
            datetime(2024, 1, 10, 0, 0, 0, 0),
            datetime(2030, 1, 1, 0, 0, 0, 0),
        );
        assert_eq!(
            dates(&got),
            vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]
        );
    }

    #[test]
    fn weekly_by_day_with_interval() {
        // 2025-06-02 is a Monday
        let got = expand(
            "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,TH;COUNT=4",
            datetime(2025, 6, 2, 8, 0, 0, 0),
            datetime(2030, 1, 1, 0, 0, 0, 0),
        );
        assert_eq!(
            dates(&got),
            vec![
                date(2025, 6, 2),
                date(2025, 6, 5),
                date(2025, 6, 16),
                date(2025, 6, 19)
            ]
        );
    }

    #[test]
    fn weekly_defaults_to_start_weekday_and_skips_days_before_start() {
        // Starts on a Wednesday; the Monday of that week is before the start
        let got = expand(
            "FREQ=WEEKLY;BYDAY=MO,WE",
            datetime(2025, 6, 18, 0, 0, 0, 0),
            datetime(2025, 6, 30, 0, 0, 0, 0),
        );
        assert_eq!(
            dates(&got),
            vec![date(2025, 6, 18), date(2025, 6, 23), date(2025, 6, 25), date(2025, 6, 30)]
        );

        let plain = expand(
            "FREQ=WEEKLY",
            datetime(2025, 6, 18, 0, 0, 0, 0),
            datetime(2025, 7, 2, 0, 0, 0, 0),
        );
        assert_eq!(
            dates(&plain),
            vec![date(2025, 6, 18), date(2025, 6, 25), date(2025, 7, 2)]
        );
    }

    #[test]
    fn start_not_matching_rule_is_not_emitted() {
        // Start on a Wednesday, rule only selects Fridays
        let got = expand(
            "FREQ=WEEKLY;BYDAY=FR;COUNT=2",
            datetime(2025, 6, 18, 0, 0, 0, 0),
            datetime(2030, 1, 1, 0, 0, 0, 0),
        );
        assert_eq!(dates(&got), vec![date(2025, 6, 20), date(2025, 6, 27)]);
    }

    #[test]
    fn monthly_last_friday() {
        let got = expand(
            "FREQ=MONTHLY;BYDAY=-1FR;COUNT=3",
            datetime(2025, 1, 1, 0, 0, 0, 0),
            datetime(2030, 1, 1, 0, 0, 0, 0),
        );
        assert_eq!(
            dates(&got),
            vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 28)]
        );
    }

    #[test]
    fn last_business_day_via_set_pos() {
        let got = expand(
            "FREQ=MONTHLY;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-1;COUNT=3",
            datetime(2025, 5, 1, 0, 0, 0, 0),
            datetime(2030, 1, 1, 0, 0, 0, 0),
        );
        // May 31 2025 is a Saturday
        assert_eq!(
            dates(&got),
            vec![date(2025, 5, 30), date(2025, 6, 30), date(2025, 7, 31)]
        );
    }

    #[test]
    fn yearly_on_leap_day_only_hits_leap_years() {
        let got = expand(
            "FREQ=YEARLY",
            datetime(2024, 2, 29, 0, 0, 0, 0),
            datetime(2032, 12, 31, 0, 0, 0, 0),
        );
        assert_eq!(
            dates(&got),
            vec![date(2024, 2, 29), date(2028, 2, 29), date(2032, 2, 29)]
        );
    }

    #[test]
    fn yearly_ordinal_counts_within_year_or_month() {
        // First Monday of the year
        let whole_year = expand(
            "FREQ=YEARLY;BYDAY=1MO;COUNT=2",
            datetime(2025, 1, 1, 0, 0, 0, 0),
            datetime(2030, 1, 1, 0, 0, 0, 0),
        );
        assert_eq!(dates(&whole_year), vec![date(2025, 1, 6), date(2026, 1, 5)]);

        // US Thanksgiving: fourth Thursday of November
        let november = expand(
            "FREQ=YEARLY;BYMONTH=11;BYDAY=4TH;COUNT=2",
            datetime(2025, 1, 1, 0, 0, 0, 0),
            datetime(2030, 1, 1, 0, 0, 0, 0),
        );
        assert_eq!(dates(&november), vec![date(2025, 11, 27), date(2026, 11, 26)]);
    }

    #[test]
    fn daily_with_by_month_filter() {
        let got = expand(
            "FREQ=DAILY;INTERVAL=10;BYMONTH=2",
            datetime(2025, 1, 1, 0, 0, 0, 0),
            datetime(2025, 3, 31, 0, 0, 0, 0),
        );
        assert_eq!(dates(&got), vec![date(2025, 2, 10), date(2025, 2, 20)]);
    }

    #[test]
    fn until_and_window_end_are_inclusive() {
        let until = expand(
            "FREQ=DAILY;UNTIL=20250103T090000",
            datetime(2025, 1, 1, 9, 0, 0, 0),
            datetime(2030, 1, 1, 0, 0, 0, 0),
        );
        assert_eq!(until.len(), 3);

        // A date-only UNTIL is midnight, so a 09:00 instance that day is out
        let date_only = expand(
            "FREQ=DAILY;UNTIL=20250103",
            datetime(2025, 1, 1, 9, 0, 0, 0),
            datetime(2030, 1, 1, 0, 0, 0, 0),
        );
        assert_eq!(date_only.len(), 2);

        let window = expand(
            "FREQ=DAILY",
            datetime(2025, 1, 1, 9, 0, 0, 0),
            datetime(2025, 1, 3, 9, 0, 0, 0),
        );
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn utc_until_is_read_in_projection_zone() {
        let rule: RecurrenceRule = "FREQ=DAILY;UNTIL=20250103T120000Z".parse().unwrap();
        let tz = TimeZone::fixed(jiff::tz::offset(-5));
        // 12:00Z is 07:00 at -05:00, so the 09:00 local instance on the 3rd is excluded
        let got: Vec<_> = rule
            .instances(
                datetime(2025, 1, 1, 9, 0, 0, 0),
                datetime(2030, 1, 1, 0, 0, 0, 0),
                &tz,
            )
            .collect();
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn impossible_rule_terminates() {
        let got = expand(
            "FREQ=YEARLY;BYMONTH=2;BYMONTHDAY=30",
            datetime(2025, 1, 1, 0, 0, 0, 0),
            datetime(2045, 1, 1, 0, 0, 0, 0),
        );
        assert!(got.is_empty());
    }

    #[test]
    fn instances_are_strictly_ascending() {
        let got = expand(
            "FREQ=YEARLY;BYMONTH=1,6,12;BYMONTHDAY=1,15,-1",
            datetime(2025, 1, 1, 0, 0, 0, 0),
            datetime(2027, 12, 31, 0, 0, 0, 0),
        );
        assert_eq!(got.len(), 27);
        assert!(got.windows(2).all(|w| w[0] < w[1]));
    }
}
