use std::ops::RangeInclusive;

use super::{Frequency, RecurrenceRule, Until, WeekdayRule};
use crate::error::RuleError;
use jiff::civil::{Date, Time, Weekday};
use jiff::tz::TimeZone;

const MAX_INTERVAL: i64 = 100_000;

pub(super) fn parse_rule(input: &str) -> Result<RecurrenceRule, RuleError> {
    let text = rule_line(input)?;

    let mut seen: Vec<String> = Vec::new();
    let mut frequency = None;
    let mut rule = RecurrenceRule::new(Frequency::Daily);

    for part in text.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, value) = part
            .split_once('=')
            .ok_or_else(|| RuleError::MalformedPart(part.to_string()))?;
        let name = name.trim().to_ascii_uppercase();
        let value = value.trim().to_ascii_uppercase();

        if seen.contains(&name) {
            return Err(RuleError::DuplicatePart(name));
        }

        match name.as_str() {
            "FREQ" => frequency = Some(parse_frequency(&value)?),
            "INTERVAL" => rule.interval = parse_int(&value, "INTERVAL", 1..=MAX_INTERVAL)? as u32,
            "COUNT" => rule.count = Some(parse_int(&value, "COUNT", 1..=u32::MAX as i64)? as u32),
            "UNTIL" => rule.until = Some(parse_until(&value)?),
            "BYMONTH" => rule.by_month = parse_list(&value, "BYMONTH", 1..=12, false)?,
            "BYMONTHDAY" => rule.by_month_day = parse_list(&value, "BYMONTHDAY", -31..=31, true)?,
            "BYSETPOS" => rule.by_set_pos = parse_list(&value, "BYSETPOS", -366..=366, true)?,
            "BYDAY" => {
                rule.by_day = value
                    .split(',')
                    .map(|item| parse_weekday_rule(item.trim()))
                    .collect::<Result<_, _>>()?;
            }
            "WKST" => {
                rule.week_start = parse_weekday(&value).ok_or_else(|| RuleError::InvalidValue {
                    part: "WKST",
                    value: value.clone(),
                })?;
            }
            "BYYEARDAY" | "BYWEEKNO" | "BYHOUR" | "BYMINUTE" | "BYSECOND" => {
                return Err(RuleError::UnsupportedPart(name.clone()));
            }
            _ => return Err(RuleError::UnknownPart(name.clone())),
        }
        seen.push(name);
    }

    rule.frequency = frequency.ok_or(RuleError::MissingFrequency)?;

    if rule.count.is_some() && rule.until.is_some() {
        return Err(RuleError::CountWithUntil);
    }
    if matches!(rule.frequency, Frequency::Weekly | Frequency::Daily)
        && rule.by_day.iter().any(|d| d.ordinal.is_some())
    {
        return Err(RuleError::OrdinalNotAllowed {
            frequency: rule.frequency.as_str(),
        });
    }
    if rule.frequency == Frequency::Weekly && !rule.by_month_day.is_empty() {
        return Err(RuleError::PartNotAllowed {
            part: "BYMONTHDAY",
            frequency: rule.frequency.as_str(),
        });
    }

    Ok(rule)
}

/// Pick the rule text out of a bare rule, an `RRULE:` line, or a small
/// `DTSTART`/`RRULE` block. DTSTART lines are dropped: the event anchor is
/// always the rule start.
fn rule_line(input: &str) -> Result<&str, RuleError> {
    let mut rule = None;
    for line in input.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if has_prefix(line, "DTSTART") {
            continue;
        }
        if rule.is_some() {
            return Err(RuleError::DuplicatePart("RRULE".to_string()));
        }
        rule = Some(if has_prefix(line, "RRULE:") {
            &line["RRULE:".len()..]
        } else {
            line
        });
    }
    match rule.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(RuleError::Empty),
    }
}

fn has_prefix(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn parse_frequency(value: &str) -> Result<Frequency, RuleError> {
    match value {
        "YEARLY" => Ok(Frequency::Yearly),
        "MONTHLY" => Ok(Frequency::Monthly),
        "WEEKLY" => Ok(Frequency::Weekly),
        "DAILY" => Ok(Frequency::Daily),
        "HOURLY" | "MINUTELY" | "SECONDLY" => Err(RuleError::UnsupportedFrequency(value.into())),
        _ => Err(RuleError::UnknownFrequency(value.into())),
    }
}

fn parse_int(value: &str, part: &'static str, range: RangeInclusive<i64>) -> Result<i64, RuleError> {
    value
        .parse::<i64>()
        .ok()
        .filter(|n| range.contains(n))
        .ok_or_else(|| RuleError::InvalidValue {
            part,
            value: value.to_string(),
        })
}

fn parse_list<T: TryFrom<i64>>(
    value: &str,
    part: &'static str,
    range: RangeInclusive<i64>,
    signed: bool,
) -> Result<Vec<T>, RuleError> {
    value
        .split(',')
        .map(|item| {
            let invalid = || RuleError::InvalidValue {
                part,
                value: item.to_string(),
            };
            let n = parse_int(item.trim(), part, range.clone())?;
            // Signed lists count from either end, so zero selects nothing
            if signed && n == 0 {
                return Err(invalid());
            }
            T::try_from(n).map_err(|_| invalid())
        })
        .collect()
}

fn parse_weekday(code: &str) -> Option<Weekday> {
    match code {
        "MO" => Some(Weekday::Monday),
        "TU" => Some(Weekday::Tuesday),
        "WE" => Some(Weekday::Wednesday),
        "TH" => Some(Weekday::Thursday),
        "FR" => Some(Weekday::Friday),
        "SA" => Some(Weekday::Saturday),
        "SU" => Some(Weekday::Sunday),
        _ => None,
    }
}

fn parse_weekday_rule(item: &str) -> Result<WeekdayRule, RuleError> {
    let invalid = || RuleError::InvalidValue {
        part: "BYDAY",
        value: item.to_string(),
    };

    let split = item.len().checked_sub(2).ok_or_else(invalid)?;
    if !item.is_char_boundary(split) {
        return Err(invalid());
    }
    let (ordinal, code) = item.split_at(split);
    let weekday = parse_weekday(code).ok_or_else(invalid)?;

    if ordinal.is_empty() {
        return Ok(WeekdayRule::every(weekday));
    }
    let n = parse_int(ordinal, "BYDAY", -53..=53).map_err(|_| invalid())?;
    if n == 0 {
        return Err(invalid());
    }
    Ok(WeekdayRule::nth(n as i8, weekday))
}

fn parse_until(value: &str) -> Result<Until, RuleError> {
    let invalid = || RuleError::InvalidValue {
        part: "UNTIL",
        value: value.to_string(),
    };

    let (body, utc) = match value.strip_suffix('Z') {
        Some(body) => (body, true),
        None => (value, false),
    };
    let (date_part, time_part) = match body.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (body, None),
    };

    let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(date_part, 8) {
        return Err(invalid());
    }
    let year: i16 = date_part[0..4].parse().map_err(|_| invalid())?;
    let month: i8 = date_part[4..6].parse().map_err(|_| invalid())?;
    let day: i8 = date_part[6..8].parse().map_err(|_| invalid())?;
    let date = Date::new(year, month, day).map_err(|_| invalid())?;

    let time = match time_part {
        Some(t) if digits(t, 6) => {
            let hour: i8 = t[0..2].parse().map_err(|_| invalid())?;
            let minute: i8 = t[2..4].parse().map_err(|_| invalid())?;
            let second: i8 = t[4..6].parse().map_err(|_| invalid())?;
            Time::new(hour, minute, second, 0).map_err(|_| invalid())?
        }
        Some(_) => return Err(invalid()),
        // A bare date has no UTC form
        None if utc => return Err(invalid()),
        None => Time::midnight(),
    };

    let dt = date.to_datetime(time);
    if utc {
        let ts = TimeZone::UTC.to_timestamp(dt).map_err(|_| invalid())?;
        Ok(Until::Utc(ts))
    } else {
        Ok(Until::Floating(dt))
    }
}
