use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Calendar date of `now` in the user's timezone
pub fn local_today(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Unix timestamp of local midnight starting `date`
pub fn start_of_day(date: NaiveDate, tz: Tz) -> i64 {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    // midnight skipped by a DST change: the day starts at the first local time that exists
    (0..=24)
        .map(|minutes| midnight + chrono::Duration::minutes(minutes * 5))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|start| start.timestamp())
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight).timestamp())
}

/// `[start, end)` timestamps of one local day
pub fn day_bounds(date: NaiveDate, tz: Tz) -> (i64, i64) {
    let next = date.succ_opt().unwrap_or(date);
    (start_of_day(date, tz), start_of_day(next, tz))
}

pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| anyhow!("invalid month {}-{}", year, month))
}

/// `[start, end)` timestamps of one local month
pub fn month_bounds(year: i32, month: u32, tz: Tz) -> Result<(i64, i64)> {
    let first = first_of_month(year, month)?;
    let next = first
        .checked_add_months(Months::new(1))
        .ok_or_else(|| anyhow!("month out of range"))?;
    Ok((start_of_day(first, tz), start_of_day(next, tz)))
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Ok(first) = first_of_month(year, month) else {
        return 30;
    };
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next.signed_duration_since(first).num_days() as u32,
        None => 31,
    }
}

/// Same day next month, clamped to the month's last day (31/01 -> 28/02)
pub fn add_one_month(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(1))
}

/// The month before the one containing `today`
pub fn previous_month(today: NaiveDate) -> (i32, u32) {
    if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    }
}

/// Parses `YYYY-MM`
pub fn parse_period(period: &str) -> Result<(i32, u32)> {
    let (year, month) = period
        .split_once('-')
        .ok_or_else(|| anyhow!("period must look like YYYY-MM, got '{}'", period))?;
    let year: i32 = year.parse()?;
    let month: u32 = month.parse()?;
    first_of_month(year, month)?;
    Ok((year, month))
}

pub fn format_period(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| anyhow!("invalid date '{}': {}", date, e))
}

/// `dd/mm` as shown in chat replies
pub fn short_date(date: &str) -> String {
    match parse_date(date) {
        Ok(d) => d.format("%d/%m").to_string(),
        Err(_) => date.to_string(),
    }
}
