use crate::error::{ContribError, Result};
use crate::model::LogFilter;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::time::Duration;

const GIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S +0000";

/// Build a git log filter from user supplied `--since` / `--until` values.
pub fn resolve_filter(
    since: Option<&str>,
    until: Option<&str>,
    now: DateTime<Utc>,
) -> Result<LogFilter> {
    let since_dt = since.map(|s| parse_date(s, now)).transpose()?;
    let until_dt = until.map(|u| parse_date(u, now)).transpose()?;

    if let (Some(s), Some(u)) = (since_dt, until_dt) {
        if s > u {
            return Err(ContribError::InvalidDate(format!(
                "Invalid range: since ({}) is after until ({})",
                s, u
            )));
        }
    }

    let mut filter = LogFilter::new();
    if let Some(s) = since_dt {
        filter = filter.with_since(s.format(GIT_DATE_FORMAT).to_string());
    }
    if let Some(u) = until_dt {
        filter = filter.with_until(u.format(GIT_DATE_FORMAT).to_string());
    }
    Ok(filter)
}

pub fn parse_date(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&datetime));
        }
    }

    let duration = parse_natural_duration(input).or_else(|| humantime::parse_duration(input).ok());
    if let Some(duration) = duration {
        let delta = chrono::Duration::from_std(duration)
            .map_err(|_| ContribError::InvalidDate(format!("Duration overflow for '{input}'")))?;
        return now
            .checked_sub_signed(delta)
            .ok_or_else(|| ContribError::InvalidDate(format!("Duration overflow for '{input}'")));
    }

    Err(ContribError::InvalidDate(format!(
        "'{input}' is not a date (YYYY-MM-DD, RFC3339, '3 weeks ago' or '90days')"
    )))
}

fn parse_natural_duration(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();
    let rest = input.strip_suffix(" ago")?;
    let (count, unit) = rest.trim().split_once(' ')?;
    let n = count.trim().parse::<u64>().ok()?;

    let days_per_unit: u64 = match unit.trim().trim_end_matches('s') {
        "day" => 1,
        "week" => 7,
        "month" => 30,
        "year" => 365,
        _ => return None,
    };
    let secs = n.checked_mul(days_per_unit)?.checked_mul(86400)?;
    Some(Duration::from_secs(secs))
}
