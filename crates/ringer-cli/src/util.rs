use anyhow::{anyhow, Context as _, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use ringer_config::{validate_matching_window, AppConfig};
use ringer_core::ContactMatchingIndex;
use ringer_sync::VcfFileContacts;
use std::path::Path;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// RFC 3339, or a local `YYYY-MM-DD[ HH:MM[:SS]]`.
pub fn parse_record_date(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("date cannot be empty"));
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(date.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow!("invalid date"))?;
        return local_to_utc(naive);
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return local_to_utc(dt);
        }
    }

    Err(anyhow!(
        "invalid date format: expected RFC 3339, YYYY-MM-DD or YYYY-MM-DD HH:MM"
    ))
}

pub fn format_record_date(date: &DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn resolve_window(flag: Option<i64>, config: &AppConfig) -> Result<usize> {
    match flag {
        Some(value) => Ok(validate_matching_window(value)?),
        None => Ok(config.matching.max_phone_number_length),
    }
}

pub fn load_index(contacts: &Path, window: usize) -> Result<ContactMatchingIndex> {
    ContactMatchingIndex::from_source(&VcfFileContacts::new(contacts), window)
        .with_context(|| format!("load contacts {}", contacts.display()))
}

fn local_to_utc(naive: NaiveDateTime) -> Result<DateTime<Utc>> {
    let local = Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| anyhow!("ambiguous local time: {}", naive))?;
    Ok(local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::{parse_record_date, resolve_window};
    use chrono::{TimeZone, Utc};
    use ringer_config::AppConfig;

    #[test]
    fn parse_record_date_accepts_rfc3339() {
        let date = parse_record_date("2017-03-04T05:06:07+01:00").expect("parse");
        assert_eq!(date, Utc.with_ymd_and_hms(2017, 3, 4, 4, 6, 7).unwrap());
    }

    #[test]
    fn parse_record_date_accepts_local_forms() {
        assert!(parse_record_date("2017-03-04").is_ok());
        assert!(parse_record_date("2017-03-04 05:06").is_ok());
        assert!(parse_record_date("yesterday").is_err());
        assert!(parse_record_date("  ").is_err());
    }

    #[test]
    fn resolve_window_prefers_flag() {
        let config = AppConfig::default();
        assert_eq!(resolve_window(None, &config).expect("default"), 7);
        assert_eq!(resolve_window(Some(9), &config).expect("flag"), 9);
        assert!(resolve_window(Some(0), &config).is_err());
    }
}
