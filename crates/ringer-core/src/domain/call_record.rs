use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SIP-style remote party of a call: `user@host`, host possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallAddress {
    pub user: String,
    pub host: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub address: CallAddress,
    pub date: DateTime<Utc>,
    pub duration: i64,
    pub incoming: bool,
    pub missed: bool,
}

impl CallAddress {
    pub fn new(user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
        }
    }

    /// Splits on the last `@`; a value without one is all user part.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CoreError::EmptyCallAddress);
        }
        let address = match trimmed.rsplit_once('@') {
            Some((user, host)) => Self::new(user, host),
            None => Self::new(trimmed, ""),
        };
        if address.user.is_empty() && address.host.is_empty() {
            return Err(CoreError::EmptyCallAddress);
        }
        Ok(address)
    }

    /// Strings an index lookup should try for this party, most specific first.
    pub fn lookup_candidates(&self) -> Vec<String> {
        let mut candidates = Vec::with_capacity(2);
        if !self.host.is_empty() {
            candidates.push(self.to_string());
        }
        if !self.user.is_empty() {
            candidates.push(self.user.clone());
        }
        candidates
    }
}

impl fmt::Display for CallAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.is_empty() {
            f.write_str(&self.user)
        } else {
            write!(f, "{}@{}", self.user, self.host)
        }
    }
}

/// Stand-in date for records stored without one: 0001-01-01T00:00:00Z.
pub fn distant_past() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn parse_splits_on_last_at() {
        let address = CallAddress::parse(" alice@sip@example.com ").expect("parse");
        assert_eq!(address.user, "alice@sip");
        assert_eq!(address.host, "example.com");
    }

    #[test]
    fn parse_without_host_keeps_user() {
        let address = CallAddress::parse("+1 415 555 1212").expect("parse");
        assert_eq!(address.user, "+1 415 555 1212");
        assert_eq!(address.host, "");
        assert_eq!(address.to_string(), "+1 415 555 1212");
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(CallAddress::parse("  "), Err(CoreError::EmptyCallAddress));
        assert_eq!(CallAddress::parse("@"), Err(CoreError::EmptyCallAddress));
    }

    #[test]
    fn lookup_candidates_prefer_full_address() {
        let address = CallAddress::new("foo1", "host");
        assert_eq!(address.lookup_candidates(), vec!["foo1@host", "foo1"]);
        let address = CallAddress::new("5551212", "");
        assert_eq!(address.lookup_candidates(), vec!["5551212"]);
    }

    #[test]
    fn distant_past_is_year_one() {
        let date = distant_past();
        assert_eq!((date.year(), date.month(), date.day()), (1, 1, 1));
    }
}
