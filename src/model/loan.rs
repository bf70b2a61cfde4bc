use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serializer};

use super::ModelError;

/// Stored layout of `date_issued`: local wall-clock time, minute precision.
pub const ISSUED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Borrower and issue time of a book that is currently out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    pub borrower: String,
    pub issued_at: NaiveDateTime,
}

impl Loan {
    pub fn new(borrower: String, issued_at: NaiveDateTime) -> Self {
        Self {
            borrower,
            issued_at,
        }
    }
}

pub fn format_issued_at(ts: &NaiveDateTime) -> String {
    ts.format(ISSUED_AT_FORMAT).to_string()
}

/// Drops seconds and anything finer, which `date_issued` cannot hold.
pub fn truncate_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_nanosecond(0)
        .and_then(|t| t.with_second(0))
        .unwrap_or(ts)
}

pub fn is_minute_aligned(ts: &NaiveDateTime) -> bool {
    ts.second() == 0 && ts.nanosecond() == 0
}

pub fn parse_issued_at(s: &str) -> Result<NaiveDateTime, ModelError> {
    NaiveDateTime::parse_from_str(s.trim(), ISSUED_AT_FORMAT)
        .map_err(|_| ModelError::InvalidTimestamp(s.to_string()))
}

pub(crate) mod issued_at_serde {
    use super::*;

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&format_issued_at(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| parse_issued_at(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_issued_at_minute_precision() {
        let ts = parse_issued_at("2024-01-01 10:00").unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(ts, expected);
        assert_eq!(format_issued_at(&ts), "2024-01-01 10:00");
    }

    #[test]
    fn test_truncate_to_minute() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_milli_opt(10, 0, 42, 250)
            .unwrap();
        assert!(!is_minute_aligned(&ts));
        let cut = truncate_to_minute(ts);
        assert!(is_minute_aligned(&cut));
        assert_eq!(cut, parse_issued_at("2024-01-01 10:00").unwrap());
    }

    #[test]
    fn test_issued_at_rejects_other_layouts() {
        assert!(matches!(
            parse_issued_at("2024-01-01T10:00:00Z"),
            Err(ModelError::InvalidTimestamp(_))
        ));
    }
}
