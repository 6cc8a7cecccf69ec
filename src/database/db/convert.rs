//! Text encodings used for columns SQLite has no native type for.
//!
//! Decimals are stored as their canonical string, timestamps as fixed-width UTC
//! RFC 3339 with millisecond precision so that `<`/`>`/`ORDER BY` on the raw column
//! agree with chronological order.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub fn time_to_db(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn time_from_db(raw: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    NaiveDateTime::parse_from_str(raw, TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| sqlx::Error::Decode(format!("Invalid timestamp {raw:?}: {e}").into()))
}

pub fn decimal_to_db(value: Decimal) -> String {
    value.normalize().to_string()
}

pub fn decimal_from_db(raw: &str) -> Result<Decimal, sqlx::Error> {
    Decimal::from_str(raw)
        .map_err(|e| sqlx::Error::Decode(format!("Invalid Decimal format {raw:?}: {e}").into()))
}

pub fn uuid_from_db(raw: &str) -> Result<Uuid, sqlx::Error> {
    Uuid::parse_str(raw)
        .map_err(|e| sqlx::Error::Decode(format!("Invalid id {raw:?}: {e}").into()))
}

/// Decodes a closed-set column through the enum's own `parse`.
pub fn enum_from_db<T>(raw: &str, parse: fn(&str) -> Option<T>) -> Result<T, sqlx::Error> {
    parse(raw).ok_or_else(|| sqlx::Error::Decode(format!("Unexpected value {raw:?}").into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn timestamps_are_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(time_to_db(whole), "2026-03-01T00:00:00.000Z");
        assert_eq!(time_from_db("2026-03-01T00:00:00.000Z").unwrap(), whole);
    }

    #[test]
    fn text_order_matches_time_order() {
        let a = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let b = a + chrono::Duration::milliseconds(1);
        assert!(time_to_db(a) < time_to_db(b));
    }

    #[test]
    fn decimals_round_trip_without_trailing_zeros() {
        assert_eq!(decimal_to_db(dec!(550.00)), "550");
        assert_eq!(decimal_from_db("12.5").unwrap(), dec!(12.5));
        assert!(decimal_from_db("twelve").is_err());
    }
}
