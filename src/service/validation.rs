use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::AppError;

/// Largest amount a single record may carry. Sums of many such values still fit in a
/// `Decimal`, whose range tops out near 7.9e28.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Collects every field violation of a request so they can be reported together.
#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Required amount within `0..=MAX_AMOUNT`; `field` starts every message.
    pub fn amount(&mut self, value: Option<Decimal>, field: &str) -> Option<Decimal> {
        match value {
            None => {
                self.push(format!("{field} is required"));
                None
            }
            Some(v) => self.non_negative(Some(v), field),
        }
    }

    pub fn non_negative(&mut self, value: Option<Decimal>, field: &str) -> Option<Decimal> {
        match value {
            Some(v) if v.is_sign_negative() && !v.is_zero() => {
                self.push(format!("{field} cannot be negative"));
                None
            }
            Some(v) if v > MAX_AMOUNT => {
                self.push(format!("{field} cannot exceed {MAX_AMOUNT}"));
                None
            }
            other => other,
        }
    }

    /// Required member of a closed set.
    pub fn choice<T>(
        &mut self,
        raw: Option<&str>,
        parse: fn(&str) -> Option<T>,
        required: &str,
        invalid: &str,
    ) -> Option<T> {
        match raw.map(str::trim).filter(|r| !r.is_empty()) {
            None => {
                self.push(required);
                None
            }
            Some(raw) => self.optional_choice(Some(raw), parse, invalid),
        }
    }

    pub fn optional_choice<T>(
        &mut self,
        raw: Option<&str>,
        parse: fn(&str) -> Option<T>,
        invalid: &str,
    ) -> Option<T> {
        let raw = raw.map(str::trim).filter(|r| !r.is_empty())?;
        let parsed = parse(raw);
        if parsed.is_none() {
            self.push(invalid);
        }
        parsed
    }

    /// Trimmed free text; blank becomes `None`.
    pub fn text(&mut self, raw: Option<String>, max_chars: usize, too_long: &str) -> Option<String> {
        let text = raw.map(|r| r.trim().to_string()).filter(|r| !r.is_empty())?;
        if text.chars().count() > max_chars {
            self.push(too_long);
        }
        Some(text)
    }

    pub fn timestamp(&mut self, raw: Option<&str>, invalid: &str) -> Option<DateTime<Utc>> {
        let raw = raw.map(str::trim).filter(|r| !r.is_empty())?;
        let parsed = parse_timestamp(raw);
        if parsed.is_none() {
            self.push(invalid);
        }
        parsed
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.0.join(", ")))
        }
    }
}

/// RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` (taken as UTC) or a bare `YYYY-MM-DD` (UTC midnight).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Path ids that do not parse are indistinguishable from ids that do not exist.
pub fn parse_id(raw: &str, resource: &'static str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(resource))
}

/// Query filter value; blank or `all` mean "no filter".
pub fn filter_value(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|r| !r.is_empty() && *r != "all")
}
