use chrono::{DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, Offset, TimeZone, Utc};

use crate::database::models::BudgetPeriod;

/// Pins the calendar in which budget windows start.
///
/// Monthly windows open at local midnight on the 1st, weekly windows at local midnight
/// on the most recent Sunday. The offset comes from configuration instead of the host
/// clock so the same instant always yields the same window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodAnchor {
    offset: FixedOffset,
}

impl Default for PeriodAnchor {
    fn default() -> Self {
        Self::utc()
    }
}

impl PeriodAnchor {
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// `None` when the offset is a day or more.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(|offset| Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Inclusive start of the window containing `now`.
    pub fn window_start(&self, period: BudgetPeriod, now: DateTime<Utc>) -> DateTime<Utc> {
        let local = now.with_timezone(&self.offset).date_naive();
        let start_day = match period {
            BudgetPeriod::Monthly => local.with_day(1).unwrap_or(local),
            BudgetPeriod::Weekly => {
                local - Duration::days(i64::from(local.weekday().num_days_from_sunday()))
            }
        };
        self.local_midnight(start_day).unwrap_or(now)
    }

    fn local_midnight(&self, day: NaiveDate) -> Option<DateTime<Utc>> {
        let midnight = day.and_hms_opt(0, 0, 0)?;
        self.offset
            .from_local_datetime(&midnight)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// UTC midnight on the 1st of the month `months - 1` months before `now`'s month,
/// so that the range through `now` spans `months` calendar months.
pub fn trailing_months_start(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    let first = now.date_naive().with_day(1).unwrap_or(now.date_naive());
    let start = first
        .checked_sub_months(Months::new(months.saturating_sub(1)))
        .unwrap_or(first);
    start
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or(now)
}

/// `(year, month)` bucket key in UTC.
pub fn month_key(at: DateTime<Utc>) -> (i32, u32) {
    (at.year(), at.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn monthly_window_opens_on_the_first() {
        let anchor = PeriodAnchor::utc();
        let start = anchor.window_start(BudgetPeriod::Monthly, at("2026-03-17T15:04:05Z"));
        assert_eq!(start, at("2026-03-01T00:00:00Z"));
    }

    #[test]
    fn weekly_window_opens_on_sunday() {
        let anchor = PeriodAnchor::utc();
        // 2026-03-18 is a Wednesday
        let start = anchor.window_start(BudgetPeriod::Weekly, at("2026-03-18T10:00:00Z"));
        assert_eq!(start, at("2026-03-15T00:00:00Z"));

        let sunday = anchor.window_start(BudgetPeriod::Weekly, at("2026-03-15T23:59:59Z"));
        assert_eq!(sunday, at("2026-03-15T00:00:00Z"));
    }

    #[test]
    fn offset_shifts_the_local_calendar() {
        // 2026-04-01T02:00Z is still March 31st at UTC-05:00
        let anchor = PeriodAnchor::from_offset_minutes(-300).unwrap();
        let start = anchor.window_start(BudgetPeriod::Monthly, at("2026-04-01T02:00:00Z"));
        assert_eq!(start, at("2026-03-01T05:00:00Z"));

        let ist = PeriodAnchor::from_offset_minutes(330).unwrap();
        let start = ist.window_start(BudgetPeriod::Monthly, at("2026-03-31T20:00:00Z"));
        assert_eq!(start, at("2026-03-31T18:30:00Z"));
    }

    #[test]
    fn rejects_offsets_of_a_day_or_more() {
        assert!(PeriodAnchor::from_offset_minutes(24 * 60).is_none());
        assert!(PeriodAnchor::from_offset_minutes(-24 * 60).is_none());
    }

    #[test]
    fn trailing_window_spans_twelve_calendar_months() {
        let start = trailing_months_start(at("2026-10-19T08:00:00Z"), 12);
        assert_eq!(start, at("2025-11-01T00:00:00Z"));

        let start = trailing_months_start(at("2026-01-31T08:00:00Z"), 12);
        assert_eq!(start, at("2025-02-01T00:00:00Z"));
    }
}
