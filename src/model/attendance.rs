use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Value scanners write into `login`/`logout` before a scan has happened.
pub const NOT_RECORDED: &str = "25:00";

/// One scanner row as stored. Times are kept verbatim so a match can be
/// reported exactly as it was recorded; a NULL column decodes to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceEntry {
    pub date: NaiveDate,
    pub login: Option<String>,
    pub logout: Option<String>,
}

impl AttendanceEntry {
    pub fn logout_mark(&self) -> Option<TimeMark> {
        self.logout.as_deref().and_then(|raw| TimeMark::parse(raw).ok())
    }
}

/// Parses a same-day clock value in `HH:MM` or `HH:MM:SS` form.
pub fn parse_clock(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M").or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeMark {
    Recorded(NaiveTime),
    NotRecorded,
}

impl TimeMark {
    /// Accepts `HH:MM`, `HH:MM:SS` and the not-recorded marker.
    pub fn parse(raw: &str) -> Result<Self, chrono::ParseError> {
        let raw = raw.trim();
        if raw == NOT_RECORDED {
            return Ok(TimeMark::NotRecorded);
        }

        parse_clock(raw).map(TimeMark::Recorded)
    }
}

/// Attendance row prepared for display. NULL columns stay `null`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentLog {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "09:05 AM", nullable = true)]
    pub login: Option<String>,
    #[schema(example = "25:00", nullable = true)]
    pub logout: Option<String>,
}
