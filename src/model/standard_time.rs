use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::StoreError;
use crate::model::attendance::parse_clock;

/// Row of the `times` table, exactly as stored.
#[derive(Debug, sqlx::FromRow)]
pub struct StandardTimeRow {
    pub morning_start: String,
    pub morning_end: String,
    pub afternoon_start: String,
    pub afternoon_end: String,
    pub evening_start: String,
    pub evening_end: String,
}

/// Organization-wide boundaries for the three periods of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StandardTimeWindow {
    #[schema(example = "09:00", value_type = String)]
    pub morning_start: NaiveTime,
    #[schema(example = "12:00", value_type = String)]
    pub morning_end: NaiveTime,
    #[schema(example = "13:00", value_type = String)]
    pub afternoon_start: NaiveTime,
    #[schema(example = "17:00", value_type = String)]
    pub afternoon_end: NaiveTime,
    #[schema(example = "17:30", value_type = String)]
    pub evening_start: NaiveTime,
    #[schema(example = "20:00", value_type = String)]
    pub evening_end: NaiveTime,
}

impl TryFrom<StandardTimeRow> for StandardTimeWindow {
    type Error = StoreError;

    fn try_from(row: StandardTimeRow) -> Result<Self, Self::Error> {
        fn parse(field: &'static str, value: &str) -> Result<NaiveTime, StoreError> {
            parse_clock(value).map_err(|_| StoreError::MalformedTime {
                field,
                value: value.trim().to_string(),
            })
        }

        Ok(Self {
            morning_start: parse("morning_start", &row.morning_start)?,
            morning_end: parse("morning_end", &row.morning_end)?,
            afternoon_start: parse("afternoon_start", &row.afternoon_start)?,
            afternoon_end: parse("afternoon_end", &row.afternoon_end)?,
            evening_start: parse("evening_start", &row.evening_start)?,
            evening_end: parse("evening_end", &row.evening_end)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(morning_start: &str) -> StandardTimeRow {
        StandardTimeRow {
            morning_start: morning_start.into(),
            morning_end: "12:00".into(),
            afternoon_start: "13:00".into(),
            afternoon_end: "17:00:00".into(),
            evening_start: "17:30".into(),
            evening_end: "20:00".into(),
        }
    }

    #[test]
    fn converts_stored_row() {
        let window = StandardTimeWindow::try_from(row("09:00")).unwrap();
        assert_eq!(window.morning_start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(window.afternoon_end, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
    }

    #[test]
    fn names_the_malformed_column() {
        let err = StandardTimeWindow::try_from(row("nine")).unwrap_err();
        match err {
            StoreError::MalformedTime { field, value } => {
                assert_eq!(field, "morning_start");
                assert_eq!(value, "nine");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
