use chrono::NaiveTime;
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::model::standard_time::StandardTimeWindow;

/// Portion of the day a report is drawn for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display, AsRefStr, Serialize, ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Morning,
    Evening,
    #[default]
    FullDay,
}

impl Slot {
    /// Unknown or empty names fall back to the full day.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

/// Inclusive same-day window an entry must fall inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Bounds {
    pub fn contains(&self, t: NaiveTime) -> bool {
        self.start <= t && t <= self.end
    }
}

/// Morning tolerates matches until the afternoon closes; evening opens
/// with the afternoon.
pub fn resolve(slot: Slot, window: &StandardTimeWindow) -> Bounds {
    let (start, end) = match slot {
        Slot::Morning => (window.morning_start, window.afternoon_end),
        Slot::Evening => (window.afternoon_start, window.evening_end),
        Slot::FullDay => (window.morning_start, window.evening_end),
    };
    Bounds { start, end }
}
