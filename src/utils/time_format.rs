use crate::model::attendance::{NOT_RECORDED, parse_clock};

/// `"13:05"` → `"01:05 PM"`. The not-recorded marker passes through.
pub fn to_12_hour(raw: &str) -> Result<String, chrono::ParseError> {
    if raw.trim() == NOT_RECORDED {
        return Ok(NOT_RECORDED.to_string());
    }
    Ok(parse_clock(raw)?.format("%I:%M %p").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_afternoon_and_midnight() {
        assert_eq!(to_12_hour("13:05").unwrap(), "01:05 PM");
        assert_eq!(to_12_hour("00:30").unwrap(), "12:30 AM");
        assert_eq!(to_12_hour("12:00:00").unwrap(), "12:00 PM");
        assert_eq!(to_12_hour("09:15").unwrap(), "09:15 AM");
    }

    #[test]
    fn leaves_sentinel_alone() {
        assert_eq!(to_12_hour("25:00").unwrap(), "25:00");
    }

    #[test]
    fn rejects_malformed() {
        assert!(to_12_hour("noon").is_err());
    }
}
