use crate::attendance::slot::Bounds;
use crate::model::attendance::TimeMark;

/// True when both times are recorded and inside `bounds`. Anything that
/// does not parse, including the not-recorded marker, is simply no match.
pub fn is_valid(bounds: Bounds, login: &str, logout: &str) -> bool {
    let within = |raw: &str| match TimeMark::parse(raw) {
        Ok(TimeMark::Recorded(t)) => bounds.contains(t),
        Ok(TimeMark::NotRecorded) | Err(_) => false,
    };

    within(login) && within(logout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn bounds() -> Bounds {
        Bounds {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        }
    }

    #[test]
    fn both_on_the_edges() {
        assert!(is_valid(bounds(), "09:00", "17:00"));
        assert!(is_valid(bounds(), "09:00:00", "17:00:00"));
    }

    #[test]
    fn login_or_logout_outside() {
        assert!(!is_valid(bounds(), "08:59", "13:00"));
        assert!(!is_valid(bounds(), "09:30", "17:01"));
        assert!(!is_valid(bounds(), "07:00", "18:00"));
    }

    #[test]
    fn logout_before_login_still_inside() {
        // No ordering between the two is required, only containment.
        assert!(is_valid(bounds(), "15:00", "10:00"));
    }

    #[test]
    fn malformed_or_unrecorded_never_match() {
        assert!(!is_valid(bounds(), "09:05", "25:00"));
        assert!(!is_valid(bounds(), "25:00", "10:00"));
        assert!(!is_valid(bounds(), "nine", "10:00"));
        assert!(!is_valid(bounds(), "09:05", ""));
    }
}
