use serde::Serialize;
use utoipa::ToSchema;

use crate::model::student::Student;

pub const PENDING: &str = "pending";

/// What reconciliation decided for one student.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Resolution {
    #[default]
    Pending,
    /// The matched row's login/logout, verbatim
    Matched { login: String, logout: String },
}

impl Resolution {
    pub fn login(&self) -> &str {
        match self {
            Resolution::Matched { login, .. } => login,
            Resolution::Pending => PENDING,
        }
    }

    pub fn logout(&self) -> &str {
        match self {
            Resolution::Matched { logout, .. } => logout,
            Resolution::Pending => PENDING,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Resolution::Pending)
    }
}

/// One line of a unit report, keyed by student id in the caller's map.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(example = json!({
    "student_id": "STU-0001",
    "name": "Asha Rao",
    "usn": "1VS21CS001",
    "resolution": { "status": "matched", "login": "09:05", "logout": "13:00" }
}))]
pub struct ReportRow {
    pub student_id: String,
    pub name: String,
    pub usn: String,
    pub resolution: Resolution,
}

impl ReportRow {
    pub fn pending(student_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            name: String::new(),
            usn: String::new(),
            resolution: Resolution::Pending,
        }
    }
}

impl From<Student> for ReportRow {
    fn from(student: Student) -> Self {
        Self {
            student_id: student.student_id,
            name: student.student_name,
            usn: student.student_usn,
            resolution: Resolution::Pending,
        }
    }
}
