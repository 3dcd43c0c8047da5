use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "student_id": "STU-0001",
        "student_unit_id": "17",
        "unit_id": "cse_lab_a",
        "student_name": "Asha Rao",
        "student_usn": "1VS21CS001",
        "department": "CSE"
    })
)]
pub struct Student {
    pub student_id: String,
    /// Slot number of the student on the unit's scanner
    pub student_unit_id: String,
    pub unit_id: String,
    pub student_name: String,
    pub student_usn: String,
    pub department: String,
}
