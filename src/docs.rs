use crate::attendance::Slot;
use crate::model::attendance::StudentLog;
use crate::model::report::{ReportRow, Resolution};
use crate::model::standard_time::StandardTimeWindow;
use crate::model::student::Student;
use crate::models::{CountResponse, CreateStudentReq, ReportResponse, UpdateStudentReq};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biometric Attendance API",
        version = "0.1.0",
        description = r#"
## Biometric Attendance Server

Backs fingerprint scanners grouped into **units**. Scanners record a login
and a logout per visit; this API manages the enrolled students and turns the
raw scans into per-day reports.

### Features
- **Students**
  - Enroll, update, list, count and remove students of a unit
  - Enrollment and removal are journaled for the scanners to sync
- **Logs**
  - A student's full attendance history in 12-hour time
- **Reports**
  - Each student's first scan pair that lies inside the organization's
    standard time for the requested slot (`morning`, `evening` or full day)
  - Students without such a pair are reported as `pending`

### Notes
A logout of `25:00` means the scanner has not seen the student leave yet.

---
Built with **Rust**, **Actix Web**, **SQLx** and **Utoipa**.
"#,
    ),
    paths(
        crate::api::student::create_student,
        crate::api::student::list_students,
        crate::api::student::count_students,
        crate::api::student::update_student,
        crate::api::student::delete_student,
        crate::api::student::student_logs,

        crate::api::report::unit_report,
        crate::api::report::standard_time
    ),
    components(
        schemas(
            Student,
            CreateStudentReq,
            UpdateStudentReq,
            CountResponse,
            StudentLog,
            StandardTimeWindow,
            Slot,
            Resolution,
            ReportRow,
            ReportResponse
        )
    ),
    tags(
        (name = "Student", description = "Student enrollment and logs"),
        (name = "Report", description = "Attendance reconciliation reports"),
    )
)]
pub struct ApiDoc;
