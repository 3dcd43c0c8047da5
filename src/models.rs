use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::attendance::Slot;
use crate::model::report::ReportRow;

#[derive(Deserialize, ToSchema)]
pub struct CreateStudentReq {
    #[schema(example = "STU-0001")]
    pub student_id: String,
    #[schema(example = "17")]
    pub student_unit_id: String,
    #[schema(example = "Asha Rao")]
    pub student_name: String,
    #[schema(example = "1VS21CS001")]
    pub student_usn: String,
    #[schema(example = "CSE")]
    pub department: String,
    /// Template captured by the scanner, passed through opaquely
    #[schema(example = "AAECAwQFBgc=")]
    pub fingerprint_data: String,
}

/// Any subset of the editable student fields
#[derive(Deserialize, ToSchema)]
pub struct UpdateStudentReq {
    #[schema(example = "Asha R.")]
    pub student_name: Option<String>,
    #[schema(example = "1VS21CS001")]
    pub student_usn: Option<String>,
    #[schema(example = "ISE")]
    pub department: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CountResponse {
    #[schema(example = 42)]
    pub count: i64,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// Organization whose standard time applies
    pub org_id: String,
    /// Day to report on, `YYYY-MM-DD`
    #[param(value_type = String, format = Date, example = "2026-01-05")]
    pub date: NaiveDate,
    /// `morning`, `evening`; anything else reports the full day
    pub slot: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ReportResponse {
    #[schema(example = "cse_lab_a")]
    pub unit_id: String,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub slot: Slot,
    pub data: Vec<ReportRow>,
}
