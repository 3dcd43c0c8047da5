use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;
use tracing::debug;

use crate::error::StoreError;
use crate::model::attendance::AttendanceEntry;
use crate::model::standard_time::{StandardTimeRow, StandardTimeWindow};
use crate::model::student::Student;

/// Lookups the reconciliation engine needs. Implementations carry no policy.
#[async_trait]
pub trait AttendanceStore: Send + Sync + 'static {
    /// Every row recorded for the student on `date`, in store order.
    async fn query_attendance(
        &self,
        student_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceEntry>, StoreError>;

    async fn query_standard_time(&self, org_id: &str) -> Result<StandardTimeWindow, StoreError>;

    /// Students of a unit ordered by name.
    async fn roster(&self, unit_id: &str) -> Result<Vec<Student>, StoreError>;
}

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn query_attendance(
        &self,
        student_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceEntry>, StoreError> {
        // fetch_all drains and releases the cursor before returning; NULL
        // login/logout columns decode to None rather than failing the batch
        let entries = sqlx::query_as::<_, AttendanceEntry>(
            r#"
            SELECT date, login, logout
            FROM attendance
            WHERE date = ? AND student_id = ?
            "#,
        )
        .bind(date)
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(student_id, %date, rows = entries.len(), "Fetched attendance rows");
        Ok(entries)
    }

    async fn query_standard_time(&self, org_id: &str) -> Result<StandardTimeWindow, StoreError> {
        let row = sqlx::query_as::<_, StandardTimeRow>(
            r#"
            SELECT morning_start, morning_end, afternoon_start, afternoon_end, evening_start, evening_end
            FROM times
            WHERE user_id = ?
            "#,
        )
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("standard time for `{org_id}`")))?;

        row.try_into()
    }

    async fn roster(&self, unit_id: &str) -> Result<Vec<Student>, StoreError> {
        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT student_id, student_unit_id, unit_id, student_name, student_usn, department
            FROM students
            WHERE unit_id = ?
            ORDER BY student_name
            "#,
        )
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }
}
