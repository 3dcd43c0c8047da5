use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::{debug, error, info};

use crate::model::attendance::{AttendanceEntry, StudentLog};
use crate::model::student::Student;
use crate::models::{CountResponse, CreateStudentReq, UpdateStudentReq};
use crate::utils::db_utils::{SqlValue, build_update_sql, ensure_identifier, execute_update};
use crate::utils::time_format::to_12_hour;

const EDITABLE_COLUMNS: &[&str] = &["student_name", "student_usn", "department"];

/// Enroll a student on a unit
#[utoipa::path(
    post,
    path = "/api/units/{unit_id}/students",
    params(
        ("unit_id", Path, description = "Unit (scanner group) id")
    ),
    request_body = CreateStudentReq,
    responses(
        (status = 201, description = "Student enrolled", body = Object, example = json!({
            "message": "Student created successfully"
        })),
        (status = 400, description = "Invalid unit id"),
        (status = 409, description = "Scanner slot already taken", body = Object, example = json!({
            "message": "student_unit_id already exists in this unit"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn create_student(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    payload: web::Json<CreateStudentReq>,
) -> actix_web::Result<impl Responder> {
    let unit_id = path.into_inner();
    ensure_identifier(&unit_id)?;

    let taken = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT EXISTS (SELECT 1 FROM students WHERE unit_id = ? AND student_unit_id = ?)
        "#,
    )
    .bind(&unit_id)
    .bind(&payload.student_unit_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, unit_id = %unit_id, "Failed to check student_unit_id");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if taken != 0 {
        return Ok(HttpResponse::Conflict().json(json!({
            "message": "student_unit_id already exists in this unit"
        })));
    }

    insert_student(pool.get_ref(), &unit_id, &payload)
        .await
        .map_err(|e| {
            error!(error = %e, unit_id = %unit_id, student_id = %payload.student_id, "Failed to create student");
            ErrorInternalServerError("Internal Server Error")
        })?;

    info!(unit_id = %unit_id, student_id = %payload.student_id, "Student enrolled");
    Ok(HttpResponse::Created().json(json!({
        "message": "Student created successfully"
    })))
}

/// Fingerprint row, student row and the scanner's insert journal move together.
async fn insert_student(
    pool: &MySqlPool,
    unit_id: &str,
    student: &CreateStudentReq,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO fingerprintdata (student_id, student_unit_id, unit_id, fingerprint)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&student.student_id)
    .bind(&student.student_unit_id)
    .bind(unit_id)
    .bind(&student.fingerprint_data)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO students (student_id, student_unit_id, unit_id, student_name, student_usn, department)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&student.student_id)
    .bind(&student.student_unit_id)
    .bind(unit_id)
    .bind(&student.student_name)
    .bind(&student.student_usn)
    .bind(&student.department)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO inserts (unit_id, student_unit_id, fingerprint_data)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(unit_id)
    .bind(&student.student_unit_id)
    .bind(&student.fingerprint_data)
    .execute(&mut *tx)
    .await?;

    // Dropping `tx` on any early return above rolls back
    tx.commit().await
}

/// List students of a unit
#[utoipa::path(
    get,
    path = "/api/units/{unit_id}/students",
    params(
        ("unit_id", Path, description = "Unit (scanner group) id")
    ),
    responses(
        (status = 200, description = "Students of the unit", body = [Student]),
        (status = 400, description = "Invalid unit id"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn list_students(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let unit_id = path.into_inner();
    ensure_identifier(&unit_id)?;

    let students = sqlx::query_as::<_, Student>(
        r#"
        SELECT student_id, student_unit_id, unit_id, student_name, student_usn, department
        FROM students
        WHERE unit_id = ?
        "#,
    )
    .bind(&unit_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, unit_id = %unit_id, "Failed to list students");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(students))
}

/// Count students of a unit
#[utoipa::path(
    get,
    path = "/api/units/{unit_id}/students/count",
    params(
        ("unit_id", Path, description = "Unit (scanner group) id")
    ),
    responses(
        (status = 200, description = "Number of students", body = CountResponse),
        (status = 400, description = "Invalid unit id"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn count_students(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let unit_id = path.into_inner();
    ensure_identifier(&unit_id)?;

    let count = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM students WHERE unit_id = ?"#)
        .bind(&unit_id)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, unit_id = %unit_id, "Failed to count students");
            ErrorInternalServerError("Database error")
        })?;

    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

/// Update student details
#[utoipa::path(
    put,
    path = "/api/units/{unit_id}/students/{student_id}",
    params(
        ("unit_id", Path, description = "Unit (scanner group) id"),
        ("student_id", Path, description = "Student ID")
    ),
    request_body = UpdateStudentReq,
    responses(
        (status = 200, description = "Student updated successfully", body = Object, example = json!({
            "message": "Student updated successfully"
        })),
        (status = 400, description = "Unknown field or invalid unit id"),
        (status = 404, description = "Student not found", body = Object, example = json!({
            "message": "Student not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn update_student(
    pool: web::Data<MySqlPool>,
    path: web::Path<(String, String)>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let (unit_id, student_id) = path.into_inner();
    ensure_identifier(&unit_id)?;

    let update = build_update_sql(
        "students",
        &body,
        EDITABLE_COLUMNS,
        &[
            ("unit_id", SqlValue::String(unit_id.clone())),
            ("student_id", SqlValue::String(student_id.clone())),
        ],
    )?;
    debug!(sql = %update.sql, "Updating student");

    let affected = execute_update(pool.get_ref(), update).await.map_err(|e| {
        error!(error = %e, unit_id = %unit_id, student_id = %student_id, "Failed to update student");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Student not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Student updated successfully"
    })))
}

/// Remove a student from a unit
#[utoipa::path(
    delete,
    path = "/api/units/{unit_id}/students/{student_id}",
    params(
        ("unit_id", Path, description = "Unit (scanner group) id"),
        ("student_id", Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn delete_student(
    pool: web::Data<MySqlPool>,
    path: web::Path<(String, String)>,
) -> actix_web::Result<impl Responder> {
    let (unit_id, student_id) = path.into_inner();
    ensure_identifier(&unit_id)?;

    let removed = remove_student(pool.get_ref(), &unit_id, &student_id)
        .await
        .map_err(|e| {
            error!(error = %e, unit_id = %unit_id, student_id = %student_id, "Failed to delete student");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if !removed {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Student not found"
        })));
    }

    info!(unit_id = %unit_id, student_id = %student_id, "Student removed");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}

/// Returns `false` (and commits nothing) when the student is not on the unit.
/// The journals get the scanner slot stored on the row being removed.
async fn remove_student(
    pool: &MySqlPool,
    unit_id: &str,
    student_id: &str,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let slot = sqlx::query_scalar::<_, String>(
        r#"
        SELECT student_unit_id FROM students
        WHERE unit_id = ? AND student_id = ?
        FOR UPDATE
        "#,
    )
    .bind(unit_id)
    .bind(student_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(student_unit_id) = slot else {
        tx.rollback().await?;
        return Ok(false);
    };

    sqlx::query(r#"DELETE FROM students WHERE unit_id = ? AND student_id = ?"#)
        .bind(unit_id)
        .bind(student_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query(r#"DELETE FROM fingerprintdata WHERE student_id = ?"#)
        .bind(student_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query(r#"INSERT INTO deletes (unit_id, student_unit_id) VALUES (?, ?)"#)
        .bind(unit_id)
        .bind(&student_unit_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query(r#"DELETE FROM inserts WHERE unit_id = ? AND student_unit_id = ?"#)
        .bind(unit_id)
        .bind(&student_unit_id)
        .execute(&mut *tx)
        .await?;

    debug!(unit_id, student_id, student_unit_id = %student_unit_id, "Scanner slot journaled for removal");
    tx.commit().await?;
    Ok(true)
}

/// Attendance history of a student
#[utoipa::path(
    get,
    path = "/api/students/{student_id}/logs",
    params(
        ("student_id", Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Logs, newest first, in 12-hour time", body = [StudentLog]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn student_logs(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let student_id = path.into_inner();

    let entries = sqlx::query_as::<_, AttendanceEntry>(
        r#"
        SELECT date, login, logout
        FROM attendance
        WHERE student_id = ?
        ORDER BY date DESC
        "#,
    )
    .bind(&student_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, student_id = %student_id, "Failed to fetch student logs");
        ErrorInternalServerError("Database error")
    })?;

    let logs = entries
        .into_iter()
        .map(|entry| {
            Ok(StudentLog {
                date: entry.date,
                login: entry.login.as_deref().map(to_12_hour).transpose()?,
                logout: entry.logout.as_deref().map(to_12_hour).transpose()?,
            })
        })
        .collect::<Result<Vec<_>, chrono::ParseError>>()
        .map_err(|e| {
            error!(error = %e, student_id = %student_id, "Malformed time in attendance log");
            ErrorInternalServerError("Malformed attendance data")
        })?;

    Ok(HttpResponse::Ok().json(logs))
}
