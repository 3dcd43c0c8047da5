//! Enrollment and removal against a live MySQL server.
//!
//! Run with `cargo test -- --ignored` and `DATABASE_URL` pointing at a
//! scratch database. Every table is a TEMPORARY shadow on a single pooled
//! connection, so nothing persists.

use actix_web::web::{self, Data};
use actix_web::{App, test};
use serde_json::json;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

use attendance_server::api::student::{create_student, delete_student};

// ============================================================================
// Helpers
// ============================================================================

async fn scratch_pool() -> MySqlPool {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = MySqlPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("connect");

    for ddl in [
        r#"CREATE TEMPORARY TABLE students (
            student_id VARCHAR(64) NOT NULL,
            student_unit_id VARCHAR(64) NOT NULL,
            unit_id VARCHAR(64) NOT NULL,
            student_name VARCHAR(128) NOT NULL,
            student_usn VARCHAR(64) NOT NULL,
            department VARCHAR(64) NOT NULL
        )"#,
        r#"CREATE TEMPORARY TABLE fingerprintdata (
            student_id VARCHAR(64) NOT NULL,
            student_unit_id VARCHAR(64) NOT NULL,
            unit_id VARCHAR(64) NOT NULL,
            fingerprint TEXT NOT NULL
        )"#,
        r#"CREATE TEMPORARY TABLE inserts (
            unit_id VARCHAR(64) NOT NULL,
            student_unit_id VARCHAR(64) NOT NULL,
            fingerprint_data TEXT NOT NULL
        )"#,
        r#"CREATE TEMPORARY TABLE deletes (
            unit_id VARCHAR(64) NOT NULL,
            student_unit_id VARCHAR(64) NOT NULL
        )"#,
    ] {
        sqlx::query(ddl).execute(&pool).await.expect("create table");
    }

    pool
}

fn enrollment(student_id: &str, slot: &str) -> serde_json::Value {
    json!({
        "student_id": student_id,
        "student_unit_id": slot,
        "student_name": "Asha Rao",
        "student_usn": "1VS21CS001",
        "department": "CSE",
        "fingerprint_data": "AAECAwQFBgc="
    })
}

// ============================================================================
// Removal
// ============================================================================

#[actix_web::test]
#[ignore = "needs a MySQL database at DATABASE_URL"]
async fn delete_journals_the_stored_slot() {
    let pool = scratch_pool().await;
    let app = test::init_service(
        App::new()
            .app_data(Data::new(pool.clone()))
            .route("/units/{unit_id}/students", web::post().to(create_student))
            .route(
                "/units/{unit_id}/students/{student_id}",
                web::delete().to(delete_student),
            ),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/units/lab_a/students")
        .set_json(enrollment("STU-1", "17"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    // A stray query string must not influence what gets journaled
    let req = test::TestRequest::delete()
        .uri("/units/lab_a/students/STU-1?student_unit_id=99")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let deleted: Vec<(String, String)> =
        sqlx::query_as("SELECT unit_id, student_unit_id FROM deletes")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(deleted, vec![("lab_a".to_string(), "17".to_string())]);

    let pending_inserts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inserts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(pending_inserts, 0);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[actix_web::test]
#[ignore = "needs a MySQL database at DATABASE_URL"]
async fn delete_of_unknown_student_journals_nothing() {
    let pool = scratch_pool().await;
    let app = test::init_service(
        App::new().app_data(Data::new(pool.clone())).route(
            "/units/{unit_id}/students/{student_id}",
            web::delete().to(delete_student),
        ),
    )
    .await;

    let req = test::TestRequest::delete()
        .uri("/units/lab_a/students/ghost")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let journaled: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM deletes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(journaled, 0);
}
