use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::attendance::slot::{Bounds, Slot, resolve};
use crate::attendance::store::AttendanceStore;
use crate::attendance::validity::is_valid;
use crate::model::attendance::{AttendanceEntry, TimeMark};
use crate::model::report::{ReportRow, Resolution};
use crate::model::standard_time::StandardTimeWindow;

#[derive(Debug, Clone, Copy)]
pub struct ReconcileOptions {
    /// Upper bound on concurrently running student lookups
    pub max_in_flight: usize,
    /// Deadline for a single student's attendance query
    pub task_timeout: Duration,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            max_in_flight: 32,
            task_timeout: Duration::from_secs(10),
        }
    }
}

/// Resolves every student in `student_ids` for `date`/`slot` and writes the
/// outcome into `results`, inserting rows for ids the map does not hold yet.
///
/// Each student is looked up in its own task. A failed or timed out lookup
/// leaves that student `Pending` without touching anyone else. Returns once
/// every student has an outcome.
pub async fn reconcile<S, I>(
    store: Arc<S>,
    student_ids: I,
    date: NaiveDate,
    slot: Slot,
    window: &StandardTimeWindow,
    results: &mut HashMap<String, ReportRow>,
    options: ReconcileOptions,
) where
    S: AttendanceStore + ?Sized,
    I: IntoIterator<Item = String>,
{
    let bounds = resolve(slot, window);
    let permits = Arc::new(Semaphore::new(options.max_in_flight.max(1)));
    let mut tasks = JoinSet::new();
    let mut batch = 0usize;

    for student_id in student_ids {
        results
            .entry(student_id.clone())
            .or_insert_with(|| ReportRow::pending(student_id.as_str()))
            .resolution = Resolution::Pending;

        let permit = match Arc::clone(&permits).acquire_owned().await {
            Ok(p) => p,
            Err(e) => {
                error!(error = %e, "Reconcile admission closed; remaining students stay pending");
                break;
            }
        };

        let store = Arc::clone(&store);
        batch += 1;
        tasks.spawn(async move {
            let resolution =
                resolve_student(store.as_ref(), &student_id, date, bounds, options.task_timeout)
                    .await;
            drop(permit);
            (student_id, resolution)
        });
    }

    let mut matched = 0usize;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((student_id, resolution)) => {
                if !resolution.is_pending() {
                    matched += 1;
                }
                if let Some(row) = results.get_mut(&student_id) {
                    row.resolution = resolution;
                }
            }
            Err(e) => error!(error = %e, "Reconcile task aborted; student left pending"),
        }
    }

    debug!(%date, %slot, students = batch, matched, "Reconcile batch complete");
}

async fn resolve_student<S>(
    store: &S,
    student_id: &str,
    date: NaiveDate,
    bounds: Bounds,
    deadline: Duration,
) -> Resolution
where
    S: AttendanceStore + ?Sized,
{
    let entries = match tokio::time::timeout(deadline, store.query_attendance(student_id, date)).await
    {
        Ok(Ok(entries)) => entries,
        Ok(Err(e)) => {
            warn!(student_id, %date, error = %e, "Attendance query failed");
            return Resolution::Pending;
        }
        Err(_) => {
            warn!(
                student_id,
                %date,
                timeout_ms = deadline.as_millis() as u64,
                "Attendance query timed out"
            );
            return Resolution::Pending;
        }
    };

    first_match(&entries, bounds)
}

/// First entry in store order whose login and logout both fall inside
/// `bounds`. Entries still waiting for a logout, or with a NULL time, are
/// skipped.
pub fn first_match(entries: &[AttendanceEntry], bounds: Bounds) -> Resolution {
    entries
        .iter()
        .filter(|e| e.logout_mark() != Some(TimeMark::NotRecorded))
        .filter_map(|e| Some((e.login.as_deref()?, e.logout.as_deref()?)))
        .find(|(login, logout)| is_valid(bounds, login, logout))
        .map(|(login, logout)| Resolution::Matched {
            login: login.to_string(),
            logout: logout.to_string(),
        })
        .unwrap_or_default()
}
