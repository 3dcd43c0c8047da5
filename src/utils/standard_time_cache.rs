use anyhow::Result;
use futures::StreamExt;
use moka::future::Cache;
use sqlx::MySqlPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::attendance::AttendanceStore;
use crate::error::StoreError;
use crate::model::standard_time::{StandardTimeRow, StandardTimeWindow};

#[derive(sqlx::FromRow)]
struct OrgTimeRow {
    user_id: String,
    #[sqlx(flatten)]
    times: StandardTimeRow,
}

/// Organization windows in front of the `times` table. Reports for one
/// organization hit the same row over and over, so it is kept for `ttl`.
#[derive(Clone)]
pub struct StandardTimeCache {
    windows: Cache<String, StandardTimeWindow>,
}

impl StandardTimeCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            windows: Cache::builder()
                .max_capacity(50_000)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Concurrent misses for the same organization share one store query.
    /// Errors are handed to every waiter and nothing is cached for them.
    pub async fn get_or_fetch<S>(
        &self,
        store: &S,
        org_id: &str,
    ) -> Result<StandardTimeWindow, Arc<StoreError>>
    where
        S: AttendanceStore + ?Sized,
    {
        self.windows
            .try_get_with(org_id.to_string(), store.query_standard_time(org_id))
            .await
    }

    async fn insert_batch(&self, batch: &[(String, StandardTimeWindow)]) {
        let futures: Vec<_> = batch
            .iter()
            .map(|(org_id, window)| self.windows.insert(org_id.clone(), *window))
            .collect();

        futures::future::join_all(futures).await;
    }

    /// Loads every organization's window, streaming and batching the rows.
    /// Rows with unparsable times are skipped and fetched (and rejected)
    /// again on demand.
    pub async fn warmup(&self, pool: &MySqlPool, batch_size: usize) -> Result<()> {
        let mut stream = sqlx::query_as::<_, OrgTimeRow>(
            r#"
            SELECT user_id, morning_start, morning_end, afternoon_start, afternoon_end, evening_start, evening_end
            FROM times
            "#,
        )
        .fetch(pool);

        let mut batch = Vec::with_capacity(batch_size);
        let mut total = 0usize;
        let mut skipped = 0usize;

        while let Some(row) = stream.next().await {
            let OrgTimeRow { user_id, times } = row?;
            match StandardTimeWindow::try_from(times) {
                Ok(window) => {
                    batch.push((user_id, window));
                    total += 1;
                }
                Err(e) => {
                    warn!(org_id = %user_id, error = %e, "Skipping standard time row");
                    skipped += 1;
                }
            }

            if batch.len() >= batch_size {
                self.insert_batch(&batch).await;
                batch.clear();
            }
        }

        if !batch.is_empty() {
            self.insert_batch(&batch).await;
        }

        info!(total, skipped, "Standard time cache warmup complete");
        Ok(())
    }
}
