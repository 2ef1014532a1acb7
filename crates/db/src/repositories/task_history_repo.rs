//! Read access to the append-only `task_histories` audit log.
//!
//! History rows are written exclusively by the lifecycle transactions in
//! [`TaskRepo`](crate::repositories::TaskRepo); this repository only reads.

use agrihub_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::TaskHistory;

/// Column list for `task_histories` queries.
const COLUMNS: &str = "id, task_id, farmer_id, status, comment, created_at";

/// Read-only access to task history.
pub struct TaskHistoryRepo;

impl TaskHistoryRepo {
    /// All history rows for a task, oldest first.
    pub async fn list_for_task(
        pool: &PgPool,
        task_id: DbId,
    ) -> Result<Vec<TaskHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM task_histories \
             WHERE task_id = $1 \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, TaskHistory>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }
}
