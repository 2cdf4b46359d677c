use crate::domain::entities::Workspace;
use crate::domain::ports::workspace_repository::WorkspaceRepository;
use crate::infrastructure::http::middleware::error::ApiResult;
use crate::infrastructure::persistence::Database;
use sqlx::{any::AnyRow, Row};

fn workspace_from_row(row: &AnyRow) -> Result<Workspace, sqlx::Error> {
    Ok(Workspace {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait::async_trait]
impl WorkspaceRepository for Database {
    async fn get_workspace_by_id(&self, id: i64) -> ApiResult<Option<Workspace>> {
        let row = sqlx::query(
            "SELECT id, name, created_at, updated_at
             FROM workspaces
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(workspace_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn create_workspace_with_id(&self, id: i64, name: &str) -> ApiResult<Workspace> {
        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO workspaces (id, name, created_at, updated_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(name)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::info!("Workspace created: id={}, name={}", id, name);
        Ok(Workspace {
            id,
            name: name.to_string(),
            created_at: now.clone(),
            updated_at: now,
        })
    }
}
