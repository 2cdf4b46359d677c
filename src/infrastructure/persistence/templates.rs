use crate::domain::entities::{Template, TemplatePayload};
use crate::domain::ports::template_repository::TemplateRepository;
use crate::infrastructure::http::middleware::error::ApiResult;
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use sqlx::{any::AnyRow, Row};

// `is_in_use` is derived from campaign references, never stored.
const TEMPLATE_COLUMNS: &str = "t.id, t.workspace_id, t.name, t.content, t.created_at, t.updated_at,
     EXISTS (SELECT 1 FROM campaigns c WHERE c.template_id = t.id) AS is_in_use";

fn template_from_row(row: &AnyRow) -> Result<Template, sqlx::Error> {
    // SQLite reports EXISTS as an integer
    let in_use: i64 = row.try_get("is_in_use")?;
    Ok(Template {
        id: row.try_get("id")?,
        workspace_id: row.try_get("workspace_id")?,
        name: row.try_get("name")?,
        content: row.try_get("content")?,
        is_in_use: in_use != 0,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl TemplateRepository for Database {
    async fn paginate_templates(
        &self,
        workspace_id: i64,
        limit: i64,
        offset: i64,
    ) -> ApiResult<(Vec<Template>, i64)> {
        let count_row = sqlx::query("SELECT COUNT(*) as count FROM templates WHERE workspace_id = ?")
            .bind(workspace_id)
            .fetch_one(&self.pool)
            .await?;
        let total_count: i64 = count_row.try_get("count")?;

        let sql = format!(
            "SELECT {} FROM templates t
             WHERE t.workspace_id = ?
             ORDER BY t.name ASC, t.id ASC
             LIMIT ? OFFSET ?",
            TEMPLATE_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(workspace_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let mut templates = Vec::with_capacity(rows.len());
        for row in &rows {
            templates.push(template_from_row(row)?);
        }

        Ok((templates, total_count))
    }

    async fn find_template(&self, workspace_id: i64, id: i64) -> ApiResult<Option<Template>> {
        let sql = format!(
            "SELECT {} FROM templates t WHERE t.workspace_id = ? AND t.id = ?",
            TEMPLATE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(workspace_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(template_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn store_template(
        &self,
        workspace_id: i64,
        payload: &TemplatePayload,
    ) -> ApiResult<Template> {
        let now = chrono::Utc::now().to_rfc3339();
        let row = sqlx::query(
            "INSERT INTO templates (workspace_id, name, content, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(workspace_id)
        .bind(&payload.name)
        .bind(&payload.content)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await?;
        let id: i64 = row.try_get("id")?;

        tracing::info!(
            "Template created: id={}, workspace_id={}, name={}",
            id,
            workspace_id,
            payload.name
        );

        Ok(Template {
            id,
            workspace_id,
            name: payload.name.clone(),
            content: payload.content.clone(),
            is_in_use: false,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    async fn update_template(
        &self,
        workspace_id: i64,
        id: i64,
        payload: &TemplatePayload,
    ) -> ApiResult<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE templates SET name = ?, content = ?, updated_at = ?
             WHERE workspace_id = ? AND id = ?",
        )
        .bind(&payload.name)
        .bind(&payload.content)
        .bind(&now)
        .bind(workspace_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        tracing::info!("Template updated: id={}, workspace_id={}", id, workspace_id);
        Ok(result.rows_affected() > 0)
    }

    async fn destroy_template(&self, workspace_id: i64, id: i64) -> ApiResult<bool> {
        let result = sqlx::query("DELETE FROM templates WHERE workspace_id = ? AND id = ?")
            .bind(workspace_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!("Template deleted: id={}, workspace_id={}", id, workspace_id);
        Ok(result.rows_affected() > 0)
    }

    async fn template_name_exists(
        &self,
        workspace_id: i64,
        name: &str,
        except_id: Option<i64>,
    ) -> ApiResult<bool> {
        let row = match except_id {
            Some(except_id) => {
                sqlx::query(
                    "SELECT COUNT(*) as count FROM templates
                     WHERE workspace_id = ? AND name = ? AND id <> ?",
                )
                .bind(workspace_id)
                .bind(name)
                .bind(except_id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT COUNT(*) as count FROM templates WHERE workspace_id = ? AND name = ?",
                )
                .bind(workspace_id)
                .bind(name)
                .fetch_one(&self.pool)
                .await?
            }
        };
        let count: i64 = row.try_get("count")?;
        Ok(count > 0)
    }
}
