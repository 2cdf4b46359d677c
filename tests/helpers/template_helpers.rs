#![allow(dead_code)]
use quire::domain::entities::{Template, TemplatePayload, Workspace};
use quire::domain::ports::template_repository::TemplateRepository;
use quire::domain::ports::workspace_repository::WorkspaceRepository;
use quire::infrastructure::persistence::Database;

/// Create a workspace with a fixed id
pub async fn create_test_workspace(db: &Database, id: i64, name: &str) -> Workspace {
    db.create_workspace_with_id(id, name)
        .await
        .expect("Failed to create test workspace")
}

/// Insert a template directly, bypassing validation and normalisation
pub async fn create_test_template(
    db: &Database,
    workspace_id: i64,
    name: &str,
    content: &str,
) -> Template {
    let payload = TemplatePayload {
        name: name.to_string(),
        content: content.to_string(),
    };
    db.store_template(workspace_id, &payload)
        .await
        .expect("Failed to create test template")
}

/// Reference a template from a campaign, which marks it as in use
pub async fn create_test_campaign(db: &Database, workspace_id: i64, template_id: i64) {
    let now = chrono::Utc::now().to_rfc3339();
    sqlx::query(
        "INSERT INTO campaigns (workspace_id, template_id, name, status, created_at, updated_at)
         VALUES (?, ?, ?, 'sent', ?, ?)",
    )
    .bind(workspace_id)
    .bind(template_id)
    .bind(format!("Campaign for template {}", template_id))
    .bind(&now)
    .bind(&now)
    .execute(db.pool())
    .await
    .expect("Failed to create test campaign");
}
