use crate::application::services::TemplateService;
use crate::config::Config;
use crate::domain::ports::template_repository::TemplateRepository;
use crate::domain::ports::workspace_repository::WorkspaceRepository;
use crate::infrastructure::http::middleware::{ApiResult, AppState};
use crate::infrastructure::persistence::Database;
use std::sync::Arc;

pub fn build_app_state(db: Database, config: &Config) -> AppState {
    let template_service = TemplateService::new(
        Arc::new(db.clone()) as Arc<dyn TemplateRepository>,
        config.templates_per_page,
    );
    tracing::info!(
        "Template service initialized ({} per page)",
        config.templates_per_page
    );

    AppState {
        template_service,
        workspace_repo: Arc::new(db) as Arc<dyn WorkspaceRepository>,
        default_workspace_id: config.default_workspace_id,
    }
}

/// Make sure the workspace that unscoped requests fall back to exists
pub async fn initialize_default_workspace(db: &Database, config: &Config) -> ApiResult<()> {
    if let Some(workspace) = db.get_workspace_by_id(config.default_workspace_id).await? {
        tracing::info!(
            "Default workspace already exists: id={}, name={}",
            workspace.id,
            workspace.name
        );
        return Ok(());
    }

    db.create_workspace_with_id(config.default_workspace_id, &config.default_workspace_name)
        .await?;
    tracing::info!(
        "Default workspace created: id={}",
        config.default_workspace_id
    );

    Ok(())
}
