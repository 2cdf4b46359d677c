use crate::{
    application::services::TemplateService,
    domain::entities::CurrentWorkspace,
    domain::ports::workspace_repository::WorkspaceRepository,
    infrastructure::http::middleware::error::{ApiError, ApiResult},
};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

pub const WORKSPACE_HEADER: &str = "X-Workspace-Id";
pub const WORKSPACE_COOKIE: &str = "workspace_id";

#[derive(Clone)]
pub struct AppState {
    pub template_service: TemplateService,
    pub workspace_repo: Arc<dyn WorkspaceRepository>,
    pub default_workspace_id: i64,
}

/// Pick the workspace id for a request: header, then cookie, then default.
pub fn requested_workspace_id(
    headers: &HeaderMap,
    jar: &CookieJar,
    default_workspace_id: i64,
) -> ApiResult<i64> {
    let raw = headers
        .get(WORKSPACE_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| jar.get(WORKSPACE_COOKIE).map(|c| c.value().to_string()));

    match raw {
        Some(value) => value
            .trim()
            .parse::<i64>()
            .map_err(|_| ApiError::BadRequest(format!("Invalid workspace id: {}", value))),
        None => Ok(default_workspace_id),
    }
}

/// Resolve the current workspace and attach it to the request
pub async fn resolve_workspace(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let workspace_id =
        requested_workspace_id(request.headers(), &jar, state.default_workspace_id)?;

    let workspace = state
        .workspace_repo
        .get_workspace_by_id(workspace_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Workspace {} not found", workspace_id)))?;

    tracing::debug!("Request scoped to workspace {}", workspace.id);
    request
        .extensions_mut()
        .insert(CurrentWorkspace::from(&workspace));

    Ok(next.run(request).await)
}
