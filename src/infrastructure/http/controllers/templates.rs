use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    domain::entities::{
        CurrentWorkspace, TemplateListResponse, TemplateRequest, TemplateResponse,
    },
    infrastructure::http::middleware::{ApiResult, AppState},
};

#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// GET /api/templates - List the workspace's templates
pub async fn list_templates(
    State(state): State<AppState>,
    Extension(workspace): Extension<CurrentWorkspace>,
    Query(params): Query<PaginationQuery>,
) -> ApiResult<Json<TemplateListResponse>> {
    let page = state
        .template_service
        .list_templates(workspace.id, params.page, params.per_page)
        .await?;

    let pagination = page.metadata();
    Ok(Json(TemplateListResponse {
        templates: page.items.into_iter().map(TemplateResponse::from).collect(),
        pagination,
    }))
}

/// GET /api/templates/:id
pub async fn get_template(
    State(state): State<AppState>,
    Extension(workspace): Extension<CurrentWorkspace>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TemplateResponse>> {
    let template = state.template_service.get_template(workspace.id, id).await?;
    Ok(Json(TemplateResponse::from(template)))
}

/// POST /api/templates
pub async fn create_template(
    State(state): State<AppState>,
    Extension(workspace): Extension<CurrentWorkspace>,
    Json(req): Json<TemplateRequest>,
) -> ApiResult<(StatusCode, Json<TemplateResponse>)> {
    let template = state
        .template_service
        .create_template(workspace.id, req)
        .await?;
    Ok((StatusCode::CREATED, Json(TemplateResponse::from(template))))
}

/// PUT /api/templates/:id
pub async fn update_template(
    State(state): State<AppState>,
    Extension(workspace): Extension<CurrentWorkspace>,
    Path(id): Path<i64>,
    Json(req): Json<TemplateRequest>,
) -> ApiResult<Json<TemplateResponse>> {
    let template = state
        .template_service
        .update_template(workspace.id, id, req)
        .await?;
    Ok(Json(TemplateResponse::from(template)))
}

/// DELETE /api/templates/:id
pub async fn delete_template(
    State(state): State<AppState>,
    Extension(workspace): Extension<CurrentWorkspace>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .template_service
        .delete_template(workspace.id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
