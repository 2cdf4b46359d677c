pub mod flash;

use crate::{
    domain::entities::{CurrentWorkspace, TemplateRequest},
    domain::services::template_rules::TEMPLATE_DELETED_MESSAGE,
    infrastructure::http::middleware::{ApiError, ApiResult, AppState},
};
use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Extension, Form,
};
use axum_extra::extract::cookie::CookieJar;
use flash::{redirect_back, redirect_to, Flash};
use serde::Deserialize;
use std::collections::BTreeMap;

const TEMPLATES_PATH: &str = "/templates";
const FORM_FIELDS: [&str; 2] = ["name", "content"];

// Template structs
#[derive(Template)]
#[template(path = "templates_index.html")]
struct TemplatesIndexTemplate {
    templates: Vec<TemplateRowData>,
    page: i64,
    total_pages: i64,
    has_previous: bool,
    has_next: bool,
    success: Option<String>,
    errors: Vec<String>,
    request_path: String,
}

struct TemplateRowData {
    id: i64,
    name: String,
    is_in_use: bool,
    updated_at: String,
}

#[derive(Template)]
#[template(path = "templates_create.html")]
struct TemplatesCreateTemplate {
    form: TemplateFormData,
    request_path: String,
}

#[derive(Template)]
#[template(path = "templates_edit.html")]
struct TemplatesEditTemplate {
    id: i64,
    form: TemplateFormData,
    request_path: String,
}

/// Form values plus errors for the create and edit views
struct TemplateFormData {
    name: String,
    content: String,
    name_error: Option<String>,
    content_error: Option<String>,
    /// Errors not tied to a form field, e.g. a rejected delete
    errors: Vec<String>,
}

impl TemplateFormData {
    fn from_flash(flash: &Flash, name: &str, content: &str) -> Self {
        Self {
            name: flash.old("name").unwrap_or(name).to_string(),
            content: flash.old("content").unwrap_or(content).to_string(),
            name_error: flash.errors.get("name").map(str::to_string),
            content_error: flash.errors.get("content").map(str::to_string),
            errors: flash
                .errors
                .iter()
                .filter(|(field, _)| !FORM_FIELDS.contains(&field.as_str()))
                .map(|(_, message)| message.clone())
                .collect(),
        }
    }
}

struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    page: Option<i64>,
}

fn old_input(form: &TemplateRequest) -> BTreeMap<String, String> {
    let mut old = BTreeMap::new();
    old.insert("name".to_string(), form.name.clone());
    old.insert("content".to_string(), form.content.clone());
    old
}

/// Validation problems go back to the form; everything else propagates.
fn back_with_errors(
    err: ApiError,
    jar: CookieJar,
    headers: &HeaderMap,
    old: BTreeMap<String, String>,
    fallback: &str,
) -> ApiResult<Response> {
    match err {
        ApiError::Validation(errors) => Ok((
            Flash::with_errors(errors, old).put(jar),
            redirect_back(headers, fallback),
        )
            .into_response()),
        other => Err(other),
    }
}

// Handlers

/// GET /templates
pub async fn show_templates(
    State(state): State<AppState>,
    Extension(workspace): Extension<CurrentWorkspace>,
    Query(params): Query<PageParams>,
    jar: CookieJar,
) -> ApiResult<Response> {
    let page = state
        .template_service
        .list_templates(workspace.id, params.page, None)
        .await?;

    let (jar, flash) = Flash::take(jar);

    let template = TemplatesIndexTemplate {
        page: page.page,
        total_pages: page.total_pages(),
        has_previous: page.has_previous(),
        has_next: page.has_next(),
        templates: page
            .items
            .into_iter()
            .map(|t| TemplateRowData {
                id: t.id,
                name: t.name,
                is_in_use: t.is_in_use,
                updated_at: t.updated_at,
            })
            .collect(),
        success: flash.success.clone(),
        errors: flash.errors.messages(),
        request_path: TEMPLATES_PATH.to_string(),
    };

    Ok((jar, HtmlTemplate(template)).into_response())
}

/// GET /templates/create
pub async fn show_create_template_page(jar: CookieJar) -> Response {
    let (jar, flash) = Flash::take(jar);

    let template = TemplatesCreateTemplate {
        form: TemplateFormData::from_flash(&flash, "", ""),
        request_path: TEMPLATES_PATH.to_string(),
    };

    (jar, HtmlTemplate(template)).into_response()
}

/// POST /templates
pub async fn create_template(
    State(state): State<AppState>,
    Extension(workspace): Extension<CurrentWorkspace>,
    headers: HeaderMap,
    jar: CookieJar,
    Form(form): Form<TemplateRequest>,
) -> ApiResult<Response> {
    let old = old_input(&form);

    match state
        .template_service
        .create_template(workspace.id, form)
        .await
    {
        // No confirmation message on create, unlike delete
        Ok(_) => Ok(redirect_to(&headers, TEMPLATES_PATH)),
        Err(e) => back_with_errors(e, jar, &headers, old, "/templates/create"),
    }
}

/// GET /templates/:id/edit
pub async fn show_edit_template_page(
    State(state): State<AppState>,
    Extension(workspace): Extension<CurrentWorkspace>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> ApiResult<Response> {
    let existing = state.template_service.get_template(workspace.id, id).await?;
    let (jar, flash) = Flash::take(jar);

    let template = TemplatesEditTemplate {
        id: existing.id,
        form: TemplateFormData::from_flash(&flash, &existing.name, &existing.content),
        request_path: TEMPLATES_PATH.to_string(),
    };

    Ok((jar, HtmlTemplate(template)).into_response())
}

/// PUT/PATCH /templates/:id, and POST for plain HTML forms
pub async fn update_template(
    State(state): State<AppState>,
    Extension(workspace): Extension<CurrentWorkspace>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    jar: CookieJar,
    Form(form): Form<TemplateRequest>,
) -> ApiResult<Response> {
    let old = old_input(&form);

    match state
        .template_service
        .update_template(workspace.id, id, form)
        .await
    {
        Ok(_) => Ok(redirect_to(&headers, TEMPLATES_PATH)),
        Err(e) => {
            let fallback = format!("/templates/{}/edit", id);
            back_with_errors(e, jar, &headers, old, &fallback)
        }
    }
}

/// DELETE /templates/:id
pub async fn delete_template(
    State(state): State<AppState>,
    Extension(workspace): Extension<CurrentWorkspace>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    jar: CookieJar,
) -> ApiResult<Response> {
    match state
        .template_service
        .delete_template(workspace.id, id)
        .await
    {
        Ok(()) => Ok((
            Flash::success(TEMPLATE_DELETED_MESSAGE).put(jar),
            redirect_to(&headers, TEMPLATES_PATH),
        )
            .into_response()),
        Err(e) => back_with_errors(e, jar, &headers, BTreeMap::new(), TEMPLATES_PATH),
    }
}
