use crate::{
    domain::entities::{
        page_offset, Page, Template, TemplatePayload, TemplateRequest, MAX_PER_PAGE,
    },
    domain::ports::template_repository::TemplateRepository,
    domain::services::template_rules::{check_template_request, ensure_deletable},
    infrastructure::http::middleware::error::{ApiError, ApiResult},
    shared::utils::{normalize_tags, TagField},
};
use std::sync::Arc;

/// Template management for a single workspace per call.
///
/// The workspace id is always an explicit argument; the service holds no
/// per-request state.
#[derive(Clone)]
pub struct TemplateService {
    template_repo: Arc<dyn TemplateRepository>,
    per_page: i64,
}

impl TemplateService {
    pub fn new(template_repo: Arc<dyn TemplateRepository>, per_page: i64) -> Self {
        Self {
            template_repo,
            per_page,
        }
    }

    /// Page of the workspace's templates ordered by name
    pub async fn list_templates(
        &self,
        workspace_id: i64,
        page: Option<i64>,
        per_page: Option<i64>,
    ) -> ApiResult<Page<Template>> {
        let per_page = per_page
            .filter(|n| *n > 0)
            .unwrap_or(self.per_page)
            .min(MAX_PER_PAGE);
        let (page, offset) = page_offset(page, per_page);

        let (items, total) = self
            .template_repo
            .paginate_templates(workspace_id, per_page, offset)
            .await?;

        Ok(Page {
            items,
            page,
            per_page,
            total,
        })
    }

    /// Find a template owned by the workspace, NotFound otherwise
    pub async fn get_template(&self, workspace_id: i64, id: i64) -> ApiResult<Template> {
        self.template_repo
            .find_template(workspace_id, id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Template {} not found", id)))
    }

    pub async fn create_template(
        &self,
        workspace_id: i64,
        request: TemplateRequest,
    ) -> ApiResult<Template> {
        let payload = self.validate(workspace_id, &request, None).await?;

        let template = self
            .template_repo
            .store_template(workspace_id, &payload)
            .await?;

        metrics::counter!("templates_created_total").increment(1);
        Ok(template)
    }

    /// Full replace of name and content
    pub async fn update_template(
        &self,
        workspace_id: i64,
        id: i64,
        request: TemplateRequest,
    ) -> ApiResult<Template> {
        // 1. Ownership check comes before validation so foreign ids look absent
        self.get_template(workspace_id, id).await?;

        // 2. Validate and normalise
        let payload = self.validate(workspace_id, &request, Some(id)).await?;

        // 3. Persist
        if !self
            .template_repo
            .update_template(workspace_id, id, &payload)
            .await?
        {
            return Err(ApiError::NotFound(format!("Template {} not found", id)));
        }

        metrics::counter!("templates_updated_total").increment(1);

        self.get_template(workspace_id, id).await
    }

    /// Delete a template unless a campaign references it.
    ///
    /// The in-use check lives here rather than in the store; rejected
    /// deletions surface as a `template` validation error.
    pub async fn delete_template(&self, workspace_id: i64, id: i64) -> ApiResult<()> {
        let template = self.get_template(workspace_id, id).await?;

        if let Err(e) = ensure_deletable(&template) {
            tracing::warn!(
                "Refusing to delete template in use: id={}, workspace_id={}",
                id,
                workspace_id
            );
            metrics::counter!("template_delete_rejected_total").increment(1);
            return Err(e);
        }

        if !self
            .template_repo
            .destroy_template(workspace_id, template.id)
            .await?
        {
            return Err(ApiError::NotFound(format!("Template {} not found", id)));
        }

        metrics::counter!("templates_deleted_total").increment(1);
        Ok(())
    }

    async fn validate(
        &self,
        workspace_id: i64,
        request: &TemplateRequest,
        except_id: Option<i64>,
    ) -> ApiResult<TemplatePayload> {
        let (mut payload, mut errors) = check_template_request(request);

        if errors.get("name").is_none()
            && self
                .template_repo
                .template_name_exists(workspace_id, &payload.name, except_id)
                .await?
        {
            errors.add("name", "The name has already been taken.");
        }

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        payload.content = normalize_tags(&payload.content, TagField::Content);
        Ok(payload)
    }
}
