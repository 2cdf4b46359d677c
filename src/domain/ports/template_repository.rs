use crate::domain::entities::{Template, TemplatePayload};
use crate::infrastructure::http::middleware::error::ApiResult;
use async_trait::async_trait;

/// Workspace-scoped template storage.
///
/// Every method takes the owning workspace id; a template id alone never
/// reaches a row in another workspace.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Page of templates ordered by name ascending
    async fn paginate_templates(
        &self,
        workspace_id: i64,
        limit: i64,
        offset: i64,
    ) -> ApiResult<(Vec<Template>, i64)>;

    async fn find_template(&self, workspace_id: i64, id: i64) -> ApiResult<Option<Template>>;

    async fn store_template(
        &self,
        workspace_id: i64,
        payload: &TemplatePayload,
    ) -> ApiResult<Template>;

    /// Full replace of name and content. Returns false when no row matched.
    async fn update_template(
        &self,
        workspace_id: i64,
        id: i64,
        payload: &TemplatePayload,
    ) -> ApiResult<bool>;

    /// Returns false when no row matched.
    async fn destroy_template(&self, workspace_id: i64, id: i64) -> ApiResult<bool>;

    /// Whether another template in the workspace already uses this name
    async fn template_name_exists(
        &self,
        workspace_id: i64,
        name: &str,
        except_id: Option<i64>,
    ) -> ApiResult<bool>;
}
