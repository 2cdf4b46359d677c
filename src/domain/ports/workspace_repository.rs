use crate::domain::entities::Workspace;
use crate::infrastructure::http::middleware::error::ApiResult;

#[async_trait::async_trait]
pub trait WorkspaceRepository: Send + Sync {
    async fn get_workspace_by_id(&self, id: i64) -> ApiResult<Option<Workspace>>;
    async fn create_workspace_with_id(&self, id: i64, name: &str) -> ApiResult<Workspace>;
}
