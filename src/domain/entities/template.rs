use serde::{Deserialize, Serialize};

/// Reusable email content owned by exactly one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: i64,
    pub workspace_id: i64,
    pub name: String,
    pub content: String,
    /// True when at least one campaign references this template.
    pub is_in_use: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Validated name/content pair used for both create and full-replace update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePayload {
    pub name: String,
    pub content: String,
}

// ========== DTOs (Data Transfer Objects) ==========

/// Raw input from a form or JSON body, before validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
}

/// Response containing full template data
#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub id: i64,
    pub workspace_id: i64,
    pub name: String,
    pub content: String,
    pub is_in_use: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Template> for TemplateResponse {
    fn from(template: Template) -> Self {
        Self {
            id: template.id,
            workspace_id: template.workspace_id,
            name: template.name,
            content: template.content,
            is_in_use: template.is_in_use,
            created_at: template.created_at,
            updated_at: template.updated_at,
        }
    }
}

/// Response containing a page of templates
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateResponse>,
    pub pagination: super::PaginationMetadata,
}
