use serde::{Deserialize, Serialize};

/// Tenant isolation boundary. Every template belongs to exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// The workspace resolved for the current request.
///
/// Inserted as a request extension by the workspace middleware and handed to
/// every service call as an explicit argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentWorkspace {
    pub id: i64,
}

impl From<&Workspace> for CurrentWorkspace {
    fn from(workspace: &Workspace) -> Self {
        Self { id: workspace.id }
    }
}
