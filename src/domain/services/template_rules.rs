use crate::domain::entities::{Template, TemplatePayload, TemplateRequest};
use crate::infrastructure::http::middleware::error::{ApiError, ApiResult, ValidationErrors};

pub const TEMPLATE_IN_USE_MESSAGE: &str = "Cannot delete a template that has been used.";
pub const TEMPLATE_DELETED_MESSAGE: &str = "Template successfully deleted.";

pub const MAX_NAME_LENGTH: usize = 255;

/// Precondition for deletion: a template referenced by a campaign stays.
pub fn ensure_deletable(template: &Template) -> ApiResult<()> {
    if template.is_in_use {
        return Err(ApiError::Validation(ValidationErrors::single(
            "template",
            TEMPLATE_IN_USE_MESSAGE,
        )));
    }
    Ok(())
}

/// Field rules that need no storage lookup.
///
/// Returns the trimmed payload together with any errors found; the caller
/// adds the uniqueness check before deciding.
pub fn check_template_request(request: &TemplateRequest) -> (TemplatePayload, ValidationErrors) {
    let mut errors = ValidationErrors::new();
    let name = request.name.trim().to_string();

    if name.is_empty() {
        errors.add("name", "The name field is required.");
    } else if name.chars().count() > MAX_NAME_LENGTH {
        errors.add(
            "name",
            format!("The name may not be greater than {} characters.", MAX_NAME_LENGTH),
        );
    }

    if request.content.trim().is_empty() {
        errors.add("content", "The content field is required.");
    }

    (
        TemplatePayload {
            name,
            content: request.content.clone(),
        },
        errors,
    )
}
