pub mod template_repository;
pub mod workspace_repository;
