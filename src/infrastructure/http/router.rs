use crate::infrastructure::http::controllers;
use crate::infrastructure::http::middleware::{resolve_workspace, AppState};
use crate::infrastructure::web;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    // JSON API
    let api = Router::new()
        .route(
            "/api/templates",
            get(controllers::templates::list_templates)
                .post(controllers::templates::create_template),
        )
        .route(
            "/api/templates/:id",
            get(controllers::templates::get_template)
                .put(controllers::templates::update_template)
                .delete(controllers::templates::delete_template),
        );

    // HTML views
    let web_routes = Router::new()
        .route(
            "/templates",
            get(web::show_templates).post(web::create_template),
        )
        .route("/templates/create", get(web::show_create_template_page))
        .route("/templates/:id/edit", get(web::show_edit_template_page))
        .route(
            "/templates/:id",
            post(web::update_template)
                .put(web::update_template)
                .patch(web::update_template)
                .delete(web::delete_template),
        );

    // Everything workspace-scoped goes through the resolver
    let scoped = api
        .merge(web_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            resolve_workspace,
        ));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(scoped)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root_handler() -> axum::response::Redirect {
    axum::response::Redirect::to("/templates")
}

async fn health_handler() -> &'static str {
    "OK"
}
