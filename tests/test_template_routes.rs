// HTTP-level tests for the template views and JSON API
use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, COOKIE, HOST, LOCATION, REFERER, SET_COOKIE},
        Request, Response, StatusCode,
    },
    Router,
};
use quire::bootstrap::build_app_state;
use quire::config::Config;
use quire::domain::ports::template_repository::TemplateRepository;
use quire::infrastructure::http::router::build_router;
use quire::infrastructure::persistence::Database;
use quire::infrastructure::web::flash::{Flash, FLASH_COOKIE, MAX_FLASH_BYTES};
use tower::ServiceExt;

mod helpers;
use helpers::*;

fn test_config() -> Config {
    Config {
        database_url: String::new(),
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        default_workspace_id: 1,
        default_workspace_name: "Acme".to_string(),
        templates_per_page: 25,
        otel_exporter_endpoint: None,
        service_name: "quire-test".to_string(),
        metrics_port: 0,
    }
}

fn app(db: &Database) -> Router {
    build_router(build_app_state(db.clone(), &test_config()))
}

fn request(method: &str, uri: &str, workspace_id: i64) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Workspace-Id", workspace_id.to_string())
}

fn form(method: &str, uri: &str, workspace_id: i64, body: &str) -> Request<Body> {
    request(method, uri, workspace_id)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Raw flash cookie value set by a response, if any
fn flash_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .filter_map(|pair| pair.strip_prefix(&format!("{}=", FLASH_COOKIE)))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

async fn seeded() -> (TestDatabase, Database) {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    create_test_workspace(&db, 1, "Acme").await;
    create_test_workspace(&db, 2, "Globex").await;
    (test_db, db)
}

#[tokio::test]
async fn test_index_lists_workspace_templates_by_name() {
    let (_guard, db) = seeded().await;
    create_test_template(&db, 1, "Zebra", "z").await;
    create_test_template(&db, 1, "Alpha", "a").await;
    create_test_template(&db, 2, "Foreign", "f").await;

    let response = app(&db)
        .oneshot(request("GET", "/templates", 1).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    let alpha = html.find("Alpha").expect("Alpha missing");
    let zebra = html.find("Zebra").expect("Zebra missing");
    assert!(alpha < zebra);
    assert!(!html.contains("Foreign"));
}

#[tokio::test]
async fn test_default_workspace_applies_without_header() {
    let (_guard, db) = seeded().await;
    create_test_template(&db, 1, "Welcome", "w").await;

    let response = app(&db)
        .oneshot(
            Request::builder()
                .uri("/templates")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Welcome"));
}

#[tokio::test]
async fn test_unknown_workspace_is_not_found() {
    let (_guard, db) = seeded().await;

    let response = app(&db)
        .oneshot(request("GET", "/templates", 99).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_form_renders_empty() {
    let (_guard, db) = seeded().await;

    let response = app(&db)
        .oneshot(
            request("GET", "/templates/create", 1)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("New Template"));
    assert!(html.contains("value=\"\""));
}

#[tokio::test]
async fn test_create_redirects_to_index_without_message() {
    let (_guard, db) = seeded().await;

    let response = app(&db)
        .oneshot(form(
            "POST",
            "/templates",
            1,
            "name=Promo&content=Hi+%7B%7B+first_name+%7D%7D",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/templates");
    assert!(flash_cookie(&response).is_none());

    let (templates, total) = db.paginate_templates(1, 25, 0).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(templates[0].name, "Promo");
    assert_eq!(templates[0].content, "Hi {{first_name}}");
}

#[tokio::test]
async fn test_invalid_create_goes_back_with_errors_and_old_input() {
    let (_guard, db) = seeded().await;
    let app = app(&db);

    let response = app
        .clone()
        .oneshot(form("POST", "/templates", 1, "name=Draft&content="))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/templates/create");

    let cookie = flash_cookie(&response).expect("flash cookie missing");
    let flash = Flash::decode(&cookie).expect("flash cookie unreadable");
    assert_eq!(
        flash.errors.get("content"),
        Some("The content field is required.")
    );
    assert_eq!(flash.old("name"), Some("Draft"));

    let response = app
        .oneshot(
            request("GET", "/templates/create", 1)
                .header(COOKIE, format!("{}={}", FLASH_COOKIE, cookie))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(html.contains("The content field is required."));
    assert!(html.contains("value=\"Draft\""));
}

#[tokio::test]
async fn test_edit_and_update() {
    let (_guard, db) = seeded().await;
    let template = create_test_template(&db, 1, "Welcome", "Hi {{first_name}}").await;
    let app = app(&db);

    let response = app
        .clone()
        .oneshot(
            request("GET", &format!("/templates/{}/edit", template.id), 1)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("value=\"Welcome\""));

    let response = app
        .clone()
        .oneshot(form(
            "PUT",
            &format!("/templates/{}", template.id),
            1,
            "name=Onboarding&content=Bye+%7B%7Bemail+%7D%7D",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/templates");

    let reloaded = db.find_template(1, template.id).await.unwrap().unwrap();
    assert_eq!(reloaded.name, "Onboarding");
    assert_eq!(reloaded.content, "Bye {{email}}");
}

#[tokio::test]
async fn test_foreign_workspace_cannot_edit_update_or_delete() {
    let (_guard, db) = seeded().await;
    let template = create_test_template(&db, 1, "Welcome", "Hi {{first_name}}").await;
    let app = app(&db);

    let edit = app
        .clone()
        .oneshot(
            request("GET", &format!("/templates/{}/edit", template.id), 2)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(edit.status(), StatusCode::NOT_FOUND);
    assert!(!body_text(edit).await.contains("Welcome"));

    let update = app
        .clone()
        .oneshot(form(
            "PUT",
            &format!("/templates/{}", template.id),
            2,
            "name=Stolen&content=x",
        ))
        .await
        .unwrap();
    assert_eq!(update.status(), StatusCode::NOT_FOUND);

    let delete = app
        .oneshot(
            request("DELETE", &format!("/templates/{}", template.id), 2)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);

    let untouched = db.find_template(1, template.id).await.unwrap().unwrap();
    assert_eq!(untouched.name, "Welcome");
}

#[tokio::test]
async fn test_delete_in_use_redirects_back_with_error() {
    let (_guard, db) = seeded().await;
    let template = create_test_template(&db, 1, "Welcome", "Hi {{first_name}}").await;
    create_test_campaign(&db, 1, template.id).await;

    let response = app(&db)
        .oneshot(
            request("DELETE", &format!("/templates/{}", template.id), 1)
                .header(HOST, "localhost:3000")
                .header(REFERER, "http://localhost:3000/templates?page=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/templates?page=1");

    let flash = Flash::decode(&flash_cookie(&response).expect("flash cookie missing")).unwrap();
    assert_eq!(
        flash.errors.get("template"),
        Some("Cannot delete a template that has been used.")
    );
    assert!(flash.success.is_none());

    assert!(db.find_template(1, template.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_removes_template_and_flashes_success() {
    let (_guard, db) = seeded().await;
    let template = create_test_template(&db, 1, "Welcome", "Hi {{first_name}}").await;
    let app = app(&db);

    let response = app
        .clone()
        .oneshot(
            request("DELETE", &format!("/templates/{}", template.id), 1)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/templates");
    assert!(db.find_template(1, template.id).await.unwrap().is_none());

    let cookie = flash_cookie(&response).expect("flash cookie missing");
    let response = app
        .oneshot(
            request("GET", "/templates", 1)
                .header(COOKIE, format!("{}={}", FLASH_COOKIE, cookie))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(body_text(response)
        .await
        .contains("Template successfully deleted."));
}

#[tokio::test]
async fn test_json_api_create_delete_and_scoping() {
    let (_guard, db) = seeded().await;
    let app = app(&db);

    let response = app
        .clone()
        .oneshot(
            request("POST", "/api/templates", 1)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"name":"Receipt","content":"Thanks {{ first_name }}"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(created["content"], "Thanks {{first_name}}");
    let id = created["id"].as_i64().unwrap();

    create_test_campaign(&db, 1, id).await;

    let response = app
        .clone()
        .oneshot(
            request("DELETE", &format!("/api/templates/{}", id), 1)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(
        body["errors"]["template"],
        "Cannot delete a template that has been used."
    );

    let response = app
        .oneshot(
            request("GET", "/api/templates", 2)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["pagination"]["total_count"], 0);
}

#[tokio::test]
async fn test_update_through_html_form_post() {
    let (_guard, db) = seeded().await;
    let template = create_test_template(&db, 1, "Welcome", "Hi {{first_name}}").await;

    let response = app(&db)
        .oneshot(form(
            "POST",
            &format!("/templates/{}", template.id),
            1,
            "name=Renamed&content=Hello+%7B%7B+LAST_NAME+%7D%7D",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/templates");

    let reloaded = db.find_template(1, template.id).await.unwrap().unwrap();
    assert_eq!(reloaded.name, "Renamed");
    assert_eq!(reloaded.content, "Hello {{last_name}}");
}

#[tokio::test]
async fn test_index_renders_second_page() {
    let (_guard, db) = seeded().await;
    for i in 1..=27 {
        create_test_template(&db, 1, &format!("Template {:02}", i), "c").await;
    }

    let response = app(&db)
        .oneshot(
            request("GET", "/templates?page=2", 1)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Template 26"));
    assert!(html.contains("Template 27"));
    assert!(!html.contains("Template 01"));
    assert!(html.contains("Page 2 of 2"));
    assert!(html.contains("/templates?page=1"));
}

#[tokio::test]
async fn test_huge_page_parameters_do_not_break_listing() {
    let (_guard, db) = seeded().await;
    create_test_template(&db, 1, "Welcome", "w").await;
    let app = app(&db);

    let response = app
        .clone()
        .oneshot(
            request("GET", "/templates?page=9223372036854775807", 1)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            request("GET", "/api/templates?per_page=9223372036854775807", 1)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["pagination"]["per_page"], 100);
    assert_eq!(body["pagination"]["total_pages"], 1);
    assert_eq!(body["templates"][0]["name"], "Welcome");
}

#[tokio::test]
async fn test_large_content_keeps_validation_errors_in_flash() {
    let (_guard, db) = seeded().await;
    create_test_template(&db, 1, "Welcome", "w").await;
    let app = app(&db);

    let body = format!("name=Welcome&content={}", "a".repeat(10 * 1024));
    let response = app
        .clone()
        .oneshot(form("POST", "/templates", 1, &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let cookie = flash_cookie(&response).expect("flash cookie missing");
    assert!(cookie.len() <= MAX_FLASH_BYTES);
    let flash = Flash::decode(&cookie).expect("flash cookie unreadable");
    assert_eq!(
        flash.errors.get("name"),
        Some("The name has already been taken.")
    );
    assert_eq!(flash.old("name"), Some("Welcome"));

    let response = app
        .oneshot(
            request("GET", "/templates/create", 1)
                .header(COOKIE, format!("{}={}", FLASH_COOKIE, cookie))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(body_text(response)
        .await
        .contains("The name has already been taken."));
}

#[tokio::test]
async fn test_in_use_error_shows_on_edit_page() {
    let (_guard, db) = seeded().await;
    let template = create_test_template(&db, 1, "Welcome", "Hi {{first_name}}").await;
    create_test_campaign(&db, 1, template.id).await;
    let app = app(&db);
    let edit_path = format!("/templates/{}/edit", template.id);

    let response = app
        .clone()
        .oneshot(
            request("DELETE", &format!("/templates/{}", template.id), 1)
                .header(REFERER, edit_path.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()[LOCATION], edit_path.as_str());

    let cookie = flash_cookie(&response).expect("flash cookie missing");
    let response = app
        .oneshot(
            request("GET", &edit_path, 1)
                .header(COOKIE, format!("{}={}", FLASH_COOKIE, cookie))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(body_text(response)
        .await
        .contains("Cannot delete a template that has been used."));
}
