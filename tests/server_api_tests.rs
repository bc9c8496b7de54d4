use std::fs;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::{Method, Request};
use tower::ServiceExt;

use stratadvisor::catalog::Catalog;
use stratadvisor::config::AiSettings;
use stratadvisor::llm::NotConfiguredLlmClient;
use stratadvisor::repository::FileRepository;
use stratadvisor::server::routes::{build_router, AppState};

fn temp_data_dir(label: &str) -> std::path::PathBuf {
    let stamp = SystemTime::now().duration_since(UNIX_EPOCH).expect("clock").as_nanos();
    let dir = std::env::temp_dir().join(format!("stratadvisor-server-test-{label}-{stamp}"));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn seed_profile(dir: &std::path::Path, user_id: &str) {
    use stratadvisor::model::{AllianceRole, Priorities, Profile, SpendingProfile};
    let profile = Profile {
        server_age_days: 120,
        furnace_level: 18,
        furnace_fc_level: None,
        spending_profile: SpendingProfile::F2p,
        alliance_role: AllianceRole::Filler,
        priorities: Priorities { svs: 3, rally: 3, castle: 3, exploration: 3, gathering: 3 },
        is_farm_account: false,
        linked_main_profile_id: None,
    };
    let profiles_dir = dir.join("profiles");
    fs::create_dir_all(&profiles_dir).unwrap();
    fs::write(profiles_dir.join(format!("{user_id}.json")), serde_json::to_string_pretty(&profile).unwrap()).unwrap();
}

async fn build_test_app() -> (axum::Router, std::path::PathBuf) {
    let catalog = Catalog::load(
        concat!(env!("CARGO_MANIFEST_DIR"), "/data/heroes/catalog.json"),
        concat!(env!("CARGO_MANIFEST_DIR"), "/data/lineups/templates.json"),
    )
    .expect("catalog should load from the shipped data files");

    let dir = temp_data_dir("app");
    seed_profile(&dir, "u1");
    let repository = FileRepository::new(&dir);

    let state = AppState {
        catalog,
        repository: Arc::new(repository),
        llm: Arc::new(NotConfiguredLlmClient),
        ai_settings: Arc::new(AiSettings::default()),
    };
    (build_router(state), dir)
}

async fn route_request(app: axum::Router, method: &str, path: &str, body: &str) -> (u16, String, String) {
    let m = match method {
        "POST" => Method::POST,
        _ => Method::GET,
    };
    let req = Request::builder().method(m).uri(path).header("content-type", "application/json").body(Body::from(body.to_string())).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status().as_u16();
    let content_type = resp.headers().get("content-type").and_then(|v| v.to_str().ok()).unwrap_or("").to_string();
    let body_bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8_lossy(&body_bytes).into_owned())
}

#[tokio::test]
async fn health_endpoint_returns_ok_json() {
    let (app, dir) = build_test_app().await;
    let (status, content_type, body) = route_request(app, "GET", "/api/health", "").await;
    assert_eq!(status, 200);
    assert_eq!(content_type, "application/json");
    assert!(body.contains("\"status\": \"ok\""));
    let _ = fs::remove_dir_all(dir);
}

#[tokio::test]
async fn catalog_version_endpoint_reports_counts() {
    let (app, dir) = build_test_app().await;
    let (status, _, body) = route_request(app, "GET", "/api/catalog/version", "").await;
    assert_eq!(status, 200);
    let payload: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(payload["hero_count"].as_u64().unwrap() > 0);
    let _ = fs::remove_dir_all(dir);
}

#[tokio::test]
async fn recommend_endpoint_returns_recommendations_for_a_known_user() {
    let (app, dir) = build_test_app().await;
    let body = r#"{"user_id":"u1","limit":5}"#;
    let (status, _, response_body) = route_request(app, "POST", "/api/recommend", body).await;
    assert_eq!(status, 200);
    let payload: serde_json::Value = serde_json::from_str(&response_body).unwrap();
    assert!(payload["recommendations"].is_array());
    let _ = fs::remove_dir_all(dir);
}

#[tokio::test]
async fn recommend_endpoint_returns_404_for_unknown_user() {
    let (app, dir) = build_test_app().await;
    let body = r#"{"user_id":"nobody"}"#;
    let (status, _, _) = route_request(app, "POST", "/api/recommend", body).await;
    assert_eq!(status, 404);
    let _ = fs::remove_dir_all(dir);
}

#[tokio::test]
async fn lineup_endpoint_builds_a_general_lineup() {
    let (app, dir) = build_test_app().await;
    let body = r#"{"user_id":"u1","mode":"bear_trap","personalized":false}"#;
    let (status, _, response_body) = route_request(app, "POST", "/api/lineup", body).await;
    assert_eq!(status, 200);
    let payload: serde_json::Value = serde_json::from_str(&response_body).unwrap();
    assert_eq!(payload["mode"], "bear_trap");
    let _ = fs::remove_dir_all(dir);
}

#[tokio::test]
async fn ask_endpoint_answers_without_a_configured_llm() {
    let (app, dir) = build_test_app().await;
    let body = r#"{"user_id":"u1","question":"what lineup should I use for bear trap?"}"#;
    let (status, _, response_body) = route_request(app, "POST", "/api/ask", body).await;
    assert_eq!(status, 200);
    let payload: serde_json::Value = serde_json::from_str(&response_body).unwrap();
    assert_eq!(payload["source"], "rules");
    let _ = fs::remove_dir_all(dir);
}
