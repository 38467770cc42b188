//! ---
//! shelf_section: "05-testing-qa"
//! shelf_subsection: "integration-tests"
//! shelf_type: "source"
//! shelf_scope: "code"
//! shelf_description: "End-to-end scenario runs against an in-process mock backend."
//! shelf_version: "v0.1.0"
//! shelf_owner: "tbd"
//! ---
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use shelfcheck_client::rest::ApiClient;
use shelfcheck_common::config::HarnessConfig;
use shelfcheck_scenario::report::RunReport;
use shelfcheck_scenario::runner::ScenarioRunner;
use tokio::net::TcpListener;

/// In-memory stand-in for the book-library backend, faithful to the wire
/// contract the harness asserts against: every operation is a POST and
/// answers `{ "success": ... }`, login echoes the stored credentials.
#[derive(Default)]
struct Backend {
    users: HashMap<String, UserRecord>,
    next_id: u64,
}

struct UserRecord {
    userid: String,
    username: String,
    password: String,
    books: Vec<Value>,
}

type Shared = Arc<Mutex<Backend>>;

fn text(body: &Value, field: &str) -> String {
    body.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn find_by_id<'a>(backend: &'a mut Backend, body: &Value) -> Option<&'a mut UserRecord> {
    let userid = text(body, "userid");
    let password = text(body, "password");
    backend
        .users
        .values_mut()
        .find(|user| user.userid == userid && user.password == password)
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let username = text(&body, "username");
    let password = text(&body, "password");
    let mut backend = state.lock().unwrap();
    if username.is_empty() || backend.users.contains_key(&username) {
        return Json(json!({ "success": false, "message": "registration rejected" }));
    }
    backend.next_id += 1;
    let userid = format!("u{}", backend.next_id);
    backend.users.insert(
        username.clone(),
        UserRecord {
            userid,
            username,
            password,
            books: Vec::new(),
        },
    );
    Json(json!({ "success": true }))
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let username = text(&body, "username");
    let password = text(&body, "password");
    let backend = state.lock().unwrap();
    match backend.users.get(&username) {
        Some(user) if user.password == password => Json(json!({
            "success": true,
            "userid": user.userid,
            "username": user.username,
            "password": user.password,
        })),
        _ => Json(json!({ "success": false })),
    }
}

async fn add_book(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut backend = state.lock().unwrap();
    let Some(user) = find_by_id(&mut backend, &body) else {
        return Json(json!({ "success": false, "message": "unauthorized" }));
    };
    let key = text(&body, "key");
    if key.is_empty()
        || user
            .books
            .iter()
            .any(|book| book["key"].as_str() == Some(key.as_str()))
    {
        return Json(json!({ "success": false, "message": "duplicate key" }));
    }
    user.books.push(json!({
        "key": key,
        "title": text(&body, "title"),
        "cover_i": body.get("cover_i").cloned().unwrap_or(Value::Null),
        "first_year_publish": body.get("first_year_publish").cloned().unwrap_or(Value::Null),
        "language": body.get("language").cloned().unwrap_or(Value::Null),
    }));
    Json(json!({ "success": true }))
}

async fn list_books(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut backend = state.lock().unwrap();
    match find_by_id(&mut backend, &body) {
        Some(user) => Json(json!({ "success": true, "books": user.books })),
        None => Json(json!({ "success": false })),
    }
}

async fn remove_book(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut backend = state.lock().unwrap();
    let Some(user) = find_by_id(&mut backend, &body) else {
        return Json(json!({ "success": false, "message": "unauthorized" }));
    };
    let key = text(&body, "key");
    match user
        .books
        .iter()
        .position(|book| book["key"].as_str() == Some(key.as_str()))
    {
        Some(index) => {
            user.books.remove(index);
            Json(json!({ "success": true }))
        }
        None => Json(json!({ "success": false, "message": "unknown key" })),
    }
}

async fn delete_user(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let userid = text(&body, "userid");
    let username = text(&body, "username");
    let password = text(&body, "password");
    let mut backend = state.lock().unwrap();
    let credentials_match = backend
        .users
        .get(&username)
        .map(|user| user.userid == userid && user.password == password)
        .unwrap_or(false);
    if credentials_match {
        backend.users.remove(&username);
        Json(json!({ "success": true }))
    } else {
        Json(json!({ "success": false }))
    }
}

/// A removal endpoint that reports success without touching the shelf,
/// used to prove the post-removal listing check catches regressions.
async fn remove_book_sticky(State(_): State<Shared>, Json(_): Json<Value>) -> Json<Value> {
    Json(json!({ "success": true }))
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/lib/addbook", post(add_book))
        .route("/lib", post(list_books))
        .route("/lib/removebook", post(remove_book))
        .route("/deleteuser", post(delete_user))
        .with_state(state)
}

fn router_with_sticky_removal(state: Shared) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/lib/addbook", post(add_book))
        .route("/lib", post(list_books))
        .route("/lib/removebook", post(remove_book_sticky))
        .route("/deleteuser", post(delete_user))
        .with_state(state)
}

async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

fn config_for(base: &str) -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.base_url = Some(base.to_owned());
    config
}

async fn run_scenario(config: &HarnessConfig) -> RunReport {
    config.validate().expect("test config should validate");
    let client = ApiClient::new(config.parsed_base_url().unwrap(), config.request_timeout).unwrap();
    ScenarioRunner::new(client, config).unwrap().run().await
}

const FULL_SEQUENCE: [&str; 10] = [
    "register",
    "login",
    "addbook",
    "addbook2",
    "lib",
    "removebook",
    "lib2",
    "removebook2",
    "deleteuser",
    "login-after-delete",
];

#[tokio::test]
async fn full_scenario_passes_every_step() {
    let state: Shared = Arc::default();
    let base = spawn_backend(router(state.clone())).await;
    let report = run_scenario(&config_for(&base)).await;

    let names: Vec<&str> = report.results().iter().map(|result| result.name).collect();
    assert_eq!(names, FULL_SEQUENCE);
    assert!(
        report.all_passed(),
        "unexpected failures:\n{}",
        report.render()
    );
    assert_eq!(report.exit_code(), 0);

    // The first listing saw both fixtures on the shelf.
    let listing = &report.results()[4];
    let body = listing.body.as_ref().unwrap();
    let rendered = body.to_string();
    assert!(rendered.contains("/works/OL8065988M"));
    assert!(rendered.contains("/works/OL8066000M"));

    // Terminal state: the account is gone.
    assert!(state.lock().unwrap().users.is_empty());
}

#[tokio::test]
async fn deletion_probe_can_be_skipped() {
    let state: Shared = Arc::default();
    let base = spawn_backend(router(state)).await;
    let mut config = config_for(&base);
    config.verify_deletion = false;
    let report = run_scenario(&config).await;

    assert_eq!(report.results().len(), 9);
    assert!(report.all_passed(), "{}", report.render());
}

#[tokio::test]
async fn failed_steps_are_recorded_without_halting_the_run() {
    let state: Shared = Arc::default();
    // Seed the account with a different password: registration collides,
    // login is refused, and every dependent step fails its assertion.
    state.lock().unwrap().users.insert(
        "s".to_owned(),
        UserRecord {
            userid: "u999".to_owned(),
            username: "s".to_owned(),
            password: "not-a".to_owned(),
            books: Vec::new(),
        },
    );
    let base = spawn_backend(router(state)).await;
    let report = run_scenario(&config_for(&base)).await;

    assert_eq!(report.results().len(), 10, "the run must reach the end");
    assert_eq!(report.failed_count(), 9);
    // The deletion probe expects a refusal, which is exactly what the
    // still-foreign credentials produce.
    let probe = report.results().last().unwrap();
    assert_eq!(probe.name, "login-after-delete");
    assert!(probe.passed);
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test]
async fn fail_fast_stops_at_the_first_failure() {
    let state: Shared = Arc::default();
    state.lock().unwrap().users.insert(
        "s".to_owned(),
        UserRecord {
            userid: "u999".to_owned(),
            username: "s".to_owned(),
            password: "not-a".to_owned(),
            books: Vec::new(),
        },
    );
    let base = spawn_backend(router(state)).await;
    let mut config = config_for(&base);
    config.fail_fast = true;
    let report = run_scenario(&config).await;

    assert_eq!(report.results().len(), 1);
    assert_eq!(report.results()[0].name, "register");
    assert!(!report.results()[0].passed);
}

#[tokio::test]
async fn unreachable_backends_fail_every_step_without_crashing() {
    // Bind and drop a listener so the port is guaranteed dead.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let report = run_scenario(&config_for(&format!("http://{addr}/"))).await;

    assert_eq!(report.results().len(), 10);
    assert_eq!(report.failed_count(), 10);
    assert!(report.results().iter().all(|result| result.body.is_none()));
    assert_eq!(report.exit_code(), 1);
    assert!(report.render().contains("FAIL register"));
}

#[tokio::test]
async fn post_removal_listing_catches_sticky_shelves() {
    let state: Shared = Arc::default();
    let base = spawn_backend(router_with_sticky_removal(state)).await;
    let report = run_scenario(&config_for(&base)).await;

    let lib2 = report
        .results()
        .iter()
        .find(|result| result.name == "lib2")
        .expect("the second listing must have run");
    assert!(!lib2.passed);
    assert!(lib2.detail.as_deref().unwrap().contains("still mentions"));
    assert_eq!(report.failed_count(), 1, "{}", report.render());
}
