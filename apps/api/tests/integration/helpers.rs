use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use registration_api::{
    application::{registration_session::SessionRegistry, submit_registration::dto::PartialFailurePolicy},
    config::Config,
    infrastructure::repositories::InMemoryRegistrationStore,
    presentation::http::{routes::create_router, state::AppState},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub app: Router,
    pub store: Arc<InMemoryRegistrationStore>,
    pub sessions: Arc<SessionRegistry>,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_policy(PartialFailurePolicy::Expose).await
}

pub async fn spawn_app_with_policy(policy: PartialFailurePolicy) -> TestApp {
    let config = Config {
        port: 0,
        partial_failure_policy: policy,
        ..Config::default()
    };
    let store = Arc::new(InMemoryRegistrationStore::new());
    let state = AppState::new(config, store.clone(), None);
    let sessions = state.sessions.clone();

    TestApp {
        app: create_router(state),
        store,
        sessions,
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(req).await.expect("request failed")
}

pub async fn read_json<T: DeserializeOwned>(res: axum::response::Response) -> T {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("failed to parse json")
}

pub async fn read_text(res: axum::response::Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("invalid utf8")
}

pub async fn expect_status(
    res: axum::response::Response,
    expected: StatusCode,
) -> axum::response::Response {
    let actual = res.status();
    if actual == expected {
        return res;
    }

    let body = read_text(res).await;
    panic!(
        "HTTP status mismatch. Expected {}, got {}. Response body: {}",
        expected, actual, body
    );
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build GET request")
}

pub fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build POST request")
}

pub fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build PUT request")
}

/// Opens a session and returns its id.
pub async fn open_session(app: &Router) -> String {
    let res = expect_status(
        send(app, post_empty("/api/v1/registration/sessions")).await,
        StatusCode::CREATED,
    )
    .await;
    let view: Value = read_json(res).await;
    view["id"].as_str().expect("missing session id").to_string()
}

pub fn participant_json(mobile: &str, email: &str) -> Value {
    json!({
        "name": "Rohan Mehta",
        "age": "21",
        "gender": "male",
        "mobile": mobile,
        "email": email,
        "educational_institution": "IIT Bombay",
        "current_year_of_study": "3",
        "field_of_study": "Computer Science"
    })
}

pub fn team_json(name: &str) -> Value {
    json!({
        "name": name,
        "profession": "student",
        "company_name": null,
        "company_cin": null,
        "video_link": "https://www.youtube.com/watch?v=abc"
    })
}

/// Fills every section of the session with valid values, using a team of
/// three with both teammate entries completed.
pub async fn fill_session(app: &Router, session_id: &str, mobile: &str, email: &str, team_name: &str) {
    let base = format!("/api/v1/registration/sessions/{}", session_id);

    expect_status(
        send(app, put_json(&format!("{}/participant", base), participant_json(mobile, email))).await,
        StatusCode::OK,
    )
    .await;
    expect_status(
        send(app, put_json(&format!("{}/team", base), team_json(team_name))).await,
        StatusCode::OK,
    )
    .await;

    let res = expect_status(
        send(app, put_json(&format!("{}/team/strength", base), json!({ "strength": "3" }))).await,
        StatusCode::OK,
    )
    .await;
    let view: Value = read_json(res).await;
    let member_ids: Vec<String> = view["form"]["team"]["members"]
        .as_array()
        .expect("members should be an array")
        .iter()
        .map(|m| m["id"].as_str().expect("member id").to_string())
        .collect();

    for (i, member_id) in member_ids.iter().enumerate() {
        expect_status(
            send(
                app,
                put_json(
                    &format!("{}/team/members/{}", base, member_id),
                    json!({
                        "name": format!("Teammate {}", i + 1),
                        "email": format!("teammate{}-{}@example.com", i + 1, Uuid::now_v7()),
                        "role": "Developer"
                    }),
                ),
            )
            .await,
            StatusCode::OK,
        )
        .await;
    }
}

pub fn unique_mobile() -> String {
    let digits: String = Uuid::now_v7()
        .as_u128()
        .to_string()
        .chars()
        .rev()
        .take(9)
        .collect();
    format!("9{}", digits)
}
