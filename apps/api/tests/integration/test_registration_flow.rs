use super::helpers::{
    expect_status, fill_session, get, open_session, participant_json, post_empty, put_json, read_json, send,
    spawn_app, spawn_app_with_policy, unique_mobile,
};
use axum::http::StatusCode;
use registration_api::{
    application::{registration_session::acquire, submit_registration::dto::PartialFailurePolicy},
    domain::registration::errors::StoreError,
    infrastructure::repositories::StoreOperation,
};
use serde_json::{Value, json};
use uuid::Uuid;

fn session_uri(id: &str) -> String {
    format!("/api/v1/registration/sessions/{}", id)
}

fn submit_uri(id: &str) -> String {
    format!("/api/v1/registration/sessions/{}/submit", id)
}

#[tokio::test]
async fn health_reports_memory_store() {
    let app = spawn_app().await;
    let res = expect_status(send(&app.app, get("/api/v1/health")).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = spawn_app().await;
    let res = send(&app.app, get("/api/v1/registration/options")).await;
    let header = res
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("missing x-request-id");
    assert!(Uuid::parse_str(header).is_ok());
}

#[tokio::test]
async fn options_list_every_select_field() {
    let app = spawn_app().await;
    let res = expect_status(
        send(&app.app, get("/api/v1/registration/options")).await,
        StatusCode::OK,
    )
    .await;
    let body: Value = read_json(res).await;

    let values = |key: &str| -> Vec<String> {
        body[key]
            .as_array()
            .unwrap_or_else(|| panic!("{} should be an array", key))
            .iter()
            .map(|o| o["value"].as_str().expect("option value").to_string())
            .collect()
    };
    assert_eq!(values("gender"), ["male", "female", "other"]);
    assert_eq!(values("current_year_of_study"), ["1", "2", "3", "4"]);
    assert_eq!(values("team_strength"), ["2", "3", "4"]);
    assert_eq!(
        values("profession"),
        ["individual", "startup", "working_professional", "student"]
    );
}

#[tokio::test]
async fn happy_path_stores_linked_records_and_resets_form() {
    let app = spawn_app().await;
    let session_id = open_session(&app.app).await;
    let mobile = unique_mobile();
    fill_session(&app.app, &session_id, &mobile, "rohan@example.com", "Byte Busters").await;

    let res = expect_status(
        send(&app.app, post_empty(&submit_uri(&session_id))).await,
        StatusCode::CREATED,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["receipt"]["team"]["user_id"], body["receipt"]["participant"]["id"]);
    assert_eq!(body["notification"]["title"], "Success!");
    assert_eq!(body["notification"]["variant"], "default");

    let participants = app.store.participants().await;
    let teams = app.store.teams().await;
    assert_eq!(participants.len(), 1);
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0].user_id, participants[0].id);
    assert_eq!(participants[0].mobile, mobile);
    assert_eq!(teams[0].members.len(), 2);
    assert!(teams[0].members.iter().all(|m| !m.name.is_empty()));

    let res = expect_status(send(&app.app, get(&session_uri(&session_id))).await, StatusCode::OK).await;
    let view: Value = read_json(res).await;
    assert_eq!(view["state"]["state"], "succeeded");
    assert_eq!(view["form"]["user"]["name"], "");
    assert_eq!(view["form"]["team"]["members"], json!([]));
}

#[tokio::test]
async fn taken_mobile_fails_first_check_without_inserts() {
    let app = spawn_app().await;
    let mobile = unique_mobile();

    let first = open_session(&app.app).await;
    fill_session(&app.app, &first, &mobile, "first@example.com", "First Team").await;
    expect_status(send(&app.app, post_empty(&submit_uri(&first))).await, StatusCode::CREATED).await;
    let lookups_before = app.store.lookup_count();

    let second = open_session(&app.app).await;
    fill_session(&app.app, &second, &mobile, "second@example.com", "Second Team").await;
    let res = expect_status(
        send(&app.app, post_empty(&submit_uri(&second))).await,
        StatusCode::CONFLICT,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "This mobile number is already registered");

    assert_eq!(app.store.lookup_count() - lookups_before, 1);
    assert_eq!(app.store.participants().await.len(), 1);
    assert_eq!(app.store.teams().await.len(), 1);

    let res = expect_status(send(&app.app, get(&session_uri(&second))).await, StatusCode::OK).await;
    let view: Value = read_json(res).await;
    assert_eq!(view["state"]["state"], "failed");
    assert_eq!(view["form"]["user"]["email"], "second@example.com");
    assert_eq!(view["notification"]["variant"], "destructive");
}

#[tokio::test]
async fn taken_team_name_is_reported_after_contact_checks() {
    let app = spawn_app().await;

    let first = open_session(&app.app).await;
    fill_session(&app.app, &first, &unique_mobile(), "a@example.com", "Shared Name").await;
    expect_status(send(&app.app, post_empty(&submit_uri(&first))).await, StatusCode::CREATED).await;
    let lookups_before = app.store.lookup_count();

    let second = open_session(&app.app).await;
    fill_session(&app.app, &second, &unique_mobile(), "b@example.com", "Shared Name").await;
    let res = expect_status(
        send(&app.app, post_empty(&submit_uri(&second))).await,
        StatusCode::CONFLICT,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "This team name is already registered");
    assert_eq!(app.store.lookup_count() - lookups_before, 3);
}

#[tokio::test]
async fn team_insert_failure_leaves_participant_behind() {
    let app = spawn_app().await;
    let session_id = open_session(&app.app).await;
    fill_session(&app.app, &session_id, &unique_mobile(), "orphan@example.com", "Half Saved").await;
    app.store
        .fail_next(StoreOperation::InsertTeam, StoreError::new("connection reset by peer"))
        .await;

    let res = expect_status(
        send(&app.app, post_empty(&submit_uri(&session_id))).await,
        StatusCode::BAD_GATEWAY,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "connection reset by peer");

    assert_eq!(app.store.participants().await.len(), 1);
    assert!(app.store.teams().await.is_empty());

    let res = expect_status(send(&app.app, get(&session_uri(&session_id))).await, StatusCode::OK).await;
    let view: Value = read_json(res).await;
    assert_eq!(view["form"]["team"]["name"], "Half Saved");
    assert_eq!(view["notification"]["title"], "Error");
}

#[tokio::test]
async fn compensating_policy_removes_orphaned_participant() {
    let app = spawn_app_with_policy(PartialFailurePolicy::Compensate).await;
    let session_id = open_session(&app.app).await;
    fill_session(&app.app, &session_id, &unique_mobile(), "undo@example.com", "Rolled Back").await;
    app.store
        .fail_next(StoreOperation::InsertTeam, StoreError::new("statement timeout"))
        .await;

    expect_status(
        send(&app.app, post_empty(&submit_uri(&session_id))).await,
        StatusCode::BAD_GATEWAY,
    )
    .await;
    assert!(app.store.participants().await.is_empty());
    assert!(app.store.teams().await.is_empty());
}

#[tokio::test]
async fn lookup_failure_is_not_reported_as_conflict() {
    let app = spawn_app().await;
    let session_id = open_session(&app.app).await;
    fill_session(&app.app, &session_id, &unique_mobile(), "net@example.com", "Offline").await;
    app.store
        .fail_next(StoreOperation::Lookup, StoreError::new("fetch failed"))
        .await;

    let res = expect_status(
        send(&app.app, post_empty(&submit_uri(&session_id))).await,
        StatusCode::BAD_GATEWAY,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "fetch failed");
    assert!(app.store.participants().await.is_empty());
}

#[tokio::test]
async fn invalid_form_returns_field_errors_without_store_calls() {
    let app = spawn_app().await;
    let session_id = open_session(&app.app).await;
    fill_session(&app.app, &session_id, "98765432a0", "bad@example.com", "Typos").await;

    let res = expect_status(
        send(&app.app, post_empty(&submit_uri(&session_id))).await,
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(
        body["fields"]["user.mobile"],
        json!(["Mobile number must contain only digits"])
    );
    assert_eq!(app.store.lookup_count(), 0);

    let res = expect_status(send(&app.app, get(&session_uri(&session_id))).await, StatusCode::OK).await;
    let view: Value = read_json(res).await;
    assert!(view["field_errors"]["user.mobile"].is_array());
    assert!(view["notification"].is_null());
}

#[tokio::test]
async fn busy_session_rejects_submit_and_edits() {
    let app = spawn_app().await;
    let session_id = open_session(&app.app).await;
    let session = app
        .sessions
        .get(Uuid::parse_str(&session_id).expect("session id"))
        .await
        .expect("session should exist");
    let guard = acquire(&session).expect("session should be free");

    let res = expect_status(
        send(&app.app, post_empty(&submit_uri(&session_id))).await,
        StatusCode::CONFLICT,
    )
    .await;
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "A submission is already in progress");

    expect_status(
        send(
            &app.app,
            put_json(
                &format!("{}/participant", session_uri(&session_id)),
                participant_json("9000000000", "x@example.com"),
            ),
        )
        .await,
        StatusCode::CONFLICT,
    )
    .await;

    drop(guard);
    expect_status(send(&app.app, get(&session_uri(&session_id))).await, StatusCode::OK).await;
}

#[tokio::test]
async fn team_size_changes_resize_member_entries() {
    let app = spawn_app().await;
    let session_id = open_session(&app.app).await;
    let uri = format!("{}/team/strength", session_uri(&session_id));

    for (strength, expected) in [("4", 3), ("2", 1), ("3", 2), ("3", 2)] {
        let res = expect_status(
            send(&app.app, put_json(&uri, json!({ "strength": strength }))).await,
            StatusCode::OK,
        )
        .await;
        let view: Value = read_json(res).await;
        assert_eq!(view["form"]["team"]["strength"], strength);
        assert_eq!(
            view["form"]["team"]["members"].as_array().map(Vec::len),
            Some(expected)
        );
    }

    expect_status(
        send(&app.app, put_json(&uri, json!({ "strength": "5" }))).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = spawn_app().await;
    expect_status(
        send(&app.app, get(&session_uri(&Uuid::now_v7().to_string()))).await,
        StatusCode::NOT_FOUND,
    )
    .await;

    let session_id = open_session(&app.app).await;
    expect_status(
        send(
            &app.app,
            put_json(
                &format!("{}/team/members/{}", session_uri(&session_id), Uuid::now_v7()),
                json!({ "name": "Ghost", "email": "", "role": "" }),
            ),
        )
        .await,
        StatusCode::NOT_FOUND,
    )
    .await;
}

#[tokio::test]
async fn deleted_session_is_gone() {
    let app = spawn_app().await;
    let session_id = open_session(&app.app).await;
    let req = axum::http::Request::builder()
        .method("DELETE")
        .uri(session_uri(&session_id))
        .body(axum::body::Body::empty())
        .expect("failed to build DELETE request");
    expect_status(send(&app.app, req).await, StatusCode::NO_CONTENT).await;
    expect_status(
        send(&app.app, get(&session_uri(&session_id))).await,
        StatusCode::NOT_FOUND,
    )
    .await;
}
