//! HTTP tests for the fleet API over the in-memory store.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use fleet_server::config::Config;
use fleet_server::{app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn router() -> Router {
    app(AppState::in_memory(Config::default()))
}

fn router_with_reset() -> Router {
    app(AppState::in_memory(Config {
        enable_reset: true,
        ..Config::default()
    }))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn create_ship(app: &Router, name: &str, displacement: i64) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/ships",
        Some(json!({"name": name, "displacement": displacement})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["shipID"].as_i64().unwrap()
}

async fn create_crew_member(app: &Router, ship_id: i64, name: &str, role: &str) -> i64 {
    let uri = format!("/ships/{ship_id}/crewmembers");
    let (status, body) = send(
        app,
        Method::POST,
        &uri,
        Some(json!({"name": name, "role": role})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["crewMemberID"].as_i64().unwrap()
}

fn ids(body: &Value) -> Vec<i64> {
    body["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|ship| ship["shipID"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn health_and_banner() {
    let app = router();

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");

    let (status, _) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn created_ship_reads_back_under_a_fresh_key() {
    let app = router();
    let first = create_ship(&app, "Argo", 120).await;
    let second = create_ship(&app, "Beagle", 250).await;
    assert_ne!(first, second);

    let (status, body) = get(&app, &format!("/ship/{second}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"shipID": second, "name": "Beagle", "displacement": 250})
    );
}

#[tokio::test]
async fn invalid_ships_are_rejected_without_writing() {
    let app = router();
    create_ship(&app, "Argo", 120).await;

    for body in [
        json!({"name": "Beagle", "displacement": 49}),
        json!({"name": "Be", "displacement": 120}),
    ] {
        let (status, body) = send(&app, Method::POST, "/ships", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    let (_, body) = get(&app, "/ships").await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn displacement_may_arrive_as_text() {
    let app = router();
    let (status, body) = send(
        &app,
        Method::POST,
        "/ships",
        Some(json!({"name": "Argo", "displacement": "120"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["displacement"], 120);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = router();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/ships")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_or_malformed_ids_are_not_found() {
    let app = router();

    let (status, body) = get(&app, "/ship/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "not found");

    let (status, _) = get(&app, "/ship/argo").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/ships/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_list_is_an_empty_page() {
    let app = router();
    let (status, body) = get(&app, "/ships?name=nothing").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"records": [], "count": 0}));
}

#[tokio::test]
async fn pages_are_disjoint_and_ordered() {
    let app = router();
    for (name, displacement) in [("Argo", 300), ("Beagle", 100), ("Cutty", 200)] {
        create_ship(&app, name, displacement).await;
    }

    let sorted = "/ships?sortField=displacement&sortOrder=1";
    let (_, all) = get(&app, sorted).await;
    let (_, first) = get(&app, &format!("{sorted}&pageSize=2&page=0")).await;
    let (_, second) = get(&app, &format!("{sorted}&pageSize=2&page=1")).await;

    assert_eq!(ids(&first).len(), 2);
    assert_eq!(ids(&second).len(), 1);
    assert_eq!([ids(&first), ids(&second)].concat(), ids(&all));
    assert_eq!(first["count"], 3);
    assert_eq!(second["count"], 3);
}

#[tokio::test]
async fn default_page_size_applies_when_only_page_is_given() {
    let app = router();
    for name in ["Argo", "Beagle", "Cutty"] {
        create_ship(&app, name, 100).await;
    }

    let (_, body) = get(&app, "/ships?page=0").await;
    assert_eq!(ids(&body).len(), 2);
    assert_eq!(body["count"], 3);
}

#[tokio::test]
async fn descending_displacement_sort() {
    let app = router();
    for (name, displacement) in [("Argo", 150), ("Beagle", 900), ("Cutty", 400)] {
        create_ship(&app, name, displacement).await;
    }

    let (status, body) = get(&app, "/ships?sortField=displacement&sortOrder=-1").await;
    assert_eq!(status, StatusCode::OK);

    let displacements: Vec<i64> = body["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|ship| ship["displacement"].as_i64().unwrap())
        .collect();
    assert_eq!(displacements, vec![900, 400, 150]);
}

#[tokio::test]
async fn count_follows_the_filter() {
    let app = router();
    create_ship(&app, "Argo", 100).await;
    create_ship(&app, "Argonaut", 200).await;
    create_ship(&app, "Beagle", 100).await;

    let (_, body) = get(&app, "/ships?name=Argo&page=0&pageSize=1").await;
    assert_eq!(ids(&body).len(), 1);
    assert_eq!(body["count"], 2);

    let (_, body) = get(&app, "/ships?displacement=100").await;
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn bad_query_parameters_are_rejected() {
    let app = router();
    for uri in [
        "/ships?sortField=shipID",
        "/ships?sortOrder=desc",
        "/ships?displacement=heavy",
        "/ships?page=-1",
        "/ships?page=0&pageSize=0",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["message"].is_string());
    }

    let (status, _) = get(&app, "/ships?sortField=&page=&colour=red").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn update_replaces_given_fields_and_ignores_keys() {
    let app = router();
    let ship_id = create_ship(&app, "Argo", 120).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/ships/{ship_id}"),
        Some(json!({"shipID": 999, "displacement": 500})),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(
        body,
        json!({"shipID": ship_id, "name": "Argo", "displacement": 500})
    );

    let (status, _) = send(
        &app,
        Method::PUT,
        "/ships/999",
        Some(json!({"displacement": 500})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn crew_lifecycle() {
    let app = router();
    let ship_id = create_ship(&app, "Argo", 120).await;
    let base = format!("/ships/{ship_id}/crewmembers");

    let (status, body) = get(&app, &base).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let captain = create_crew_member(&app, ship_id, "Haddock", "CAPTAIN").await;
    create_crew_member(&app, ship_id, "Tintin Jr", "BOATSWAIN").await;

    let (_, body) = get(&app, &base).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("{base}/{captain}"),
        Some(json!({"role": "BOATSWAIN"})),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(
        body,
        json!({
            "crewMemberID": captain,
            "name": "Haddock",
            "role": "BOATSWAIN",
            "shipID": ship_id
        })
    );

    let (status, body) = send(&app, Method::DELETE, &format!("{base}/{captain}"), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, json!({"message": "accepted"}));

    let (status, _) = get(&app, &format!("{base}/{captain}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_crew_member_is_not_found() {
    let app = router();
    let ship_id = create_ship(&app, "Argo", 120).await;

    let (status, body) = get(&app, &format!("/ships/{ship_id}/crewmembers/7")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "not found");
}

#[tokio::test]
async fn crew_of_missing_ship_is_not_found() {
    let app = router();

    let (status, _) = get(&app, "/ships/5/crewmembers").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        "/ships/5/crewmembers",
        Some(json!({"name": "Haddock", "role": "CAPTAIN"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn crew_member_validation() {
    let app = router();
    let ship_id = create_ship(&app, "Argo", 120).await;
    let base = format!("/ships/{ship_id}/crewmembers");

    let (status, body) = send(
        &app,
        Method::POST,
        &base,
        Some(json!({"name": "Haddock", "role": "ENSIGN"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "incorrect role: ENSIGN");

    let (status, _) = send(
        &app,
        Method::POST,
        &base,
        Some(json!({"name": "Bob", "role": "CAPTAIN"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = get(&app, &base).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn crew_member_without_role() {
    let app = router();
    let body = json!({"name": "Haddock"});

    let (status, reply) = send(
        &app,
        Method::POST,
        "/ships/77/crewmembers",
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(reply["message"], "not found");

    let ship_id = create_ship(&app, "Argo", 120).await;
    let base = format!("/ships/{ship_id}/crewmembers");

    let (status, reply) = send(&app, Method::POST, &base, Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(reply["message"]
        .as_str()
        .unwrap()
        .starts_with("incorrect role"));

    for role in [json!(null), json!(5)] {
        let (status, reply) = send(
            &app,
            Method::POST,
            &base,
            Some(json!({"name": "Haddock", "role": role})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(reply["message"]
            .as_str()
            .unwrap()
            .starts_with("incorrect role"));
    }

    let (_, reply) = get(&app, &base).await;
    assert_eq!(reply, json!([]));
}

#[tokio::test]
async fn crew_member_belongs_to_path_ship() {
    let app = router();
    let ship_id = create_ship(&app, "Argo", 120).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/ships/{ship_id}/crewmembers"),
        Some(json!({"name": "Haddock", "role": "CAPTAIN", "shipID": 999})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["shipID"], ship_id);

    let (status, _) = get(&app, "/ships/999/crewmembers").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, crew) = get(&app, &format!("/ships/{ship_id}/crewmembers")).await;
    assert_eq!(crew.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn crew_member_is_scoped_by_ship() {
    let app = router();
    let argo = create_ship(&app, "Argo", 120).await;
    let beagle = create_ship(&app, "Beagle", 200).await;
    let member = create_crew_member(&app, argo, "Haddock", "CAPTAIN").await;

    let (status, _) = get(&app, &format!("/ships/{beagle}/crewmembers/{member}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/ships/{beagle}/crewmembers/{member}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_ship_removes_its_crew() {
    let app = router();
    let ship_id = create_ship(&app, "Argo", 120).await;
    let member = create_crew_member(&app, ship_id, "Haddock", "CAPTAIN").await;

    let (status, body) = send(&app, Method::DELETE, &format!("/ships/{ship_id}"), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["message"], "accepted");

    let (status, _) = get(&app, &format!("/ships/{ship_id}/crewmembers/{member}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, &format!("/ship/{ship_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reset_is_hidden_unless_enabled() {
    let app = router();
    create_ship(&app, "Argo", 120).await;

    let (status, _) = get(&app, "/sync").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get(&app, "/ships").await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn reset_empties_the_fleet_without_reusing_keys() {
    let app = router_with_reset();
    let before = create_ship(&app, "Argo", 120).await;
    create_crew_member(&app, before, "Haddock", "CAPTAIN").await;

    let (status, body) = get(&app, "/sync").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"message": "created"}));

    let (_, body) = get(&app, "/ships").await;
    assert_eq!(body["count"], 0);

    let after = create_ship(&app, "Beagle", 200).await;
    assert!(after > before);
}
