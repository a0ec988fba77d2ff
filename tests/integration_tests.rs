//! Integration tests using mock HTTP server
//!
//! Tests the full flow: credential resolution → HTTP requests → typed records

use deepint::auth::{Credentials, MapEnv, StaticConfig};
use deepint::models::{
    FeatureType, InstanceTable, ModelMethod, ModelType, NewModel, Source, SourceType, TaskStatus,
};
use deepint::types::{JsonObject, StringMap};
use deepint::{Client, Error, Lookup, ModelCreation, ResolveOptions};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    let credentials = Credentials::builder()
        .token("test-token")
        .organization("org-1")
        .instance(server.uri())
        .env(MapEnv::new())
        .config(StaticConfig::empty())
        .resolve()
        .unwrap();
    Client::new(credentials).unwrap()
}

fn page(page: u64, pages_count: u64, items: serde_json::Value) -> serde_json::Value {
    json!({ "page": page, "pages_count": pages_count, "items": items })
}

// ============================================================================
// Credentials
// ============================================================================

#[tokio::test]
async fn test_config_file_credentials_reach_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workspaces"))
        .and(header("Authorization", "Bearer abc123"))
        .and(header("x-deepint-organization", "org-file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0, 1, json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[DEFAULT]\ntoken=abc123\norganization=org-file\ninstance={}",
        server.uri()
    )
    .unwrap();

    let credentials = Credentials::builder()
        .env(MapEnv::new())
        .config_file(file.path())
        .resolve()
        .unwrap();
    assert_eq!(credentials.token().unwrap(), "abc123");

    let workspaces = Client::new(credentials)
        .unwrap()
        .organization()
        .unwrap()
        .list_workspaces()
        .await
        .unwrap();
    assert!(workspaces.is_empty());
}

#[tokio::test]
async fn test_missing_token_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let credentials = Credentials::builder()
        .organization("org-1")
        .instance(server.uri())
        .env(MapEnv::new())
        .config(StaticConfig::empty())
        .resolve()
        .unwrap();
    let err = Client::new(credentials)
        .unwrap()
        .organization()
        .unwrap()
        .list_workspaces()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingCredentials { ref field } if field == "token"));
}

// ============================================================================
// Workspaces and sources
// ============================================================================

#[tokio::test]
async fn test_workspace_lifecycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/workspaces"))
        .and(body_json(json!({ "name": "sales", "description": "q3" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "workspace_id": "ws-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workspace/ws-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "workspace_id": "ws-1",
            "name": "sales",
            "description": "q3",
            "created": "2023-01-05T10:00:00",
            "sources_count": "2"
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/workspace/ws-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let org = client_for(&server).organization().unwrap();
    let ws = org.create_workspace("sales", "q3").await.unwrap();
    assert_eq!(ws.id(), "ws-1");

    let info = ws.info().await.unwrap();
    assert_eq!(info.id, "ws-1");
    assert_eq!(info.sources_count, 2);
    assert!(info.created.is_some());

    ws.delete().await.unwrap();
}

#[tokio::test]
async fn test_sources_listing_follows_pages() {
    let server = MockServer::start().await;
    for (n, id) in [(0, "src-a"), (1, "src-b"), (2, "src-c")] {
        Mock::given(method("GET"))
            .and(path("/api/v1/workspace/ws-1/sources"))
            .and(query_param("page", n.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(
                n,
                3,
                json!([{ "source_id": id, "name": id, "type": "csv" }]),
            )))
            .expect(1)
            .mount(&server)
            .await;
    }

    let ws = client_for(&server).organization().unwrap().workspace("ws-1");
    let sources = ws.list_sources().await.unwrap();
    let ids: Vec<_> = sources.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["src-a", "src-b", "src-c"]);
    assert!(sources.iter().all(|s| s.source_type == SourceType::Csv));
}

#[tokio::test]
async fn test_fetch_real_time_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workspace/ws-1/source/src-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "src-1",
            "name": "sensors",
            "type": "real_time",
            "max_age": 3600,
            "features": [{ "index": 0, "name": "temp", "type": "numeric" }]
        })))
        .mount(&server)
        .await;

    let source = client_for(&server)
        .organization()
        .unwrap()
        .workspace("ws-1")
        .source("src-1")
        .fetch()
        .await
        .unwrap();
    match source {
        Source::RealTime(rt) => {
            assert_eq!(rt.max_age, 3600);
            assert_eq!(rt.features.len(), 1);
        }
        other => panic!("unexpected source: {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_source_type_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workspace/ws-1/source/src-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "src-1",
            "name": "mystery",
            "type": "hologram"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .organization()
        .unwrap()
        .workspace("ws-1")
        .source("src-1")
        .fetch()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { ref record, .. } if record == "source"));
}

#[tokio::test]
async fn test_create_and_initialize_source() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/workspace/ws-1/sources"))
        .and(body_partial_json(json!({
            "name": "sales",
            "features": [
                { "name": "city", "type": "nominal" },
                { "name": "amount", "type": "numeric" },
                { "name": "day", "type": "date", "date_format": "YYYY-MM-DD" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "source_id": "src-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/workspace/ws-1/source/src-1/instances"))
        .and(body_json(json!({
            "replace": false,
            "data": "city,amount,day\nMadrid,4,2023-01-01\n\"Lisbon, PT\",7,2023-01-02\n"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "task_id": "task-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workspace/ws-1/task/task-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "task-1", "status": "success" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let table = InstanceTable::try_new(
        vec!["city".into(), "amount".into(), "day".into()],
        vec![
            vec![json!("Madrid"), json!(4), json!("2023-01-01")],
            vec![json!("Lisbon, PT"), json!(7), json!("2023-01-02")],
        ],
    )
    .unwrap();
    let mut formats = StringMap::new();
    formats.insert("day".into(), "YYYY-MM-DD".into());

    let source = client_for(&server)
        .organization()
        .unwrap()
        .workspace("ws-1")
        .create_and_initialize_source("sales", "", &table, &formats, true)
        .await
        .unwrap();
    assert_eq!(source.id(), "src-1");
    assert_eq!(table.infer_features(&formats)[2].feature_type, FeatureType::Date);
}

// ============================================================================
// Tasks and models
// ============================================================================

#[tokio::test]
async fn test_model_training_waits_for_task() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workspace/ws-1/source/src-1/features"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "index": 0, "name": "sepal", "type": "numeric" },
            { "index": 1, "name": "species", "type": "nominal" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/workspace/ws-1/models"))
        .and(body_partial_json(json!({ "method": "tree", "type": "classifier", "target": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "task_id": "task-9" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workspace/ws-1/task/task-9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "task-9", "status": "running" })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workspace/ws-1/task/task-9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "task-9", "status": "success" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workspace/ws-1/task/task-9/result"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "model": "mdl-1" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workspace/ws-1/models/mdl-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "mdl-1",
            "name": "iris",
            "type": "classifier",
            "method": "tree",
            "source": "src-1"
        })))
        .mount(&server)
        .await;

    let model = NewModel::new(
        "iris",
        ModelType::Classifier,
        ModelMethod::Tree,
        "src-1",
        "species",
    );
    let ws = client_for(&server).organization().unwrap().workspace("ws-1");

    let created = ws.create_model(&model, true).await.unwrap();
    match created {
        ModelCreation::Created(info) => {
            assert_eq!(info.id, "mdl-1");
            assert_eq!(info.source_id.as_deref(), Some("src-1"));
        }
        ModelCreation::Pending(task) => panic!("task {} still pending", task.id()),
    }
}

#[tokio::test]
async fn test_model_target_must_exist() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workspace/ws-1/source/src-1/features"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "index": 0, "name": "sepal", "type": "numeric" }])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/workspace/ws-1/models"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let model = NewModel::new("m", ModelType::Regressor, ModelMethod::Linear, "src-1", "price");
    let err = client_for(&server)
        .organization()
        .unwrap()
        .workspace("ws-1")
        .create_model(&model, false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { ref code, .. } if code == "SOURCE_MISMATCH"));
}

#[tokio::test]
async fn test_failed_task_surfaces_platform_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workspace/ws-1/task/task-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "task-1",
            "status": "failed",
            "error_code": "INVALID_DATA",
            "error_description": "column 2 is not numeric"
        })))
        .mount(&server)
        .await;

    let task = client_for(&server)
        .task_from_url(
            "https://app.deepint.net/o/org-1/workspace?ws=ws-1&s=task&i=task-1",
            None,
        )
        .unwrap();
    let err = task
        .resolve(&ResolveOptions::default().poll_interval(Duration::from_millis(5)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TaskFailed { ref code, .. } if code == "INVALID_DATA"));
}

#[tokio::test]
async fn test_pending_tasks_by_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workspace/ws-1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            0,
            1,
            json!([
                { "task_id": "t1", "status": "pending", "progress": "0.5" },
                { "task_id": "t2", "status": "failed" }
            ]),
        )))
        .mount(&server)
        .await;

    let tasks = client_for(&server)
        .organization()
        .unwrap()
        .workspace("ws-1")
        .tasks_by_status(TaskStatus::Pending)
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].progress, Some(0.5));
}

// ============================================================================
// Errors and custom endpoints
// ============================================================================

#[tokio::test]
async fn test_api_error_carries_platform_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workspaces"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": "FORBIDDEN",
            "message": "token has no access to this organization"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .organization()
        .unwrap()
        .find_workspace(Lookup::Name("sales"))
        .await
        .unwrap_err();
    match err {
        Error::Api { status, code, .. } => {
            assert_eq!(status, 403);
            assert_eq!(code, "FORBIDDEN");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_custom_endpoint_post_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/workspace/ws-1/source/src-1/query"))
        .and(header("x-deepint-organization", "org-1"))
        .and(body_json(json!({ "where": "amount > 1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 3 })))
        .expect(1)
        .mount(&server)
        .await;

    let mut params = JsonObject::new();
    params.insert("where".into(), json!("amount > 1"));
    let body = client_for(&server)
        .custom_endpoint()
        .unwrap()
        .call("post", "workspace/ws-1/source/src-1/query", StringMap::new(), params)
        .await
        .unwrap();
    assert_eq!(body["count"], 3);
}
