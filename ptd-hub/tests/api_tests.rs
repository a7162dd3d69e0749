//! Integration tests for ptd-hub API endpoints
//!
//! Tests cover:
//! - Health endpoint (no session required)
//! - Session roles on mutating endpoints
//! - Program creation from templates
//! - Partial updates through the audit-diff pipeline
//! - Audit trail ordering
//! - Overview counters

use axum::body::Body;
use axum::http::{Request, StatusCode};
use ptd_hub::store::ProgramStore;
use ptd_hub::{build_router, AppState};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: app on a fresh tempfile database. The TempDir must stay
/// alive for the duration of the test.
async fn setup_app() -> (axum::Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let pool = ptd_hub::db::init_database(&dir.path().join("ptd.db"))
        .await
        .expect("Should init database");
    let state = AppState::new(ProgramStore::new(pool));
    (build_router(state), dir)
}

fn coordinator_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-ptd-user", "Alice")
        .header("x-ptd-role", "coordinator")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn viewer_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-ptd-user", "Bob")
        .header("x-ptd-role", "viewer")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Create one program as coordinator and return its JSON.
async fn create_program(app: &axum::Router, seed: Value) -> Value {
    let response = app
        .clone()
        .oneshot(coordinator_request("POST", "/api/programs", seed))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    extract_json(response.into_body()).await
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_no_session_required() {
    let (app, _dir) = setup_app().await;

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "ptd-hub");
    assert!(body["version"].is_string());
}

// =============================================================================
// Session roles
// =============================================================================

#[tokio::test]
async fn test_viewer_cannot_create_programs() {
    let (app, _dir) = setup_app().await;

    let response = app
        .clone()
        .oneshot(viewer_request("POST", "/api/programs", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Anonymous (no identity headers) is a viewer too.
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/programs")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_viewer_can_read() {
    let (app, _dir) = setup_app().await;

    for uri in ["/api/programs", "/api/history", "/api/overview"] {
        let response = app.clone().oneshot(get_request(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "GET {} should be open", uri);
    }
}

// =============================================================================
// Program creation
// =============================================================================

#[tokio::test]
async fn test_create_program_from_templates() {
    let (app, _dir) = setup_app().await;

    let program = create_program(
        &app,
        json!({"nome": "Programa Leite", "tipo": "bottom-up"}),
    )
    .await;

    assert_eq!(program["nome"], "Programa Leite");
    assert_eq!(program["tipo"], "bottom-up");
    assert_eq!(program["coordenador"], "A designar");
    assert_eq!(program["statusGT"], "nao-nomeado");
    assert_eq!(program["statusCGProg"], "nao-instituido");
    assert_eq!(program["percentualConclusao"], 0);
    assert_eq!(program["percentualCGProg"], 0);
    assert_eq!(program["checklist"].as_array().unwrap().len(), 14);
    assert_eq!(program["checklistCGProg"].as_array().unwrap().len(), 10);
    assert_eq!(program["checklistSintese"].as_array().unwrap().len(), 11);

    // It shows up in the collection read.
    let response = app.oneshot(get_request("/api/programs")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    let programs = body.as_array().unwrap();
    assert_eq!(programs.len(), 1);
    assert_eq!(programs[0]["id"], program["id"]);
}

// =============================================================================
// Updates and the audit trail
// =============================================================================

#[tokio::test]
async fn test_update_diffs_only_changed_fields() {
    let (app, _dir) = setup_app().await;
    let program = create_program(&app, json!({"nome": "Programa Soja"})).await;
    let id = program["id"].as_str().unwrap();

    // statusGT is sent unchanged; only coordenador differs.
    let response = app
        .clone()
        .oneshot(coordinator_request(
            "PUT",
            &format!("/api/programs/{}", id),
            json!({"coordenador": "Bob", "statusGT": "nao-nomeado"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = extract_json(response.into_body()).await;
    assert_eq!(updated["coordenador"], "Bob");
    assert!(updated["dataUltimaAtualizacao"].as_str().unwrap().len() >= 10);

    let response = app.oneshot(get_request("/api/history")).await.unwrap();
    let history = extract_json(response.into_body()).await;
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["campo"], "coordenador");
    assert_eq!(entries[0]["valorAnterior"], "A designar");
    assert_eq!(entries[0]["valorNovo"], "Bob");
    assert_eq!(entries[0]["usuario"], "Alice");
    assert_eq!(entries[0]["programId"], id);
    assert_eq!(entries[0]["programName"], "Programa Soja");
}

#[tokio::test]
async fn test_checklist_update_recomputes_percentages_without_entries() {
    let (app, _dir) = setup_app().await;
    let program = create_program(&app, json!({})).await;
    let id = program["id"].as_str().unwrap();

    // Complete half of the CGProg checklist.
    let mut checklist_cgprog = program["checklistCGProg"].as_array().unwrap().clone();
    for item in checklist_cgprog.iter_mut().take(5) {
        item["concluido"] = json!(true);
    }

    let response = app
        .clone()
        .oneshot(coordinator_request(
            "PUT",
            &format!("/api/programs/{}", id),
            json!({"checklistCGProg": checklist_cgprog}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = extract_json(response.into_body()).await;
    // 5 of 24 items overall -> 21; 5 of 10 in CGProg -> 50.
    assert_eq!(updated["percentualConclusao"], 21);
    assert_eq!(updated["percentualCGProg"], 50);

    // Checklist edits generate no per-field audit entries.
    let response = app.oneshot(get_request("/api/history")).await.unwrap();
    let history = extract_json(response.into_body()).await;
    assert_eq!(history.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_update_unknown_program_is_404() {
    let (app, _dir) = setup_app().await;

    let response = app
        .oneshot(coordinator_request(
            "PUT",
            "/api/programs/nope",
            json!({"coordenador": "Bob"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_viewer_cannot_update() {
    let (app, _dir) = setup_app().await;
    let program = create_program(&app, json!({})).await;
    let id = program["id"].as_str().unwrap();

    let response = app
        .oneshot(viewer_request(
            "PUT",
            &format!("/api/programs/{}", id),
            json!({"coordenador": "Mallory"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_history_newest_first_across_updates() {
    let (app, _dir) = setup_app().await;
    let program = create_program(&app, json!({})).await;
    let id = program["id"].as_str().unwrap();

    for (campo, value) in [("coordenador", "Bob"), ("pontoFocalSGPG", "Carla")] {
        let response = app
            .clone()
            .oneshot(coordinator_request(
                "PUT",
                &format!("/api/programs/{}", id),
                json!({ campo: value }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        // Timestamps have millisecond precision; keep the two updates apart.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let response = app.oneshot(get_request("/api/history")).await.unwrap();
    let history = extract_json(response.into_body()).await;
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // Newest first.
    assert_eq!(entries[0]["campo"], "pontoFocalSGPG");
    assert_eq!(entries[1]["campo"], "coordenador");
    assert!(
        entries[0]["dataHora"].as_str().unwrap() >= entries[1]["dataHora"].as_str().unwrap()
    );
}

// =============================================================================
// Overview
// =============================================================================

#[tokio::test]
async fn test_overview_counters() {
    let (app, _dir) = setup_app().await;
    let first = create_program(&app, json!({"nome": "Primeiro"})).await;
    // Program ids are timestamp-derived; keep the two creations apart.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let _second = create_program(&app, json!({"nome": "Segundo", "tipo": "bottom-up"})).await;

    // Push the first program's GT ladder to concluded.
    let id = first["id"].as_str().unwrap();
    let response = app
        .clone()
        .oneshot(coordinator_request(
            "PUT",
            &format!("/api/programs/{}", id),
            json!({"statusGT": "concluido"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/api/overview")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;

    assert_eq!(body["totalProgramas"], 2);
    assert_eq!(body["topDown"], 1);
    assert_eq!(body["bottomUp"], 1);
    assert_eq!(body["gtsConcluidos"], 1);
    assert_eq!(body["cgprogsAtivos"], 0);
    // One program has a single concluded stage (16.66 -> 17), one has none;
    // the mean is 8.5, rounded half away from zero.
    assert_eq!(body["programasEmAndamento"], 1);
    assert_eq!(body["programasNaoIniciados"], 1);
    assert_eq!(body["programasConcluidos"], 0);
    assert_eq!(body["mediaConclusao"], 9);
}
