//! API tests: the router driven in-process over a mocked remote API

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use progresando_server::{
    api,
    config::{AppConfig, GatewayConfig},
    gateway::HttpGateway,
    services::Services,
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(server: &MockServer, api_tokens: Vec<String>) -> Router {
    let mut config = AppConfig::default();
    config.gateway = GatewayConfig {
        base_url: server.uri(),
        api_token: None,
        timeout_secs: 5,
    };
    config.auth.api_tokens = api_tokens;
    config.maintenance.alerts_enabled = false;

    let gateway = Arc::new(HttpGateway::new(&config.gateway).expect("gateway"));
    let services = Services::new(gateway, &config.maintenance, config.email.clone());
    api::create_router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Fleet of three: E1 with an ok and an overdue schedule, E2 due soon, E3
/// with a malformed start date.
async fn mount_fleet(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/equipos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "nombre": "Monitor de signos vitales"},
            {"id": 2, "nombre": "Autoclave"},
            {"id": 3, "nombre": "Bascula"},
            {"id": 4, "nombre": "Equipo de baja", "activo": false}
        ])))
        .mount(server)
        .await;

    let schedules = [
        (
            1,
            json!([
                {"id": 10, "equipment_id": 1, "maintenance_type_id": 1, "interval_days": 365, "start_date": "2025-01-01"},
                {"id": 11, "equipment_id": 1, "maintenance_type_id": 2, "interval_days": 9, "start_date": "2025-01-01"}
            ]),
        ),
        (
            2,
            json!([
                {"id": 20, "equipment_id": 2, "maintenance_type_id": 1, "interval_days": 15, "start_date": "2025-01-01"}
            ]),
        ),
        (
            3,
            json!([
                {"id": 30, "equipment_id": 3, "maintenance_type_id": 1, "interval_days": 30, "start_date": "01/01/2025"}
            ]),
        ),
    ];
    for (id, body) in schedules {
        Mock::given(method("GET"))
            .and(path(format!("/equipos/{}/mantenimientos", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    // E2 was maintained on 2025-01-05, moving its due date to 2025-01-20
    Mock::given(method("GET"))
        .and(path("/equipos/2/eventos-mantenimiento"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"equipment_id": 2, "schedule_id": 20, "performed_date": "2025-01-05", "performed_by": "Luis"}
        ])))
        .mount(server)
        .await;
    for id in [1, 3] {
        Mock::given(method("GET"))
            .and(path(format!("/equipos/{}/eventos-mantenimiento", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;
    let (status, body) = send(app(&server, vec![]), get("/api/v1/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_follows_gateway() {
    let server = MockServer::start().await;
    let (status, body) = send(app(&server, vec![]), get("/api/v1/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "gateway_unavailable");

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let (status, _) = send(app(&server, vec![]), get("/api/v1/ready")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_fleet_status() {
    let server = MockServer::start().await;
    mount_fleet(&server).await;

    let (status, body) = send(
        app(&server, vec![]),
        get("/api/v1/maintenance/status?today=2025-01-15"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let equipment = &body["equipment"];
    assert_eq!(equipment["1"]["status"], "overdue");
    assert_eq!(equipment["1"]["causes"].as_array().unwrap().len(), 1);
    assert_eq!(equipment["1"]["causes"][0]["schedule_id"], 11);
    assert_eq!(equipment["1"]["causes"][0]["days_overdue"], 5);
    assert_eq!(equipment["2"]["status"], "due_soon");
    assert_eq!(equipment["2"]["schedules"][0]["next_due_date"], "2025-01-20");
    assert_eq!(equipment["3"]["status"], "unknown");
    assert!(equipment.get("4").is_none());

    assert_eq!(body["summary"]["overdue"], 1);
    assert_eq!(body["summary"]["due_soon"], 1);
    assert_eq!(body["summary"]["unknown"], 1);
    assert_eq!(body["warning_window_days"], 7);
}

#[tokio::test]
async fn test_alerts_badge_and_polling() {
    let server = MockServer::start().await;
    mount_fleet(&server).await;

    let (status, body) = send(
        app(&server, vec![]),
        get("/api/v1/maintenance/alerts?today=2025-01-15"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["badge_count"], 2);
    assert_eq!(body["keep_polling"], true);
    assert_eq!(body["alerts"][0]["equipment_id"], 1);
    assert_eq!(body["alerts"][1]["equipment_id"], 2);
}

#[tokio::test]
async fn test_equipment_maintenance_status() {
    let server = MockServer::start().await;
    mount_fleet(&server).await;
    Mock::given(method("GET"))
        .and(path("/equipos/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2, "name": "Autoclave"})))
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server, vec![]),
        get("/api/v1/equipment/2/maintenance?today=2025-01-01&warning_window_days=30"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Autoclave");
    assert_eq!(body["status"], "due_soon");
    assert_eq!(body["schedules"][0]["days_until_due"], 19);
}

#[tokio::test]
async fn test_next_due_scenario() {
    let server = MockServer::start().await;
    let request = json!({
        "schedule": {
            "id": 1,
            "equipment_id": 1,
            "maintenance_type_id": 1,
            "interval_days": 15,
            "start_date": "2025-01-01"
        },
        "events": [
            {"equipment_id": 1, "schedule_id": 1, "performed_date": "2025-03-01", "performed_by": "a"},
            {"equipment_id": 1, "schedule_id": 1, "performed_date": "2025-02-01", "performed_by": "b"}
        ],
        "today": "2025-03-20"
    });

    let (status, body) = send(app(&server, vec![]), post_json("/api/v1/maintenance/next-due", request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["next_due_date"], "2025-03-16");
    assert_eq!(body["source"], "derived");
    assert_eq!(body["status"], "overdue");
}

#[tokio::test]
async fn test_next_due_rejects_zero_interval() {
    let server = MockServer::start().await;
    let request = json!({
        "schedule": {
            "id": 1,
            "equipment_id": 1,
            "maintenance_type_id": 1,
            "interval_days": 0,
            "start_date": "2025-01-01"
        }
    });

    let (status, body) = send(app(&server, vec![]), post_json("/api/v1/maintenance/next-due", request)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "InvalidSchedule");
}

#[tokio::test]
async fn test_create_schedule_rejects_invalid_interval_and_date() {
    let server = MockServer::start().await;
    let request = json!({
        "maintenance_type_id": 1,
        "interval_days": 0,
        "start_date": "2025-01-01"
    });
    let (status, body) = send(app(&server, vec![]), post_json("/api/v1/equipment/1/schedules", request)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "InvalidSchedule");

    let request = json!({
        "maintenance_type_id": 1,
        "interval_days": 30,
        "start_date": "01/06/2025"
    });
    let (status, body) = send(app(&server, vec![]), post_json("/api/v1/equipment/1/schedules", request)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "InvalidDate");

    let request = Request::builder()
        .method("PUT")
        .uri("/api/v1/schedules/5")
        .header("content-type", "application/json")
        .body(Body::from(json!({"interval_days": -3}).to_string()))
        .unwrap();
    let (status, body) = send(app(&server, vec![]), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "InvalidSchedule");
}

#[tokio::test]
async fn test_malformed_schedule_does_not_hide_overdue_sibling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/equipos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "nombre": "Monitor"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/equipos/1/mantenimientos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 10, "equipment_id": 1, "maintenance_type_id": 1, "interval_days": 9, "start_date": "2025-01-01"},
            {"id": 11, "equipment_id": 1, "maintenance_type_id": 2, "interval_days": 30, "start_date": null}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/equipos/1/eventos-mantenimiento"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server, vec![]),
        get("/api/v1/maintenance/status?today=2025-01-15"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let monitor = &body["equipment"]["1"];
    assert_eq!(monitor["status"], "overdue");
    assert_eq!(monitor["schedules"].as_array().unwrap().len(), 2);
    assert_eq!(monitor["schedules"][0]["status"], "overdue");
    assert_eq!(monitor["schedules"][1]["status"], "unknown");
    assert!(monitor["schedules"][1]["error"].as_str().unwrap().contains("start_date"));
    assert!(monitor["error"].is_null());
    assert_eq!(body["summary"]["overdue"], 1);
}

#[tokio::test]
async fn test_responses_are_gzip_compressed_on_request() {
    let server = MockServer::start().await;
    let request = Request::builder()
        .uri("/api-docs/openapi.json")
        .header("accept-encoding", "gzip")
        .body(Body::empty())
        .unwrap();

    let response = app(&server, vec![]).oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-encoding"], "gzip");
}

#[tokio::test]
async fn test_api_token_required_when_configured() {
    let server = MockServer::start().await;
    let app = app(&server, vec!["secret".to_string()]);

    let (status, _) = send(app.clone(), get("/api/v1/maintenance/alerts")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/api/v1/maintenance/alerts?today=2025-01-15")
        .header("authorization", "Bearer wrong")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Mock::given(method("GET"))
        .and(path("/equipos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let request = Request::builder()
        .uri("/api/v1/maintenance/alerts?today=2025-01-15")
        .header("authorization", "Bearer secret")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["badge_count"], 0);
    assert_eq!(body["keep_polling"], false);
}
