//! HttpGateway against a mocked remote API

use progresando_server::{
    config::GatewayConfig,
    gateway::{HttpGateway, MaintenanceGateway},
    models::maintenance::{CreateEvent, CreateSchedule},
    AppError,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(server: &MockServer, token: Option<&str>) -> HttpGateway {
    HttpGateway::new(&GatewayConfig {
        base_url: format!("{}/", server.uri()),
        api_token: token.map(str::to_string),
        timeout_secs: 5,
    })
    .expect("gateway")
}

#[tokio::test]
async fn test_list_schedules_parses_camel_case_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/equipos/7/mantenimientos"))
        .and(header("authorization", "Bearer service-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "equipmentId": 7,
                "maintenanceTypeId": 2,
                "intervalDays": 30,
                "startDate": "2025-01-01",
                "nextDueDate": "2025-02-01"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let schedules = gateway(&server, Some("service-token"))
        .list_schedules(7)
        .await
        .expect("schedules");

    assert_eq!(schedules.len(), 1);
    assert_eq!(schedules[0].equipment_id, 7);
    assert_eq!(schedules[0].interval_days, Some(30));
    assert_eq!(schedules[0].next_due_date.as_deref(), Some("2025-02-01"));
}

#[tokio::test]
async fn test_missing_equipment_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/equipos/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = gateway(&server, None).get_equipment(99).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_server_error_is_gateway_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/equipos"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = gateway(&server, None).list_equipment().await.unwrap_err();
    assert!(matches!(err, AppError::Gateway(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_malformed_payload_is_gateway_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/equipos/3/eventos-mantenimiento"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let err = gateway(&server, None).list_events(3).await.unwrap_err();
    assert!(matches!(err, AppError::Gateway(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_create_schedule_and_event_post_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/equipos/4/mantenimientos"))
        .and(body_partial_json(json!({"interval_days": 90, "start_date": "2025-06-01"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 12,
            "equipment_id": 4,
            "maintenance_type_id": 1,
            "interval_days": 90,
            "start_date": "2025-06-01"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/equipos/4/eventos-mantenimiento"))
        .and(body_partial_json(json!({"schedule_id": 12, "performed_by": "Ana"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 40,
            "equipment_id": 4,
            "schedule_id": 12,
            "performed_date": "2025-06-02",
            "performed_by": "Ana"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway(&server, None);
    let schedule = gateway
        .create_schedule(
            4,
            &CreateSchedule {
                maintenance_type_id: 1,
                custom_label: None,
                interval_days: 90,
                start_date: "2025-06-01".to_string(),
            },
        )
        .await
        .expect("schedule");
    assert_eq!(schedule.id, 12);

    let event = gateway
        .create_event(
            4,
            &CreateEvent {
                schedule_id: Some(12),
                performed_date: "2025-06-02".to_string(),
                performed_by: "Ana".to_string(),
                notes: None,
            },
        )
        .await
        .expect("event");
    assert_eq!(event.id, Some(40));
}

#[tokio::test]
async fn test_delete_schedule() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/mantenimientos/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    gateway(&server, None).delete_schedule(5).await.expect("deleted");
}

#[tokio::test]
async fn test_loose_schedule_fields_do_not_fail_the_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/equipos/5/mantenimientos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "maintenance_type_id": 1, "interval_days": "30", "start_date": "2025-01-01"},
            {"id": 2, "maintenance_type_id": 1, "interval_days": 30, "start_date": null},
            {"id": 3, "interval_days": "mensual", "start_date": 20250101},
            {"maintenance_type_id": 1, "interval_days": 30, "start_date": "2025-01-01"}
        ])))
        .mount(&server)
        .await;

    let schedules = gateway(&server, None).list_schedules(5).await.expect("schedules");

    // The record without an id cannot be attributed and is left out
    assert_eq!(schedules.len(), 3);
    assert!(schedules.iter().all(|s| s.equipment_id == 5));
    assert_eq!(schedules[0].interval_days, Some(30));
    assert_eq!(schedules[1].start_date, "");
    assert_eq!(schedules[2].interval_days, None);
    assert_eq!(schedules[2].start_date, "20250101");
}
