use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scheduling_cell::models::{CreateWindowRequest, SchedulingError};
use scheduling_cell::services::availability::AvailabilityService;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

const TOKEN: &str = "test-token";

fn window_request(weekday: &str, start_hour: i32, end_hour: i32) -> CreateWindowRequest {
    CreateWindowRequest {
        specialty: "Cardiología".to_string(),
        weekday: weekday.to_string(),
        start_hour,
        end_hour,
    }
}

#[tokio::test]
async fn create_window_persists_the_window() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/specialist_schedules"))
        .and(body_partial_json(json!({
            "specialist_id": "specialist-1",
            "weekday": "Lunes",
            "start_hour": 8,
            "end_hour": 12
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::schedule_response(1, "specialist-1", "Lunes")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = TestConfig::with_url(&server.uri()).to_app_config();
    let service = AvailabilityService::new(&config);

    let window = service
        .create_window("specialist-1", window_request("Lunes", 8, 12), TOKEN)
        .await
        .unwrap();

    assert_eq!(window.id, 1);
    assert_eq!(window.weekday, "Lunes");
    assert_eq!(window.start_hour, 8);
    assert_eq!(window.end_hour, 12);
}

#[tokio::test]
async fn create_window_rejects_an_unknown_weekday() {
    let server = MockServer::start().await;

    let config = TestConfig::with_url(&server.uri()).to_app_config();
    let service = AvailabilityService::new(&config);

    let result = service
        .create_window("specialist-1", window_request("Funday", 8, 12), TOKEN)
        .await;

    assert_matches!(result, Err(SchedulingError::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_window_accepts_accented_weekday_variants() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/specialist_schedules"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::schedule_response(2, "specialist-1", "miercoles")
        ])))
        .mount(&server)
        .await;

    let config = TestConfig::with_url(&server.uri()).to_app_config();
    let service = AvailabilityService::new(&config);

    // "miercoles" without the accent still names Miércoles.
    let window = service
        .create_window("specialist-1", window_request("miercoles", 8, 12), TOKEN)
        .await
        .unwrap();

    assert_eq!(window.id, 2);
}

#[tokio::test]
async fn create_window_rejects_inverted_hours() {
    let server = MockServer::start().await;

    let config = TestConfig::with_url(&server.uri()).to_app_config();
    let service = AvailabilityService::new(&config);

    let result = service
        .create_window("specialist-1", window_request("Lunes", 12, 8), TOKEN)
        .await;

    assert_matches!(result, Err(SchedulingError::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_window_rejects_hours_off_the_clock() {
    let server = MockServer::start().await;

    let config = TestConfig::with_url(&server.uri()).to_app_config();
    let service = AvailabilityService::new(&config);

    let result = service
        .create_window("specialist-1", window_request("Lunes", 8, 25), TOKEN)
        .await;

    assert_matches!(result, Err(SchedulingError::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_windows_returns_stored_windows() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/specialist_schedules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::schedule_response(1, "specialist-1", "Lunes"),
            MockSupabaseResponses::schedule_response(2, "specialist-1", "Jueves"),
        ])))
        .mount(&server)
        .await;

    let config = TestConfig::with_url(&server.uri()).to_app_config();
    let service = AvailabilityService::new(&config);

    let windows = service.list_windows("specialist-1", TOKEN).await.unwrap();

    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].weekday, "Lunes");
    assert_eq!(windows[1].weekday, "Jueves");
}

#[tokio::test]
async fn delete_window_handles_a_bodyless_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/specialist_schedules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::schedule_response(1, "specialist-1", "Lunes")
        ])))
        .mount(&server)
        .await;

    // The backend answers DELETE with 204 and no body.
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/specialist_schedules"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let config = TestConfig::with_url(&server.uri()).to_app_config();
    let service = AvailabilityService::new(&config);

    service.delete_window(1, "specialist-1", TOKEN).await.unwrap();
}

#[tokio::test]
async fn delete_window_refuses_a_non_owner() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/specialist_schedules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::schedule_response(1, "specialist-1", "Lunes")
        ])))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/specialist_schedules"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let config = TestConfig::with_url(&server.uri()).to_app_config();
    let service = AvailabilityService::new(&config);

    let result = service.delete_window(1, "someone-else", TOKEN).await;

    assert_matches!(result, Err(SchedulingError::NotOwner));
}

#[tokio::test]
async fn delete_window_of_a_missing_row_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/specialist_schedules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = TestConfig::with_url(&server.uri()).to_app_config();
    let service = AvailabilityService::new(&config);

    let result = service.delete_window(99, "specialist-1", TOKEN).await;

    assert_matches!(result, Err(SchedulingError::NotFound));
}
