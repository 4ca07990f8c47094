//! Request-level tests for the REST gateway against a mock PostgREST server.

use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pet_health_core::gateway::{EntityGateway, RemoteError, ScoreGateway};
use pet_health_core::models::{NewTreatment, RawHealthScore, Treatment, TreatmentKind, TreatmentPatch};
use pet_health_remote::{RemoteConfig, RestGateway};

const ANON: &str = "anon-key";

fn gateway(server: &MockServer) -> RestGateway {
    RestGateway::new(RemoteConfig::new(server.uri(), ANON)).unwrap()
}

fn treatment_row(id: &str, name: &str, end_date: Option<&str>) -> Value {
    json!({
        "id": id, "pet_id": "rex", "name": name, "treatment_type": "flea_tick",
        "dosage": null, "frequency": null, "start_date": "2024-01-01", "end_date": end_date,
        "prescribed_by": null, "notes": null,
        "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"
    })
}

fn score_fields(overall: f64) -> Value {
    json!({
        "overall_score": overall, "vaccination_score": 100.0, "preventive_care_score": 60.0,
        "weight_score": 70.0, "condition_score": 85.0, "recommendations": ["Book a checkup"]
    })
}

fn score_row(id: &str, overall: f64) -> Value {
    let mut row = score_fields(overall);
    row["id"] = json!(id);
    row["pet_id"] = json!("rex");
    row["calculated_at"] = json!("2024-06-01T08:00:00Z");
    row
}

#[tokio::test]
async fn test_list_filters_by_pet() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/treatments"))
        .and(query_param("pet_id", "eq.rex"))
        .and(query_param("select", "*"))
        .and(header("apikey", ANON))
        .and(header("Authorization", format!("Bearer {ANON}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            treatment_row("a1", "Bravecto", None),
            treatment_row("a2", "Drontal", Some("2024-01-10")),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rows: Vec<Treatment> = EntityGateway::<Treatment>::list(&gateway(&server), "rex")
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert!(rows[0].is_active);
    assert!(!rows[1].is_active);
}

#[tokio::test]
async fn test_access_token_replaces_anon_bearer() {
    let server = MockServer::start().await;
    for bearer in [ANON, "user-jwt"] {
        Mock::given(method("GET"))
            .and(path("/rest/v1/treatments"))
            .and(header("apikey", ANON))
            .and(header("Authorization", format!("Bearer {bearer}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
    }

    let gw = gateway(&server);
    EntityGateway::<Treatment>::list(&gw, "rex").await.unwrap();
    gw.set_access_token(Some("user-jwt".into())).await;
    EntityGateway::<Treatment>::list(&gw, "rex").await.unwrap();
}

#[tokio::test]
async fn test_create_posts_with_pet_and_returns_server_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/treatments"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!({
            "pet_id": "rex", "name": "Bravecto", "treatment_type": "flea_tick", "start_date": "2024-01-01"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            treatment_row("srv-1", "Bravecto", None)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let input = NewTreatment::new("Bravecto", TreatmentKind::FleaTick, "2024-01-01".parse().unwrap());
    let created: Treatment = EntityGateway::<Treatment>::create(&gateway(&server), "rex", &input)
        .await
        .unwrap();

    assert_eq!(created.id, "srv-1");
    assert!(created.is_active);
}

#[tokio::test]
async fn test_update_patches_only_named_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/treatments"))
        .and(query_param("id", "eq.a1"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(json!({ "end_date": "2024-01-10" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            treatment_row("a1", "Bravecto", Some("2024-01-10"))
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let patch = TreatmentPatch::end_on("2024-01-10".parse().unwrap());
    let updated: Treatment = EntityGateway::<Treatment>::update(&gateway(&server), "a1", &patch)
        .await
        .unwrap();

    assert!(!updated.is_active);
}

#[tokio::test]
async fn test_update_matching_no_rows_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/treatments"))
        .and(query_param("id", "eq.gone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let patch = TreatmentPatch::end_on("2024-01-10".parse().unwrap());
    let result = EntityGateway::<Treatment>::update(&gateway(&server), "gone", &patch).await;

    assert_eq!(result.unwrap_err(), RemoteError::NotFound("gone".into()));
}

#[tokio::test]
async fn test_delete_of_missing_row_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/treatments"))
        .and(query_param("id", "eq.gone"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    EntityGateway::<Treatment>::delete(&gateway(&server), "gone")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_error_status_maps_to_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/treatments"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "JWT expired" })),
        )
        .mount(&server)
        .await;

    let result = EntityGateway::<Treatment>::delete(&gateway(&server), "a1").await;

    assert_eq!(result.unwrap_err(), RemoteError::Unauthorized("JWT expired".into()));
}

#[tokio::test]
async fn test_latest_score_orders_and_limits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/health_scores"))
        .and(query_param("pet_id", "eq.rex"))
        .and(query_param("order", "calculated_at.desc"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([score_row("s1", 82.0)])))
        .expect(1)
        .mount(&server)
        .await;

    let latest = gateway(&server).latest_score("rex").await.unwrap().unwrap();

    assert_eq!(latest.id, "s1");
    assert_eq!(latest.overall_score, 82.0);
    assert_eq!(latest.recommendations, vec!["Book a checkup"]);
}

#[tokio::test]
async fn test_latest_score_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/health_scores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert_eq!(gateway(&server).latest_score("rex").await.unwrap(), None);
}

#[tokio::test]
async fn test_calculate_calls_rpc_with_pet() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/calculate_health_score"))
        .and(body_json(json!({ "pet_id": "rex" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([score_fields(64.0)])))
        .expect(1)
        .mount(&server)
        .await;

    let raw = gateway(&server).calculate_health_score("rex").await.unwrap();

    assert_eq!(raw.overall_score, 64.0);
    assert_eq!(raw.weight_score, 70.0);
}

#[tokio::test]
async fn test_save_score_inserts_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/health_scores"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!({ "pet_id": "rex", "overall_score": 82.0 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([score_row("s2", 82.0)])))
        .expect(1)
        .mount(&server)
        .await;

    let raw = RawHealthScore {
        overall_score: 82.0,
        vaccination_score: 100.0,
        preventive_care_score: 60.0,
        weight_score: 70.0,
        condition_score: 85.0,
        recommendations: vec!["Book a checkup".into()],
    };
    let saved = gateway(&server).save_score("rex", &raw).await.unwrap();

    assert_eq!(saved.id, "s2");
    assert_eq!(saved.pet_id, "rex");
}
