//! PostgREST-style gateway: one table per entity plus RPC.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use pet_health_core::gateway::{EntityGateway, RemoteError, RemoteResult, ScoreGateway};
use pet_health_core::models::{today, Entity, HealthScoreRecord, RawHealthScore};

use crate::config::{RemoteConfig, RemoteConfigError};

const SCORES_TABLE: &str = "health_scores";
const SCORE_RPC: &str = "calculate_health_score";

/// Map an unsuccessful HTTP status to a gateway error.
pub fn map_status(status: StatusCode, body: &str) -> RemoteError {
    let message = error_message(status, body);
    match status {
        StatusCode::UNAUTHORIZED => RemoteError::Unauthorized(message),
        StatusCode::FORBIDDEN => RemoteError::PermissionDenied(message),
        StatusCode::NOT_FOUND => RemoteError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            RemoteError::Validation(message)
        }
        s if s.is_server_error() => RemoteError::Server(message),
        _ => RemoteError::Server(format!("unexpected status: {message}")),
    }
}

/// PostgREST puts the reason in `message` (and sometimes `details`).
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    match (field("message"), field("details")) {
        (Some(message), Some(details)) => format!("{message} ({details})"),
        (Some(message), None) => message,
        _ if body.trim().is_empty() => status.to_string(),
        _ => body.trim().to_string(),
    }
}

/// Decode a JSON array of rows, recomputing derived fields.
pub fn decode_rows<E: Entity>(body: &str) -> RemoteResult<Vec<E>> {
    let mut rows: Vec<E> = serde_json::from_str(body)?;
    let today = today();
    for row in &mut rows {
        row.refresh_derived(today);
    }
    Ok(rows)
}

/// Gateway to the hosted backend.
///
/// Every request carries the anon key as `apikey` and the user's access
/// token (or the anon key when signed out) as a bearer token.
pub struct RestGateway {
    config: RemoteConfig,
    http: reqwest::Client,
    access_token: RwLock<Option<String>>,
}

impl RestGateway {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteConfigError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("pet-health/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteConfigError::Client(e.to_string()))?;
        Ok(Self {
            config,
            http,
            access_token: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Replace the bearer token. Refreshing it is the caller's job.
    pub async fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write().await = token;
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.root(), table)
    }

    pub fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.config.root(), function)
    }

    async fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let token = self.access_token.read().await.clone();
        let bearer = token.as_deref().unwrap_or(&self.config.anon_key);
        self.http
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {bearer}"))
    }

    async fn send(&self, request: RequestBuilder) -> RemoteResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let error = map_status(status, &body);
        warn!(status = status.as_u16(), error = %error, "request failed");
        Err(error)
    }

    async fn body(response: Response) -> RemoteResult<String> {
        response
            .text()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))
    }

    async fn json<T: DeserializeOwned>(response: Response) -> RemoteResult<T> {
        let body = Self::body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// POST/PATCH that returns the affected rows.
    async fn write_rows<E: Entity>(&self, request: RequestBuilder) -> RemoteResult<Vec<E>> {
        let response = self
            .send(request.header("Prefer", "return=representation"))
            .await?;
        decode_rows(&Self::body(response).await?)
    }
}

/// Creation body: the input's fields plus the owning pet.
fn insert_body(pet_id: &str, input: &impl serde::Serialize) -> RemoteResult<Value> {
    let mut body = serde_json::to_value(input)?;
    match body.as_object_mut() {
        Some(fields) => {
            fields.insert("pet_id".into(), Value::String(pet_id.to_string()));
            Ok(body)
        }
        None => Err(RemoteError::Validation("input must serialize to an object".into())),
    }
}

#[async_trait]
impl<E: Entity> EntityGateway<E> for RestGateway {
    async fn list(&self, pet_id: &str) -> RemoteResult<Vec<E>> {
        let request = self
            .request(Method::GET, &self.table_url(E::TABLE))
            .await
            .query(&[("pet_id", format!("eq.{pet_id}")), ("select", "*".into())]);
        let response = self.send(request).await?;
        let rows = decode_rows(&Self::body(response).await?)?;
        debug!(table = E::TABLE, pet_id, count = rows.len(), "listed rows");
        Ok(rows)
    }

    async fn create(&self, pet_id: &str, input: &E::Input) -> RemoteResult<E> {
        let body = insert_body(pet_id, input)?;
        let request = self
            .request(Method::POST, &self.table_url(E::TABLE))
            .await
            .json(&body);
        self.write_rows::<E>(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RemoteError::Decode(format!("insert into {} returned no row", E::TABLE)))
    }

    async fn update(&self, id: &str, patch: &E::Patch) -> RemoteResult<E> {
        let request = self
            .request(Method::PATCH, &self.table_url(E::TABLE))
            .await
            .query(&[("id", format!("eq.{id}"))])
            .json(patch);
        // No matching row (or row-level security hid it): empty array.
        self.write_rows::<E>(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &str) -> RemoteResult<()> {
        let request = self
            .request(Method::DELETE, &self.table_url(E::TABLE))
            .await
            .query(&[("id", format!("eq.{id}"))]);
        self.send(request).await?;
        debug!(table = E::TABLE, id, "deleted row");
        Ok(())
    }
}

#[async_trait]
impl ScoreGateway for RestGateway {
    async fn latest_score(&self, pet_id: &str) -> RemoteResult<Option<HealthScoreRecord>> {
        let request = self
            .request(Method::GET, &self.table_url(SCORES_TABLE))
            .await
            .query(&[
                ("pet_id", format!("eq.{pet_id}")),
                ("order", "calculated_at.desc".into()),
                ("limit", "1".into()),
            ]);
        let rows: Vec<HealthScoreRecord> = Self::json(self.send(request).await?).await?;
        Ok(rows.into_iter().next())
    }

    async fn calculate_health_score(&self, pet_id: &str) -> RemoteResult<RawHealthScore> {
        let request = self
            .request(Method::POST, &self.rpc_url(SCORE_RPC))
            .await
            .json(&json!({ "pet_id": pet_id }));
        let value: Value = Self::json(self.send(request).await?).await?;
        decode_score(value)
    }

    async fn save_score(&self, pet_id: &str, raw: &RawHealthScore) -> RemoteResult<HealthScoreRecord> {
        let body = insert_body(pet_id, raw)?;
        let request = self
            .request(Method::POST, &self.table_url(SCORES_TABLE))
            .await
            .header("Prefer", "return=representation")
            .json(&body);
        let rows: Vec<HealthScoreRecord> = Self::json(self.send(request).await?).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RemoteError::Decode("insert into health_scores returned no row".into()))
    }
}

/// Set-returning functions answer with an array; scalar ones with an object.
fn decode_score(value: Value) -> RemoteResult<RawHealthScore> {
    let row = match value {
        Value::Array(rows) => rows
            .into_iter()
            .next()
            .ok_or_else(|| RemoteError::Decode(format!("{SCORE_RPC} returned no rows")))?,
        other => other,
    };
    Ok(serde_json::from_value(row)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pet_health_core::models::Treatment;
    use proptest::prelude::*;

    fn gateway() -> RestGateway {
        RestGateway::new(RemoteConfig::new("https://pets.example.com/", "anon")).unwrap()
    }

    #[test]
    fn test_urls() {
        let gw = gateway();
        assert_eq!(gw.table_url("treatments"), "https://pets.example.com/rest/v1/treatments");
        assert_eq!(
            gw.rpc_url("calculate_health_score"),
            "https://pets.example.com/rest/v1/rpc/calculate_health_score"
        );
    }

    #[test]
    fn test_status_mapping() {
        let body = r#"{"code":"23505","message":"duplicate key","details":"Key (id) exists"}"#;
        assert_eq!(
            map_status(StatusCode::CONFLICT, body),
            RemoteError::Validation("duplicate key (Key (id) exists)".into())
        );
        assert!(matches!(map_status(StatusCode::UNAUTHORIZED, ""), RemoteError::Unauthorized(_)));
        assert!(matches!(map_status(StatusCode::FORBIDDEN, "{}"), RemoteError::PermissionDenied(_)));
        assert!(matches!(map_status(StatusCode::NOT_FOUND, "gone"), RemoteError::NotFound(m) if m == "gone"));
        assert!(matches!(map_status(StatusCode::UNPROCESSABLE_ENTITY, ""), RemoteError::Validation(_)));
        assert!(matches!(map_status(StatusCode::BAD_GATEWAY, ""), RemoteError::Server(_)));
    }

    proptest! {
        #[test]
        fn prop_server_statuses_keep_message(code in 500u16..600, message in "[a-z ]{1,24}") {
            let status = StatusCode::from_u16(code).unwrap();
            let body = json!({ "message": message }).to_string();
            prop_assert_eq!(map_status(status, &body), RemoteError::Server(message));
        }
    }

    #[test]
    fn test_decode_rows_computes_active_flag() {
        let body = r#"[{
            "id": "0b8c", "pet_id": "rex", "name": "Apoquel", "treatment_type": "allergy_shot",
            "dosage": null, "frequency": null, "start_date": "2020-01-01", "end_date": "2020-02-01",
            "prescribed_by": null, "notes": null,
            "created_at": "2020-01-01T00:00:00Z", "updated_at": "2020-01-01T00:00:00Z"
        }]"#;
        let rows: Vec<Treatment> = decode_rows(body).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].is_active);
        assert_eq!(rows[0].treatment_type, pet_health_core::models::TreatmentKind::Other);
    }

    #[test]
    fn test_decode_rows_rejects_garbage() {
        let result: RemoteResult<Vec<Treatment>> = decode_rows(r#"{"message":"oops"}"#);
        assert!(matches!(result, Err(RemoteError::Decode(_))));
    }

    #[test]
    fn test_insert_body_adds_pet() {
        let raw = RawHealthScore {
            overall_score: 80.0,
            vaccination_score: 100.0,
            preventive_care_score: 60.0,
            weight_score: 70.0,
            condition_score: 85.0,
            recommendations: vec![],
        };
        let body = insert_body("rex", &raw).unwrap();
        assert_eq!(body["pet_id"], "rex");
        assert_eq!(body["overall_score"], 80.0);
        assert!(insert_body("rex", &42).is_err());
    }

    #[test]
    fn test_decode_score_shapes() {
        let row = json!({
            "overall_score": 72.0, "vaccination_score": 50.0, "preventive_care_score": 100.0,
            "weight_score": 70.0, "condition_score": 70.0
        });
        let from_object = decode_score(row.clone()).unwrap();
        let from_array = decode_score(Value::Array(vec![row])).unwrap();
        assert_eq!(from_object, from_array);
        assert!(from_object.recommendations.is_empty());
        assert!(decode_score(json!([])).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let config = RemoteConfig {
            base_url: "http://127.0.0.1:9".into(),
            anon_key: "anon".into(),
            timeout_secs: 2,
        };
        let gw = RestGateway::new(config).unwrap();
        gw.set_access_token(Some("user-token".into())).await;
        let result: RemoteResult<Vec<Treatment>> = gw.list("rex").await;
        assert!(matches!(result, Err(RemoteError::Network(_))));
    }
}
