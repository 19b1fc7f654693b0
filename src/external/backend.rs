use crate::config::UpstreamConfig;
use crate::error::{AppError, AppResult};
use crate::models::{ApiResponse, Consultation, ConsultationStatus, Payment, Subscription};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Per-request credentials for the marketplace API. Built by the request
/// middleware and passed explicitly to every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiContext {
    pub access_token: String,
    pub device_id: Option<String>,
}

impl ApiContext {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            device_id: None,
        }
    }

    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsultationQuery {
    pub status: Option<ConsultationStatus>,
    pub student_id: Option<String>,
    pub group_id: Option<String>,
}

impl ConsultationQuery {
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(status) = self.status {
            params.push(("status", status.to_string()));
        }
        if let Some(id) = &self.student_id {
            params.push(("studentId", id.clone()));
        }
        if let Some(id) = &self.group_id {
            params.push(("groupId", id.clone()));
        }
        params
    }
}

/// Read-only client for the marketplace REST API.
#[derive(Clone)]
pub struct BackendApi {
    client: Client,
    config: UpstreamConfig,
}

impl BackendApi {
    pub fn new(config: UpstreamConfig) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("tutordesk/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::ConfigError(format!("cannot build upstream client: {e}")))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn get_json(
        &self,
        ctx: &ApiContext,
        path: &str,
        params: &[(&'static str, String)],
    ) -> AppResult<Value> {
        let url = self.url(path);
        let mut request = self
            .client
            .get(&url)
            .bearer_auth(&ctx.access_token)
            .query(params);
        if let Some(device_id) = &ctx.device_id {
            request = request.header("X-Device-Id", device_id);
        }

        let response = request.send().await?;
        let status = response.status();
        log::debug!("GET {url} -> {}", status.as_u16());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AppError::AuthError("Upstream rejected credentials".into()));
            }
            StatusCode::NOT_FOUND => {
                return Err(AppError::NotFound(format!("{path} not found upstream")));
            }
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(AppError::ExternalApiError(format!(
                    "GET {path} failed: HTTP {}: {}",
                    s.as_u16(),
                    body.chars().take(200).collect::<String>()
                )));
            }
            _ => {}
        }

        let body: Value = response.json().await?;
        unwrap_envelope(body)
    }

    pub async fn list_consultations(
        &self,
        ctx: &ApiContext,
        query: &ConsultationQuery,
    ) -> AppResult<Vec<Consultation>> {
        let data = self.get_json(ctx, "consultations", &query.to_params()).await?;
        extract_items(data)?
            .into_iter()
            .map(|v| Consultation::from_json(v).map_err(AppError::from_upstream))
            .collect()
    }

    pub async fn get_consultation(&self, ctx: &ApiContext, id: &str) -> AppResult<Consultation> {
        let data = self.get_json(ctx, &format!("consultations/{id}"), &[]).await?;
        Consultation::from_json(data).map_err(AppError::from_upstream)
    }

    /// `None` when the user has no subscription.
    pub async fn current_subscription(&self, ctx: &ApiContext) -> AppResult<Option<Subscription>> {
        match self.get_json(ctx, "subscriptions/current", &[]).await {
            Ok(Value::Null) | Err(AppError::NotFound(_)) => Ok(None),
            Ok(data) => Subscription::from_json(data)
                .map(Some)
                .map_err(AppError::from_upstream),
            Err(e) => Err(e),
        }
    }

    pub async fn get_subscription(&self, ctx: &ApiContext, id: &str) -> AppResult<Subscription> {
        let data = self.get_json(ctx, &format!("subscriptions/{id}"), &[]).await?;
        Subscription::from_json(data).map_err(AppError::from_upstream)
    }

    pub async fn list_payments(&self, ctx: &ApiContext) -> AppResult<Vec<Payment>> {
        let data = self.get_json(ctx, "payments", &[]).await?;
        extract_items(data)?
            .into_iter()
            .map(|v| Payment::from_json(v).map_err(AppError::from_upstream))
            .collect()
    }
}

/// Accepts either `{success, data, error}` or a bare payload.
pub fn unwrap_envelope(body: Value) -> AppResult<Value> {
    if !body.get("success").is_some_and(Value::is_boolean) {
        return Ok(body);
    }
    let envelope: ApiResponse<Value> = serde_json::from_value(body)?;
    if envelope.success {
        return Ok(envelope.data.unwrap_or(Value::Null));
    }
    let message = envelope
        .error
        .map(|e| e.message)
        .or(envelope.message)
        .unwrap_or_else(|| "unknown upstream error".to_string());
    Err(AppError::ExternalApiError(message))
}

/// A list response is a bare array or a paginated `{items: [...]}` object.
pub fn extract_items(data: Value) -> AppResult<Vec<Value>> {
    match data {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("items").or_else(|| map.remove("data")) {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(AppError::UpstreamDataError(
                "expected a list of items".into(),
            )),
        },
        Value::Null => Ok(Vec::new()),
        _ => Err(AppError::UpstreamDataError(
            "expected a list of items".into(),
        )),
    }
}
