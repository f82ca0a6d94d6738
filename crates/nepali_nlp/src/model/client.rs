//! HTTP client for the hosted inference service

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{ApiConfig, Endpoint, API_CONFIG};
use crate::error::{ClientError, Result};
use crate::model::types::{
    HealthStatus, InferenceRequest, InferenceResponse, ModelInfo, ServiceEnvelope,
};

/// Anything that can answer inference requests.
///
/// Chat sessions only talk to this trait, so tests can swap in a scripted backend.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Send one request and decode the reply for its endpoint
    async fn infer(&self, request: &InferenceRequest) -> Result<InferenceResponse>;

    /// Liveness probe
    async fn health(&self) -> Result<HealthStatus>;

    /// Metadata about the loaded model
    async fn model_info(&self) -> Result<ModelInfo>;
}

/// reqwest-backed client for the inference service
#[derive(Debug, Clone)]
pub struct InferenceClient {
    config: ApiConfig,
    client: Client,
}

impl InferenceClient {
    /// Create a new InferenceClient
    pub fn new(config: ApiConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    /// Client on the process-wide config read from the environment
    pub fn from_env() -> Result<Self> {
        Self::new(API_CONFIG.clone())
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// POST a JSON body and return the reply once it has passed the status and success checks
    pub async fn post_json(&self, endpoint: Endpoint, body: &Value) -> Result<Value> {
        let url = self.config.url(endpoint);
        debug!(%url, "POST");

        let response = self.client.post(&url).json(body).send().await?;
        Self::read_reply(endpoint, response).await
    }

    pub async fn get_json(&self, endpoint: Endpoint) -> Result<Value> {
        let url = self.config.url(endpoint);
        debug!(%url, "GET");

        let response = self.client.get(&url).send().await?;
        Self::read_reply(endpoint, response).await
    }

    async fn read_reply(endpoint: Endpoint, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(endpoint = endpoint.path(), status = status.as_u16(), "Non-success status");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = serde_json::from_str(&body)?;
        let envelope: ServiceEnvelope = serde_json::from_value(value.clone()).unwrap_or_default();
        if envelope.failed() {
            warn!(
                endpoint = endpoint.path(),
                reason = %envelope.reason(),
                "Service reported failure"
            );
            return Err(ClientError::Service(envelope.reason()));
        }

        Ok(value)
    }

    fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl InferenceBackend for InferenceClient {
    async fn infer(&self, request: &InferenceRequest) -> Result<InferenceResponse> {
        let endpoint = request.endpoint();
        let start_time = Instant::now();

        let value = self.post_json(endpoint, &request.body()).await?;
        let response = match request {
            InferenceRequest::Generate(_) => InferenceResponse::Generate(Self::decode(value)?),
            InferenceRequest::Lemmatize(_) => InferenceResponse::Lemmatize(Self::decode(value)?),
            InferenceRequest::Ner(_) => InferenceResponse::Ner(Self::decode(value)?),
            InferenceRequest::Stem(_) => InferenceResponse::Stem(Self::decode(value)?),
            InferenceRequest::Aspect(_) => InferenceResponse::Aspect(Self::decode(value)?),
        };

        info!(
            endpoint = endpoint.path(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Inference call completed"
        );
        Ok(response)
    }

    async fn health(&self) -> Result<HealthStatus> {
        let value = self.get_json(Endpoint::Health).await?;
        Self::decode(value)
    }

    async fn model_info(&self) -> Result<ModelInfo> {
        let value = self.get_json(Endpoint::ModelInfo).await?;
        Self::decode(value)
    }
}
