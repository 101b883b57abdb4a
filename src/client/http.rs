use super::types::*;
use crate::{Result, config::ClientConfig};
use async_trait::async_trait;
use reqwest::{
    Response,
    header::{AUTHORIZATION, CONTENT_TYPE},
    multipart::{Form, Part},
};
use serde_json::Value;
use tracing::{debug, warn};

pub const GENERATE_PATH: &str = "/v1/generate";
pub const INDEX_PATH: &str = "/v1/index";
pub const HEALTH_PATH: &str = "/health";

#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse>;
}

/// Talks to the generation backend over HTTP. One call, one request: no
/// retries and no caching.
#[derive(Debug, Clone)]
pub struct HttpGenerationClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpGenerationClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Uploads a text document for the backend to use as retrieval context.
    pub async fn index_document(&self, filename: &str, text: String) -> Result<Value> {
        debug!("Indexing document '{}' ({} bytes)", filename, text.len());

        let part = Part::text(text)
            .file_name(filename.to_string())
            .mime_str("text/plain")?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url(INDEX_PATH))
            .header(AUTHORIZATION, self.bearer())
            .multipart(form)
            .send()
            .await?;

        parse_body(response).await
    }

    pub async fn health(&self) -> Result<Value> {
        let response = self.client.get(self.url(HEALTH_PATH)).send().await?;
        parse_body(response).await
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        debug!(
            "Sending generation request (tone: {}, length: {}, {} chars)",
            request.options.tone,
            request.options.length,
            request.query.chars().count()
        );

        let response = self
            .client
            .post(self.url(GENERATE_PATH))
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, self.bearer())
            .json(&request)
            .send()
            .await?;

        parse_body(response).await.map(GenerationResponse::new)
    }
}

/// Any status is accepted; only an unreadable or non-JSON body fails.
async fn parse_body(response: Response) -> Result<Value> {
    let status = response.status();
    if status.is_success() {
        debug!("Backend responded with {}", status);
    } else {
        warn!("Backend responded with {}", status);
    }

    Ok(response.json::<Value>().await?)
}
