use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{header, Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{BackendPet, FilterOptions, PetRecord};
use crate::services::fallback::fallback_pets;
use crate::services::normalize::normalize_batch;

/// A file received from a client, forwarded as-is to the backend.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    #[serde(alias = "text")]
    transcript: String,
}

/// Client for the external listing backend.
#[derive(Clone)]
pub struct ListingClient {
    client: Client,
    base_url: String,
    listing_timeout: Duration,
    ai_timeout: Duration,
}

impl ListingClient {
    pub fn new(base_url: &str, listing_timeout: Duration, ai_timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            listing_timeout,
            ai_timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.backend_url, config.listing_timeout, config.ai_timeout)
    }

    /// Every listing, or the fallback sample when the backend misbehaves.
    pub async fn fetch_all(&self) -> Vec<PetRecord> {
        match self.fetch_raw_listing().await {
            Ok(raw) => {
                tracing::info!("Fetched {} pets from backend", raw.len());
                normalize_batch(raw)
            }
            Err(e) => {
                tracing::warn!("Using fallback data due to backend error: {e}");
                fallback_pets()
            }
        }
    }

    async fn fetch_raw_listing(&self) -> AppResult<Vec<BackendPet>> {
        let resp = self
            .client
            .get(format!("{}/pets", self.base_url))
            .header(header::ACCEPT, "application/json")
            .timeout(self.listing_timeout)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Listing request failed: {e}")))?;

        let records: Vec<Value> = ensure_success(resp, "Listing", false)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Listing parse failed: {e}")))?;

        Ok(decode_records(records, "Listing"))
    }

    /// Natural-language search through the backend's AI endpoint.
    pub async fn fetch_by_prompt(&self, prompt: &str) -> AppResult<Vec<PetRecord>> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AppError::validation("prompt", "Prompt is required"));
        }
        tracing::debug!("Proxying AI search with prompt: {prompt}");

        let resp = self
            .client
            .get(format!("{}/pets/gemini", self.base_url))
            .query(&[("prompt", prompt)])
            .header(header::ACCEPT, "application/json")
            .timeout(self.ai_timeout)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("AI search request failed: {e}")))?;

        let records: Vec<Value> = ensure_success(resp, "AI search", true)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("AI search parse failed: {e}")))?;
        let raw = decode_records(records, "AI search");

        tracing::info!("AI search returned {} pets", raw.len());
        Ok(normalize_batch(raw))
    }

    /// Search by a photo of an animal.
    pub async fn fetch_by_image(&self, file: UploadedFile) -> AppResult<Vec<PetRecord>> {
        let form = Form::new().part("file", to_part(file)?);

        let resp = self
            .client
            .post(format!("{}/pets/gemini/image", self.base_url))
            .multipart(form)
            .timeout(self.ai_timeout)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Image search request failed: {e}")))?;

        let records: Vec<Value> = ensure_success(resp, "Image search", true)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Image search parse failed: {e}")))?;
        let raw = decode_records(records, "Image search");

        tracing::info!("Image search returned {} pets", raw.len());
        Ok(normalize_batch(raw))
    }

    pub async fn transcribe_audio(&self, file: UploadedFile) -> AppResult<String> {
        let form = Form::new().part("audio_file", to_part(file)?);

        let resp = self
            .client
            .post(format!("{}/pets/voice-to-text", self.base_url))
            .multipart(form)
            .timeout(self.ai_timeout)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Voice-to-text request failed: {e}")))?;

        let body: TranscriptResponse = ensure_success(resp, "Voice-to-text", false)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Voice-to-text parse failed: {e}")))?;

        Ok(body.transcript)
    }

    /// Distinct values the backend can filter on.
    pub async fn fetch_filter_options(&self) -> AppResult<FilterOptions> {
        let resp = self
            .client
            .get(format!("{}/filters", self.base_url))
            .header(header::ACCEPT, "application/json")
            .timeout(self.listing_timeout)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Filters request failed: {e}")))?;

        ensure_success(resp, "Filters", false)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Filters parse failed: {e}")))
    }
}

/// Pass 2xx responses through. Otherwise log the upstream body and classify:
/// a 503 from an AI-backed endpoint means the backend has no API key.
async fn ensure_success(resp: Response, what: &str, ai_backed: bool) -> AppResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    tracing::error!("{what} backend error {status}: {body}");

    if ai_backed && status == StatusCode::SERVICE_UNAVAILABLE {
        return Err(AppError::ServiceNotConfigured);
    }
    Err(AppError::Upstream(format!("{what} backend returned {status}")))
}

/// Records are decoded one at a time; a malformed one is skipped, not fatal.
fn decode_records(records: Vec<Value>, what: &str) -> Vec<BackendPet> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(pet) => Some(pet),
            Err(e) => {
                tracing::warn!("{what}: skipping malformed record #{index}: {e}");
                None
            }
        })
        .collect()
}

fn to_part(file: UploadedFile) -> AppResult<Part> {
    let part = Part::bytes(file.bytes).file_name(file.file_name);
    match file.content_type {
        Some(ct) => part
            .mime_str(&ct)
            .map_err(|e| AppError::validation("file", format!("Unsupported content type: {e}"))),
        None => Ok(part),
    }
}
