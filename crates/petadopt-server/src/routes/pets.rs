use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{FilterOptions, PetRecord};
use crate::routes::AppState;
use crate::services::catalog::{page_window, BrowseState, FilterState, Page, PageLink, PAGE_SIZE};
use crate::services::listings::UploadedFile;

#[derive(Debug, Deserialize)]
pub struct PromptQuery {
    pub prompt: Option<String>,
}

/// Filter values arrive as plain strings; an empty value or `all` means
/// "no constraint".
#[derive(Debug, Default, Deserialize)]
pub struct BrowseQuery {
    pub species: Option<String>,
    pub gender: Option<String>,
    pub size: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    pub promoted: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResponse {
    #[serde(flatten)]
    pub page: Page,
    pub page_numbers: Vec<PageLink>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub transcript: String,
}

/// GET /api/pets
pub async fn list(State(state): State<AppState>) -> Json<Vec<PetRecord>> {
    Json(state.listings.fetch_all().await)
}

/// GET /api/pets/browse?species=dog&price=under-500&q=pudel&page=2
pub async fn browse(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> AppResult<Json<BrowseResponse>> {
    let filters = FilterState {
        species: parse_choice("species", query.species)?,
        gender: parse_choice("gender", query.gender)?,
        size: parse_choice("size", query.size)?,
        location: non_blank(query.location),
        category: non_blank(query.category),
        price: parse_choice("price", query.price)?,
        promoted: parse_flag("promoted", query.promoted)?,
    };
    let requested = parse_page(query.page)?;
    let view = BrowseState {
        page: requested,
        ..BrowseState::default()
            .with_filters(filters)
            .with_query(query.q.unwrap_or_default())
    };

    let pets = state.listings.fetch_all().await;
    let page = view.view(&pets, PAGE_SIZE);

    // The bar always highlights a real page, even when the request overshoots.
    let current = view.go_to_page(requested, page.total_pages).page;
    let page_numbers = page_window(current, page.total_pages);

    Ok(Json(BrowseResponse { page, page_numbers }))
}

/// GET /api/pets/gemini?prompt=...
pub async fn ai_search(
    State(state): State<AppState>,
    Query(query): Query<PromptQuery>,
) -> AppResult<Json<Vec<PetRecord>>> {
    let prompt = query.prompt.unwrap_or_default();
    let pets = state.listings.fetch_by_prompt(&prompt).await?;
    Ok(Json(pets))
}

/// POST /api/pets/gemini/image (multipart field `file`)
pub async fn image_search(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<Vec<PetRecord>>> {
    let file = take_file(multipart, "file", "No file uploaded").await?;
    let pets = state.listings.fetch_by_image(file).await?;
    Ok(Json(pets))
}

/// POST /api/pets/voice-to-text (multipart field `audio_file`)
pub async fn voice_to_text(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<TranscriptResponse>> {
    let file = take_file(multipart, "audio_file", "No audio file provided").await?;
    let transcript = state.listings.transcribe_audio(file).await?;
    Ok(Json(TranscriptResponse { transcript }))
}

/// GET /api/filters
pub async fn filter_options(State(state): State<AppState>) -> AppResult<Json<FilterOptions>> {
    let options = state.listings.fetch_filter_options().await?;
    Ok(Json(options))
}

async fn take_file(
    mut multipart: Multipart,
    field_name: &'static str,
    missing: &'static str,
) -> AppResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(field_name, format!("Invalid upload: {e}")))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let file_name = field.file_name().unwrap_or(field_name).to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(field_name, format!("Invalid upload: {e}")))?;

        if bytes.is_empty() {
            break;
        }
        return Ok(UploadedFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(AppError::validation(field_name, missing))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "all")
}

fn parse_choice<T: DeserializeOwned>(field: &'static str, value: Option<String>) -> AppResult<Option<T>> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };

    serde_json::from_value(serde_json::Value::String(value.to_lowercase()))
        .map(Some)
        .map_err(|_| AppError::validation(field, format!("Unknown {field} filter: {value}")))
}

fn parse_page(value: Option<String>) -> AppResult<usize> {
    let Some(value) = non_blank(value) else {
        return Ok(1);
    };

    match value.parse::<usize>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(AppError::validation("page", format!("Page must be a positive number: {value}"))),
    }
}

fn parse_flag(field: &'static str, value: Option<String>) -> AppResult<Option<bool>> {
    match non_blank(value).as_deref() {
        None => Ok(None),
        Some("true") | Some("1") => Ok(Some(true)),
        Some("false") | Some("0") => Ok(Some(false)),
        Some(other) => Err(AppError::validation(field, format!("Unknown {field} filter: {other}"))),
    }
}
