use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{error::AppResult, services::generator::GeneratedImage, AppState};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// Produces a preview image. The client saves it with `POST /stickers`
/// or simply drops it to discard.
pub async fn generate_sticker(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> AppResult<Json<GeneratedImage>> {
    let image = state.generator.generate(&req.prompt).await?;
    Ok(Json(image))
}
