use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{NewSticker, Sticker, StickerId},
    AppState,
};

use super::MessageResponse;

pub async fn list_stickers(State(state): State<AppState>) -> AppResult<Json<Vec<Sticker>>> {
    Ok(Json(state.store.list().await))
}

pub async fn get_sticker(
    State(state): State<AppState>,
    Path(id): Path<StickerId>,
) -> AppResult<Json<Sticker>> {
    let sticker = state.store.get(id).await?;
    Ok(Json(sticker))
}

/// Saves a sticker, typically one just produced by `/generate`.
pub async fn add_sticker(
    State(state): State<AppState>,
    Json(req): Json<NewSticker>,
) -> AppResult<Json<Sticker>> {
    let src = req.src.trim();
    if src.is_empty() {
        return Err(AppError::Validation("Sticker image is required".to_string()));
    }

    let prompt = req
        .prompt
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    let sticker = Sticker::new(state.store.next_id()?, src, prompt);
    let sticker = state.store.add(sticker).await?;

    Ok(Json(sticker))
}

pub async fn delete_sticker(
    State(state): State<AppState>,
    Path(id): Path<StickerId>,
) -> AppResult<Json<MessageResponse>> {
    state.store.remove(id).await?;

    Ok(Json(MessageResponse {
        message: "Sticker removed".to_string(),
    }))
}

pub async fn delete_sticker_at(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> AppResult<Json<Sticker>> {
    let removed = state.store.remove_at(index).await?;
    Ok(Json(removed))
}
