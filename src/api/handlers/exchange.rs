use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    models::{QrImage, ReceiveOutcome, Sticker, StickerId, TradeOutcome},
    services::exchange::ExchangeService,
    AppState,
};

fn exchange_service(state: &AppState) -> ExchangeService {
    ExchangeService::new(state.store.clone(), state.config.exchange.clone())
}

pub async fn get_qr_code(
    State(state): State<AppState>,
    Path(id): Path<StickerId>,
) -> AppResult<Json<QrImage>> {
    let image = exchange_service(&state).qr_for(id).await?;
    Ok(Json(image))
}

#[derive(Debug, Deserialize)]
pub struct ReceiveRequest {
    pub payload: String,
}

#[derive(Debug, Serialize)]
pub struct ReceiveResponse {
    #[serde(flatten)]
    pub outcome: ReceiveOutcome,
    pub message: String,
}

pub async fn receive_sticker(
    State(state): State<AppState>,
    Json(req): Json<ReceiveRequest>,
) -> AppResult<Json<ReceiveResponse>> {
    let outcome = exchange_service(&state).receive(&req.payload).await?;

    let message = match &outcome {
        ReceiveOutcome::Received { .. } => "Sticker received!",
        ReceiveOutcome::Duplicate => "You already have this sticker!",
        ReceiveOutcome::Ignored => "Not a sticker code",
    };

    Ok(Json(ReceiveResponse {
        outcome,
        message: message.to_string(),
    }))
}

pub async fn draw_sticker(State(state): State<AppState>) -> AppResult<Json<Sticker>> {
    let sticker = exchange_service(&state).draw()?;
    Ok(Json(sticker))
}

#[derive(Debug, Deserialize)]
pub struct TradeRequest {
    pub give_id: StickerId,
}

pub async fn random_trade(
    State(state): State<AppState>,
    Json(req): Json<TradeRequest>,
) -> AppResult<Json<TradeOutcome>> {
    let trade = exchange_service(&state).random_trade(req.give_id).await?;
    Ok(Json(trade))
}
