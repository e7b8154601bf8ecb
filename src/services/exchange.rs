use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use qrcode::{render::svg, QrCode};

use crate::{
    config::ExchangeConfig,
    error::AppResult,
    models::{QrImage, QrPayload, ReceiveOutcome, Sticker, StickerId, TradeOutcome},
    services::inventory::InventoryStore,
};

/// Sticker exchange between albums: QR hand-over and random trades.
pub struct ExchangeService {
    store: Arc<InventoryStore>,
    config: ExchangeConfig,
}

impl ExchangeService {
    pub fn new(store: Arc<InventoryStore>, config: ExchangeConfig) -> Self {
        Self { store, config }
    }

    /// QR code for handing over a held sticker.
    pub async fn qr_for(&self, id: StickerId) -> AppResult<QrImage> {
        let sticker = self.store.get(id).await?;
        let payload = encode_payload(&sticker)?;
        render_qr(&payload, self.config.qr_size)
    }

    /// Applies a scanned QR payload to the album.
    pub async fn receive(&self, text: &str) -> AppResult<ReceiveOutcome> {
        let Some(payload) = decode_payload(text) else {
            return Ok(ReceiveOutcome::Ignored);
        };
        let Some(src) = payload.src else {
            return Ok(ReceiveOutcome::Ignored);
        };

        // The receiver mints its own id; the sender's id only counts for the duplicate check
        let sticker = Sticker::new(self.store.next_id()?, src, payload.prompt);
        match self.store.add_if_absent(payload.id, sticker).await? {
            Some(sticker) => Ok(ReceiveOutcome::Received { sticker }),
            None => {
                tracing::info!("Scanned sticker already in album");
                Ok(ReceiveOutcome::Duplicate)
            }
        }
    }

    /// A sticker drawn from the asset pool, not yet in the album.
    pub fn draw(&self) -> AppResult<Sticker> {
        self.store.draw_random(&self.config.assets)
    }

    /// Gives away `give_id` and takes a sticker drawn from the asset pool.
    pub async fn random_trade(&self, give_id: StickerId) -> AppResult<TradeOutcome> {
        let received = self.draw()?;
        let given = self.store.swap(give_id, received.clone()).await?;
        Ok(TradeOutcome { given, received })
    }
}

/// JSON text carried by a sticker's QR code.
pub fn encode_payload(sticker: &Sticker) -> AppResult<String> {
    Ok(serde_json::to_string(&QrPayload::from(sticker))?)
}

/// Parses scanned text. Anything without a usable `src` yields `None`.
pub fn decode_payload(text: &str) -> Option<QrPayload> {
    let payload: QrPayload = match serde_json::from_str(text) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Invalid QR payload: {}", e);
            return None;
        }
    };

    match payload.src.as_deref() {
        Some(src) if !src.trim().is_empty() => Some(payload),
        _ => {
            tracing::warn!("QR payload has no sticker image");
            None
        }
    }
}

pub fn render_qr(payload: &str, size: u32) -> AppResult<QrImage> {
    let code = QrCode::new(payload.as_bytes())?;
    let svg = code
        .render::<svg::Color>()
        .min_dimensions(size, size)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();
    let data_uri = format!("data:image/svg+xml;base64,{}", STANDARD.encode(&svg));

    Ok(QrImage {
        payload: payload.to_string(),
        svg,
        data_uri,
    })
}
