use serde::{Deserialize, Serialize};

use super::sticker::{Sticker, StickerId};

/// Placeholder used when a sticker has no prompt.
pub const UNKNOWN_PROMPT: &str = "Unknown";

/// Body of an exchange QR code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrPayload {
    #[serde(default)]
    pub id: Option<StickerId>,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl From<&Sticker> for QrPayload {
    fn from(sticker: &Sticker) -> Self {
        Self {
            id: Some(sticker.id),
            src: Some(sticker.src.clone()),
            prompt: Some(
                sticker
                    .prompt
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_PROMPT.to_string()),
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QrImage {
    pub payload: String,
    pub svg: String,
    pub data_uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReceiveOutcome {
    Received { sticker: Sticker },
    Duplicate,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeOutcome {
    pub given: Sticker,
    pub received: Sticker,
}
