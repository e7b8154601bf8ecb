pub mod exchange;
pub mod generate;
pub mod stickers;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
