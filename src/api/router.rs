use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router<AppState> {
    // Album routes
    let sticker_routes = Router::new()
        .route("/", get(handlers::stickers::list_stickers))
        .route("/", post(handlers::stickers::add_sticker))
        .route("/:id", get(handlers::stickers::get_sticker))
        .route("/:id", delete(handlers::stickers::delete_sticker))
        .route("/at/:index", delete(handlers::stickers::delete_sticker_at));

    // Generation routes
    let generate_routes = Router::new().route("/", post(handlers::generate::generate_sticker));

    // Exchange routes
    let exchange_routes = Router::new()
        .route("/qr/:id", get(handlers::exchange::get_qr_code))
        .route("/receive", post(handlers::exchange::receive_sticker))
        .route("/draw", get(handlers::exchange::draw_sticker))
        .route("/random", post(handlers::exchange::random_trade));

    // Combine all routes
    Router::new()
        .nest("/stickers", sticker_routes)
        .nest("/generate", generate_routes)
        .nest("/exchange", exchange_routes)
        .with_state(state)
}
