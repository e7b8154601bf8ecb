pub mod exchange;
pub mod sticker;

pub use exchange::*;
pub use sticker::*;
