pub mod exchange;
pub mod generator;
pub mod inventory;
