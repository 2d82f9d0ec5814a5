pub mod catalog;
pub mod config;
pub mod error;
pub mod fridge;
pub mod kitchen;
pub mod nutrition;
pub mod quantity;
pub mod recipes;
pub mod spreadsheet;
pub mod state;
pub mod storage;

pub use error::{KitchenError, KitchenResult};
pub use kitchen::Kitchen;
