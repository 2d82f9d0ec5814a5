pub mod dto;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use dto::{AddFridgeItem, FridgeItemUpdate};
pub use repo_types::{InventoryFields, InventoryItem};
pub use services::{expiring_within, DEFAULT_EXPIRY_WARNING_DAYS};
