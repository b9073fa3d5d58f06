pub mod connection;
pub mod files;
pub mod item;

use crate::error::OpError;
use item::Item;

/// Storage port: named text items per user, identity `(user_name, name)`.
///
/// `save` does not enforce uniqueness; callers pre-check with `is_exists`.
#[allow(async_fn_in_trait)]
pub trait ItemStore {
    async fn save(&self, item: &Item) -> Result<(), OpError>;
    async fn get(&self, user: &str, name: &str) -> Result<Option<Item>, OpError>;
    async fn is_exists(&self, user: &str, name: &str) -> Result<bool, OpError>;
    async fn remove(&self, user: &str, name: &str) -> Result<(), OpError>;
    async fn list(&self, user: &str) -> Result<Vec<String>, OpError>;
}
