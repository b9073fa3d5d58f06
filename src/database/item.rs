use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named block of user-authored text owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub content: String,
    pub user_name: String,
}

impl Item {
    pub fn new(
        user_name: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            user_name: user_name.into(),
        }
    }

    /// Deterministic storage key digested from owner and name.
    pub fn storage_key(&self) -> Uuid {
        storage_key(&self.user_name, &self.name)
    }
}

/// Name-based v5 UUID over `(user_name, name)`, so the same pair always
/// maps to the same key. Never shown to users.
pub fn storage_key(user_name: &str, name: &str) -> Uuid {
    let seed = format!("{user_name}:{name}");
    Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_is_stable_per_owner_and_name() {
        let a = Item::new("alice", "deck1", "q:x\na:y");
        let same = Item::new("alice", "deck1", "entirely different content");
        let other_owner = Item::new("bob", "deck1", "q:x\na:y");
        let other_name = Item::new("alice", "deck2", "q:x\na:y");

        assert_eq!(a.storage_key(), same.storage_key());
        assert_ne!(a.storage_key(), other_owner.storage_key());
        assert_ne!(a.storage_key(), other_name.storage_key());
    }
}
