use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::traits::{PreferenceRepository, Storage};
use crate::utils::errors::Result;

#[derive(Debug, Default)]
pub struct InMemoryPreferenceRepository {
    values: RwLock<HashMap<Storage, String>>,
}

impl InMemoryPreferenceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceRepository for InMemoryPreferenceRepository {
    async fn get_preference(&self, key: Storage) -> Result<Option<String>> {
        Ok(self.values.read().await.get(&key).cloned())
    }

    async fn set_preference(&self, key: Storage, value: String) -> Result<()> {
        self.values.write().await.insert(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_preference_is_none() {
        let repo = InMemoryPreferenceRepository::new();
        let value = tokio_test::block_on(repo.get_preference(Storage::Currency)).unwrap();
        assert!(value.is_none());
    }
}
