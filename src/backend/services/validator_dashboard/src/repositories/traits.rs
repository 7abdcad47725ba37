use async_trait::async_trait;

use crate::utils::errors::Result;

/// Keys of the user preferences kept between sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Storage {
    Currency,
}

impl Storage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Storage::Currency => "currency",
        }
    }
}

#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    async fn get_preference(&self, key: Storage) -> Result<Option<String>>;
    async fn set_preference(&self, key: Storage, value: String) -> Result<()>;
}
