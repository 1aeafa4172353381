mod local;

use std::{collections::HashMap, path::Path};

use serde::{de::DeserializeOwned, Serialize};

use local::FileStore;

pub const API_KEY: &str = "googleApiKey";
pub const QUOTA: &str = "apiCounterData";
pub const FAVORITES: &str = "lovedItems";
pub const IMAGE_CACHE: &str = "imageCache";

#[derive(Debug)]
#[non_exhaustive]
pub enum Store {
    Local(FileStore),
    AdHoc(HashMap<String, String>),
}

impl Store {
    #[inline]
    pub async fn local(p: impl AsRef<Path>) -> crate::Result<Self> {
        FileStore::open(p).await.map(Self::Local)
    }

    #[inline]
    #[must_use]
    pub fn ad_hoc() -> Self {
        Self::AdHoc(HashMap::new())
    }

    pub async fn get(&self, key: &str) -> crate::Result<Option<String>> {
        match self {
            Self::Local(f) => f.get(key).await,
            Self::AdHoc(map) => Ok(map.get(key).cloned()),
        }
    }

    pub async fn set(&mut self, key: &str, value: &str) -> crate::Result<()> {
        match self {
            Self::Local(f) => f.set(key, value).await,
            Self::AdHoc(map) => {
                map.insert(key.to_owned(), value.to_owned());
                Ok(())
            }
        }
    }

    /// Reads a JSON record. An absent, unreadable or malformed record yields the default.
    pub async fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                log::warn!("could not read `{key}`, starting from default: {e}");
                return T::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("record `{key}` is malformed, starting from default: {e}");
            T::default()
        })
    }

    pub async fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> crate::Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw).await
    }
}
