//! The persisted records, loaded once from the store and written back on every change.
use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    favorites::Favorites,
    image_cache::ImageCache,
    quota::QuotaRecord,
    store::{self, Store},
};

/// Writes a record as a side effect of an operation that must not fail.
async fn persist<T: Serialize + ?Sized>(store: &mut Store, key: &str, value: &T) {
    if let Err(e) = store.save(key, value).await {
        log::warn!("could not persist `{key}`: {e}");
    }
}

/// The key is kept as plain text, the way the browser stores it. A JSON string
/// from an older record is still accepted.
async fn load_api_key(store: &Store) -> String {
    match store.get(store::API_KEY).await {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or(raw),
        Ok(None) => String::new(),
        Err(e) => {
            log::warn!("could not read `{}`, starting without a key: {e}", store::API_KEY);
            String::new()
        }
    }
}

#[derive(Debug)]
pub struct Context {
    store: Store,
    api_key: String,
    quota: QuotaRecord,
    favorites: Favorites,
    images: ImageCache,
}

impl Context {
    pub async fn load(store: Store) -> Self {
        let api_key = load_api_key(&store).await;
        let quota = store.load(store::QUOTA).await;
        let favorites = store.load(store::FAVORITES).await;
        let images = store.load(store::IMAGE_CACHE).await;
        Self {
            store,
            api_key,
            quota,
            favorites,
            images,
        }
    }

    /// Resets the counter and purges expired images on the first load of a new day.
    /// Returns whether a reset happened.
    pub async fn begin_day(&mut self, today: NaiveDate) -> bool {
        if !self.quota.is_stale(today) {
            return false;
        }
        self.quota.reset(today);
        persist(&mut self.store, store::QUOTA, &self.quota).await;
        let purged = self.images.purge_expired(today);
        persist(&mut self.store, store::IMAGE_CACHE, &self.images).await;
        log::info!("Old cache entries cleared ({purged} removed).");
        true
    }

    pub async fn lookup_images(&mut self, query: &str, today: NaiveDate) -> Option<Vec<String>> {
        let hit = self.images.lookup(query, today)?;
        persist(&mut self.store, store::IMAGE_CACHE, &self.images).await;
        Some(hit)
    }

    pub async fn store_images(&mut self, query: &str, images: Vec<String>, today: NaiveDate) {
        self.images.store(query, images, today);
        persist(&mut self.store, store::IMAGE_CACHE, &self.images).await;
    }

    /// Counts one finished search and persists the counter.
    pub async fn record_attempt(&mut self) -> u32 {
        let count = self.quota.record_attempt();
        persist(&mut self.store, store::QUOTA, &self.quota).await;
        count
    }

    /// Returns the new membership. The toggle stands even if it cannot be written.
    pub async fn toggle_favorite(&mut self, name: &str) -> bool {
        let favorited = self.favorites.toggle(name);
        persist(&mut self.store, store::FAVORITES, &self.favorites).await;
        favorited
    }

    pub async fn set_api_key(&mut self, key: &str) {
        self.api_key = key.trim().to_owned();
        log::info!("API key set ({} characters)", self.api_key.len());
        if let Err(e) = self.store.set(store::API_KEY, &self.api_key).await {
            log::warn!("could not persist `{}`: {e}", store::API_KEY);
        }
    }

    #[inline]
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        Some(self.api_key.as_str()).filter(|k| !k.is_empty())
    }

    #[inline]
    #[must_use]
    pub const fn quota(&self) -> &QuotaRecord {
        &self.quota
    }

    #[inline]
    #[must_use]
    pub const fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    #[cfg(test)]
    pub const fn images(&self) -> &ImageCache {
        &self.images
    }

    #[cfg(test)]
    pub const fn store(&self) -> &Store {
        &self.store
    }
}
