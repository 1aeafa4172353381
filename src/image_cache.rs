use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::day;

/// Days an entry stays readable after it was last written or read.
pub const CACHE_DURATION_DAYS: i64 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub images: Vec<String>,
    #[serde(with = "day")]
    pub date: NaiveDate,
}

impl CacheEntry {
    #[inline]
    #[must_use]
    pub fn is_valid(&self, today: NaiveDate) -> bool {
        day::days_between(self.date, today) <= CACHE_DURATION_DAYS
    }
}

/// Food name to thumbnail URLs, with a sliding expiry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageCache(HashMap<String, CacheEntry>);

impl ImageCache {
    /// Returns the images for `query` if its entry is still valid, sliding its date to `today`.
    pub fn lookup(&mut self, query: &str, today: NaiveDate) -> Option<Vec<String>> {
        let entry = self.0.get_mut(query)?;
        if !entry.is_valid(today) {
            return None;
        }
        entry.date = today;
        Some(entry.images.clone())
    }

    pub fn store(&mut self, query: &str, images: Vec<String>, today: NaiveDate) {
        self.0.insert(
            query.to_owned(),
            CacheEntry {
                images,
                date: today,
            },
        );
    }

    /// Drops every expired entry, returning how many were removed.
    pub fn purge_expired(&mut self, today: NaiveDate) -> usize {
        let before = self.0.len();
        self.0.retain(|_, entry| entry.is_valid(today));
        before - self.0.len()
    }

    #[cfg(test)]
    pub fn get(&self, query: &str) -> Option<&CacheEntry> {
        self.0.get(query)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn chicken() -> Vec<String> {
        (1..=3)
            .map(|i| format!("https://img.example/chicken{i}.jpg"))
            .collect()
    }

    #[test]
    fn test_sliding_expiry() {
        let mut cache = ImageCache::default();
        cache.store("Grilled Chicken", chicken(), day(5));

        // 19 days later: still valid and the date slides forward
        assert_eq!(cache.lookup("Grilled Chicken", day(24)), Some(chicken()));
        assert_eq!(cache.get("Grilled Chicken").unwrap().date, day(24));
    }

    #[test]
    fn test_expired_entry_survives_until_purge() {
        let mut cache = ImageCache::default();
        cache.store("Grilled Chicken", chicken(), day(5));

        // 21 days later the entry is no longer served but is still stored
        assert_eq!(cache.lookup("Grilled Chicken", day(26)), None);
        assert_eq!(cache.get("Grilled Chicken").unwrap().date, day(5));

        assert_eq!(cache.purge_expired(day(26)), 1);
        assert!(cache.get("Grilled Chicken").is_none());
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let mut cache = ImageCache::default();
        cache.store("Tofu", vec!["a".into()], day(1));
        cache.store("Pho", vec!["b".into()], day(2));
        // day 22 is exactly 20 days after day 2 and 21 after day 1
        assert_eq!(cache.purge_expired(day(22)), 1);
        assert!(cache.get("Tofu").is_none());
        assert!(cache.lookup("Pho", day(22)).is_some());
    }

    #[test]
    fn test_store_overwrites() {
        let mut cache = ImageCache::default();
        cache.store("Tofu", vec!["old".into()], day(1));
        cache.store("Tofu", vec!["new".into()], day(3));
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get("Tofu"),
            Some(&CacheEntry {
                images: vec!["new".into()],
                date: day(3)
            })
        );
    }

    #[test]
    fn test_reads_browser_cache() {
        let raw = r#"{"Halal Chicken":{"images":["x","y"],"date":"Mon Jan 01 2024"}}"#;
        let mut cache: ImageCache = serde_json::from_str(raw).unwrap();
        assert_eq!(
            cache.lookup("Halal Chicken", day(2)),
            Some(vec!["x".into(), "y".into()])
        );
    }
}
