use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Food names the user marked as favorites.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites(Vec<String>);

impl Favorites {
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    /// Adds `name` if absent, removes it if present. Returns the new membership.
    pub fn toggle(&mut self, name: &str) -> bool {
        if let Some(idx) = self.0.iter().position(|n| n == name) {
            self.0.remove(idx);
            log::info!("Removed from favorites: {name}");
            false
        } else {
            self.0.push(name.to_owned());
            log::info!("Added to favorites: {name}");
            true
        }
    }

    /// Number of distinct names in `names` that are favorites.
    pub fn count_among<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> usize {
        names
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .filter(|name| self.contains(name))
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
