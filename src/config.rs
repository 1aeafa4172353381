use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use url::Url;

const DEFAULT_MENU_BASE_URL: &str = "https://dining.umich.edu/menus-locations/dining-halls/";
const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";
const DEFAULT_SEARCH_ENGINE_ID: &str = "51db3fa032b5d4485";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory of the file store. Unset means records only live in memory.
    pub store: Option<PathBuf>,
    pub menu_base: Url,
    pub search_endpoint: Url,
    pub search_engine_id: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: try_load(&var, "HOST", "127.0.0.1"),
            port: try_load(&var, "PORT", "3000"),
            store: var("STORE").filter(|p| !p.is_empty()).map(PathBuf::from),
            menu_base: try_load(&var, "MENU_BASE_URL", DEFAULT_MENU_BASE_URL),
            search_endpoint: try_load(&var, "SEARCH_ENDPOINT", DEFAULT_SEARCH_ENDPOINT),
            search_engine_id: try_load(&var, "SEARCH_ENGINE_ID", DEFAULT_SEARCH_ENGINE_ID),
        }
    }
}

/// Parses `key`, falling back to `default` when it is unset or invalid.
fn try_load<T: FromStr>(var: impl Fn(&str) -> Option<String>, key: &str, default: &str) -> T
where
    T::Err: Display,
{
    if let Some(value) = var(key) {
        match value.parse() {
            Ok(v) => return v,
            Err(e) => log::warn!("Invalid {key} value `{value}`, using default: {e}"),
        }
    } else {
        log::info!("{key} not set, using default: {default}");
    }
    default
        .parse()
        .unwrap_or_else(|e| panic!("default for {key} should parse: {e}"))
}
