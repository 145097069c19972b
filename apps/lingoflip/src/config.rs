//! Runtime configuration read from the environment.

use lingoflip_core::{MatchSettings, SpellingSettings};
use std::path::PathBuf;

pub const DATA_DIR_VAR: &str = "LINGOFLIP_DATA_DIR";
pub const PROVIDER_URL_VAR: &str = "LINGOFLIP_PROVIDER_URL";
pub const WORDS_FILE_VAR: &str = "LINGOFLIP_WORDS_FILE";

const DB_FILE: &str = "lingoflip.db";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where the deck database lives.
    pub data_dir: PathBuf,
    /// Base URL of the HTTP word provider.
    pub provider_url: Option<String>,
    /// JSON file of built-in unit words, used when no provider URL is set.
    pub words_file: Option<PathBuf>,
    pub matching: MatchSettings,
    pub spelling: SpellingSettings,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = get(DATA_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        Self {
            data_dir,
            provider_url: get(PROVIDER_URL_VAR),
            words_file: get(WORDS_FILE_VAR).map(PathBuf::from),
            matching: MatchSettings::default(),
            spelling: SpellingSettings::default(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lingoflip")
}
