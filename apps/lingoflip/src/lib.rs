//! LingoFlip application layer.
//!
//! Wires the game engines from `lingoflip-core` to persistence (SQLite), a
//! word provider for the textbook units, and a tokio timer queue, behind a
//! single [`Controller`]. The `commands` module turns controller state into
//! serializable views for a front end.

pub mod commands;
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod logging;
pub mod provider;
pub mod runtime;

pub use config::AppConfig;
pub use controller::{Controller, GameEvent};
pub use error::{AppError, Result};

use db::SqliteRepository;
use provider::{HttpWordProvider, Provider, StaticWordProvider};
use tracing::info;

/// Controller over the on-disk store and the configured provider.
pub type App = Controller<SqliteRepository, Provider>;

/// Pick the word provider: HTTP when a URL is set, else a words file, else
/// nothing (only custom decks can be played).
pub fn provider_from_config(config: &AppConfig) -> Result<Provider> {
    if let Some(url) = &config.provider_url {
        info!(url = %url, "using HTTP word provider");
        return Ok(Provider::Http(HttpWordProvider::new(url)?));
    }
    if let Some(path) = &config.words_file {
        info!(path = %path.display(), "using word list file");
        return Ok(Provider::Static(StaticWordProvider::from_file(path)?));
    }
    info!("no word provider configured, built-in units unavailable");
    Ok(Provider::Static(StaticWordProvider::new()))
}

/// Install logging, open the deck database under the data directory and build
/// the controller.
pub fn open(config: &AppConfig) -> Result<App> {
    logging::init();
    std::fs::create_dir_all(&config.data_dir)?;
    let db_path = config.db_path();
    info!(path = %db_path.display(), "opening deck database");

    let repository = SqliteRepository::open(&db_path)?;
    let provider = provider_from_config(config)?;

    Ok(Controller::new(
        repository,
        provider,
        config.matching.clone(),
        config.spelling.clone(),
    ))
}
