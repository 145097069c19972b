//! Local persistence of user-authored decks.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::{DeckStore, MemoryDeckStore, SqliteRepository, DECKS_KEY};
