pub mod favorites;
pub mod store;

pub use favorites::{merge_words, normalize_word, AddReport, FavoritesBook, FAVORITES_KEY};
pub use store::{InMemoryStore, JsonFileStore, KeyValueStore};
