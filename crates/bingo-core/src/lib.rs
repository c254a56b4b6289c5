//! Stan Bingo Core
//!
//! Layered:
//! - domain: items and the entity abstraction
//! - repository: access to the item table (trait + in-memory)
//! - remote: Supabase REST client and realtime frames
//! - card / prefs: per-device card selection and the rules flag
//! - feed / sync / reconnect: change subscriptions, the local cache they
//!   feed, and resubscribing after a dropped socket
//! - toggle / admin: the write paths of the two pages

pub mod admin;
pub mod cache;
pub mod card;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod kv;
pub mod optimistic;
pub mod prefs;
pub mod reconnect;
pub mod remote;
pub mod repository;
pub mod sync;
pub mod toggle;

#[cfg(test)]
mod tests;

pub use admin::{normalize_text, AdminController, EditSession};
pub use cache::{ItemCache, SharedItems};
pub use card::{draw_card, resolve_card, CardSelection};
pub use config::{BingoConfig, FeatureFlags};
pub use domain::{Entity, Item, ItemId, ItemPatch, NewItem};
pub use error::{BingoError, BingoResult};
pub use feed::{ChangeEvent, ChangeFilter, ChangeHub, ChangeKind, EventSource, RowChange, Subscription};
pub use kv::{KeyValueStore, MemoryKv};
pub use optimistic::optimistic;
pub use prefs::DevicePrefs;
pub use reconnect::Backoff;
pub use remote::PostgrestRepository;
pub use repository::{ItemRepository, ListOrder, MemoryRepository};
pub use sync::{SyncClient, SyncMode};
pub use toggle::ToggleController;
