//! Domain Layer
//!
//! Bingo entities and the core entity abstraction.
//! This layer has no I/O (serde only).

mod entity;
mod item;

pub use entity::{merge_replace, remove_by_id, Entity};
pub use item::{Item, ItemId, ItemPatch, NewItem};
