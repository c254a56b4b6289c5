//! Item List Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Each page owns
//! one store holding its copy of the item table.

use bingo_core::{Item, ItemCache};
use leptos::prelude::*;
use reactive_stores::Store;

#[derive(Clone, Debug, Default, Store)]
pub struct ItemsState {
    /// Rows as last synced
    pub items: Vec<Item>,
    /// Set once the first full load succeeded
    pub loaded: bool,
}

pub type ItemsStore = Store<ItemsState>;

pub fn new_items_store() -> ItemsStore {
    Store::new(ItemsState::default())
}

// ========================
// Store Helper Functions
// ========================

/// Rows, tracked
pub fn store_items(store: &ItemsStore) -> Vec<Item> {
    store.items().get()
}

pub fn store_item_count(store: &ItemsStore) -> usize {
    store.items().read().len()
}

pub fn store_is_loaded(store: &ItemsStore) -> bool {
    store.loaded().get()
}

pub fn store_set_loaded(store: &ItemsStore) {
    store.loaded().set(true);
}

/// `ItemCache` over a page store, so sync and toggles can write into it.
///
/// Requests can resolve after their page unmounted; once the store is
/// disposed it reads as empty and writes are dropped.
#[derive(Clone, Copy)]
pub struct StoreItems(pub ItemsStore);

impl ItemCache for StoreItems {
    fn snapshot(&self) -> Vec<Item> {
        self.0.items().try_get_untracked().unwrap_or_default()
    }

    fn modify(&self, f: &mut dyn FnMut(&mut Vec<Item>)) {
        match self.0.items().try_write() {
            Some(mut rows) => f(&mut *rows),
            None => log::debug!("Item store disposed, dropping write"),
        }
    }
}
