//! Device Preferences
//!
//! The two values a device remembers: which card it holds and whether the
//! rules were acknowledged.

use rand::Rng;

use crate::card::{draw_card, CardSelection};
use crate::config::BingoConfig;
use crate::domain::Item;
use crate::kv::KeyValueStore;

const RULES_SEEN: &str = "true";

pub struct DevicePrefs<K: KeyValueStore> {
    kv: K,
    card_key: String,
    rules_key: String,
    card_size: usize,
}

impl<K: KeyValueStore> DevicePrefs<K> {
    pub fn new(kv: K, config: &BingoConfig) -> Self {
        Self {
            kv,
            card_key: config.card_key.clone(),
            rules_key: config.rules_key.clone(),
            card_size: config.card_size,
        }
    }

    /// Stored card, if any. Unreadable values count as absent.
    pub fn stored_card(&self) -> Option<CardSelection> {
        let raw = self.kv.get(&self.card_key)?;
        let card = CardSelection::from_json(&raw);
        if card.is_none() {
            log::warn!("Ignoring unreadable card selection under {}", self.card_key);
        }
        card
    }

    /// The device's card: the stored one verbatim, or a fresh draw that gets persisted.
    ///
    /// Nothing is drawn while the item set is empty.
    pub fn card_or_draw<R: Rng + ?Sized>(&self, items: &[Item], rng: &mut R) -> Option<CardSelection> {
        if let Some(card) = self.stored_card() {
            return Some(card);
        }
        if items.is_empty() {
            return None;
        }
        let card = draw_card(items, self.card_size, rng);
        self.kv.set(&self.card_key, &card.to_json());
        log::info!("Drew a new card with {} cells", card.len());
        Some(card)
    }

    pub fn rules_seen(&self) -> bool {
        self.kv.get(&self.rules_key).is_some()
    }

    pub fn mark_rules_seen(&self) {
        self.kv.set(&self.rules_key, RULES_SEEN);
    }

    /// Forget both the card and the rules acknowledgement
    pub fn reset(&self) {
        self.kv.remove(&self.card_key);
        self.kv.remove(&self.rules_key);
    }
}
