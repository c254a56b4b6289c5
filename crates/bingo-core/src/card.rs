//! Card Selection
//!
//! A device's card is a fixed random subset of the item ids, drawn once and
//! then reused. Ids that no longer exist are dropped when the card is shown.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::{Item, ItemId};

/// Ordered ids making up one device's card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardSelection(Vec<ItemId>);

impl CardSelection {
    pub fn new(ids: Vec<ItemId>) -> Self {
        Self(ids)
    }

    pub fn ids(&self) -> &[ItemId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> String {
        // a Vec of strings always serializes
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// Shuffle every id (Fisher–Yates) and keep the first `size`
pub fn draw_card<R: Rng + ?Sized>(items: &[Item], size: usize, rng: &mut R) -> CardSelection {
    let mut ids: Vec<ItemId> = items.iter().map(|item| item.id.clone()).collect();
    ids.shuffle(rng);
    ids.truncate(size);
    CardSelection(ids)
}

/// Items on the card, in card order. Dangling ids are skipped.
pub fn resolve_card(selection: &CardSelection, items: &[Item]) -> Vec<Item> {
    let by_id: HashMap<&ItemId, &Item> = items.iter().map(|item| (&item.id, item)).collect();
    selection
        .ids()
        .iter()
        .filter_map(|id| by_id.get(id).map(|item| (*item).clone()))
        .collect()
}
