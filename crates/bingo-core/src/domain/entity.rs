//! Domain Layer - Core Entity Trait
//!
//! Every row mirrored from the remote store has a unique, stable identifier.

/// Core trait for all domain entities
pub trait Entity: Sized + Clone {
    /// The type of the entity's unique identifier
    type Id: Clone + Eq + std::hash::Hash;

    /// Returns the entity's unique identifier
    fn id(&self) -> &Self::Id;
}

/// Replace the row with the same id as `updated`, leaving everything else alone.
///
/// Returns `false` when no local row matched.
pub fn merge_replace<T: Entity>(rows: &mut [T], updated: T) -> bool {
    match rows.iter_mut().find(|row| row.id() == updated.id()) {
        Some(row) => {
            *row = updated;
            true
        }
        None => false,
    }
}

/// Remove every row with the given id. Returns `true` if anything was removed.
pub fn remove_by_id<T: Entity>(rows: &mut Vec<T>, id: &T::Id) -> bool {
    let before = rows.len();
    rows.retain(|row| row.id() != id);
    rows.len() != before
}
