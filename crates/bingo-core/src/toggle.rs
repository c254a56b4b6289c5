//! Toggle Controller
//!
//! Board cell toggles: flip locally first, persist, roll back on failure.

use crate::cache::ItemCache;
use crate::domain::{ItemId, ItemPatch};
use crate::error::BingoResult;
use crate::optimistic::optimistic;
use crate::repository::ItemRepository;

#[derive(Clone)]
pub struct ToggleController<R, C> {
    repo: R,
    cache: C,
}

impl<R: ItemRepository, C: ItemCache> ToggleController<R, C> {
    pub fn new(repo: R, cache: C) -> Self {
        Self { repo, cache }
    }

    /// Flip `id` from `was_checked`. On error the cached flag is back at `was_checked`.
    ///
    /// Racing toggles on the same id are not ordered; the last acknowledgement wins.
    pub async fn toggle(&self, id: &ItemId, was_checked: bool) -> BingoResult<()> {
        let flipped = !was_checked;
        let patch = ItemPatch::checked(flipped);
        optimistic(
            || {
                self.cache.set_checked(id, flipped);
            },
            || self.repo.update(id, &patch),
            || {
                self.cache.set_checked(id, was_checked);
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SharedItems;
    use crate::domain::Item;
    use crate::repository::MemoryRepository;

    fn setup() -> (MemoryRepository, SharedItems, ToggleController<MemoryRepository, SharedItems>) {
        let rows = vec![Item::new(1u64, "A"), Item::new(2u64, "B")];
        let repo = MemoryRepository::new(rows.clone());
        let cache = SharedItems::new(rows);
        let toggles = ToggleController::new(repo.clone(), cache.clone());
        (repo, cache, toggles)
    }

    #[tokio::test]
    async fn test_toggle_success_flips_local_and_remote() {
        let (repo, cache, toggles) = setup();
        let id = ItemId::from("1");

        toggles.toggle(&id, false).await.unwrap();

        assert!(cache.get(&id).unwrap().checked);
        assert!(repo.rows()[0].checked);
        assert!(!cache.get(&"2".into()).unwrap().checked);
    }

    #[tokio::test]
    async fn test_toggle_failure_rolls_back() {
        let (repo, cache, toggles) = setup();
        let id = ItemId::from("2");
        repo.fail_writes(true);

        let result = toggles.toggle(&id, false).await;

        assert!(result.is_err());
        assert!(!cache.get(&id).unwrap().checked);
        assert!(!repo.rows()[1].checked);
    }

    #[tokio::test]
    async fn test_toggle_uncached_id_still_persists() {
        let (repo, cache, toggles) = setup();
        let id = ItemId::from("9");
        toggles.toggle(&id, false).await.unwrap();
        assert_eq!(repo.calls(), 1);
        assert!(cache.get(&id).is_none());
    }
}
