//! Sync Client
//!
//! Keeps a local item cache in step with the remote table: one full load,
//! then change events merged in by id as they arrive.

use std::future::Future;
use std::time::Duration;

use futures::StreamExt;

use crate::cache::ItemCache;
use crate::error::BingoResult;
use crate::feed::{ChangeEvent, ChangeFilter, ChangeKind, RowChange, Subscription};
use crate::reconnect::Backoff;
use crate::repository::{ItemRepository, ListOrder};

/// What a page listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Board: only updates to existing rows
    UpdatesOnly,
    /// Admin: inserts, updates and deletes
    Full,
}

impl SyncMode {
    pub fn kinds(&self) -> &'static [ChangeKind] {
        match self {
            SyncMode::UpdatesOnly => &[ChangeKind::Update],
            SyncMode::Full => &ChangeKind::ALL,
        }
    }

    fn order(&self) -> ListOrder {
        match self {
            SyncMode::UpdatesOnly => ListOrder::Unordered,
            SyncMode::Full => ListOrder::IdAscending,
        }
    }
}

#[derive(Clone)]
pub struct SyncClient<R, C> {
    repo: R,
    cache: C,
    mode: SyncMode,
}

impl<R: ItemRepository, C: ItemCache> SyncClient<R, C> {
    pub fn new(repo: R, cache: C, mode: SyncMode) -> Self {
        Self { repo, cache, mode }
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn filter(&self, schema: &str, table: &str) -> ChangeFilter {
        ChangeFilter::new(schema, table, self.mode.kinds())
    }

    /// Replace the cache with a fresh full listing. On error the cache is untouched.
    pub async fn refresh(&self) -> BingoResult<usize> {
        let items = self.repo.list(self.mode.order()).await?;
        let count = items.len();
        self.cache.replace_all(items);
        log::debug!("Loaded {} items", count);
        Ok(count)
    }

    /// Merge one change into the cache. Returns whether anything changed.
    pub fn apply(&self, event: &ChangeEvent) -> bool {
        match (&event.change, self.mode) {
            (RowChange::Update(item), _) => self.cache.replace(item.clone()),
            (RowChange::Insert(item), SyncMode::Full) => {
                self.cache.upsert(item.clone());
                true
            }
            (RowChange::Delete(id), SyncMode::Full) => self.cache.remove(id),
            (_, SyncMode::UpdatesOnly) => false,
        }
    }

    /// Apply events until the subscription ends; returns how many arrived
    pub async fn follow(&self, mut subscription: Subscription) -> usize {
        let mut received = 0;
        while let Some(event) = subscription.next().await {
            log::debug!("Change {} on {}", event.kind().as_str(), event.change.id());
            self.apply(&event);
            received += 1;
        }
        log::info!("Change subscription ended after {} events", received);
        received
    }

    /// Follow one subscription after another from `connect`, which gets the
    /// attempt number (0 for the first). Between subscriptions `sleep` waits
    /// out `backoff`; a subscription that delivered anything resets it.
    /// Returns only when the backoff runs out of attempts.
    pub async fn follow_reconnecting<S, Z, Fut>(&self, mut connect: S, mut backoff: Backoff, mut sleep: Z)
    where
        S: FnMut(u32) -> BingoResult<Subscription>,
        Z: FnMut(Duration) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut attempt = 0;
        loop {
            match connect(attempt) {
                Ok(subscription) => {
                    if self.follow(subscription).await > 0 {
                        backoff.reset();
                    }
                }
                Err(e) => log::error!("Realtime subscription failed: {}", e),
            }
            attempt += 1;
            let Some(delay) = backoff.next_delay() else {
                log::warn!("Giving up on realtime after {} attempts", attempt);
                return;
            };
            log::info!("Resubscribing in {} ms", delay.as_millis());
            sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SharedItems;
    use crate::domain::Item;
    use crate::feed::{ChangeHub, EventSource};
    use crate::repository::MemoryRepository;

    fn rows() -> Vec<Item> {
        vec![Item::new(2u64, "B"), Item::new(1u64, "A")]
    }

    #[tokio::test]
    async fn test_refresh_replaces_cache() {
        let repo = MemoryRepository::new(rows());
        let cache = SharedItems::new(vec![Item::new("stale", "old")]);
        let sync = SyncClient::new(repo, cache.clone(), SyncMode::UpdatesOnly);

        assert_eq!(sync.refresh().await.unwrap(), 2);
        assert_eq!(cache.snapshot(), rows());
    }

    #[tokio::test]
    async fn test_admin_refresh_orders_by_id() {
        let repo = MemoryRepository::new(rows());
        let cache = SharedItems::default();
        let sync = SyncClient::new(repo, cache.clone(), SyncMode::Full);
        sync.refresh().await.unwrap();
        let ids: Vec<String> = cache.snapshot().iter().map(|i| i.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_cache() {
        let repo = MemoryRepository::new(rows());
        repo.fail_reads(true);
        let cache = SharedItems::new(vec![Item::new("keep", "me")]);
        let sync = SyncClient::new(repo, cache.clone(), SyncMode::UpdatesOnly);
        assert!(sync.refresh().await.is_err());
        assert_eq!(cache.snapshot().len(), 1);
    }

    #[test]
    fn test_update_overwrites_local_copy() {
        let cache = SharedItems::new(rows());
        // unsynced local change on another field
        cache.modify(&mut |rows| rows[0].text = "local draft".into());
        let sync = SyncClient::new(MemoryRepository::default(), cache.clone(), SyncMode::UpdatesOnly);

        let remote = Item::new(2u64, "B").with_checked(true);
        assert!(sync.apply(&ChangeEvent::new("public", "bingo_items", RowChange::Update(remote.clone()))));
        assert_eq!(cache.get(&"2".into()), Some(remote));
    }

    #[test]
    fn test_board_ignores_inserts_and_deletes() {
        let cache = SharedItems::new(rows());
        let sync = SyncClient::new(MemoryRepository::default(), cache.clone(), SyncMode::UpdatesOnly);
        assert!(!sync.apply(&ChangeEvent::new("public", "t", RowChange::Insert(Item::new(3u64, "C")))));
        assert!(!sync.apply(&ChangeEvent::new("public", "t", RowChange::Delete("1".into()))));
        assert_eq!(cache.snapshot(), rows());
    }

    #[test]
    fn test_admin_applies_inserts_and_deletes() {
        let cache = SharedItems::new(rows());
        let sync = SyncClient::new(MemoryRepository::default(), cache.clone(), SyncMode::Full);
        sync.apply(&ChangeEvent::new("public", "t", RowChange::Insert(Item::new(3u64, "C"))));
        sync.apply(&ChangeEvent::new("public", "t", RowChange::Delete("2".into())));
        let ids: Vec<String> = cache.snapshot().iter().map(|i| i.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_follow_consumes_until_feed_closes() {
        let hub = ChangeHub::new();
        let cache = SharedItems::new(rows());
        let sync = SyncClient::new(MemoryRepository::default(), cache.clone(), SyncMode::UpdatesOnly);
        let sub = hub.subscribe(sync.filter("public", "bingo_items")).unwrap();

        hub.publish(ChangeEvent::new(
            "public",
            "bingo_items",
            RowChange::Update(Item::new(1u64, "A").with_checked(true)),
        ));
        hub.publish(ChangeEvent::new("public", "bingo_items", RowChange::Delete("2".into())));
        hub.close();

        sync.follow(sub).await;
        let rows = cache.snapshot();
        assert_eq!(rows.len(), 2);
        assert!(rows[1].checked);
    }

    #[tokio::test]
    async fn test_resubscribe_after_feed_closes_restores_delivery() {
        use crate::error::BingoError;
        use std::cell::RefCell;

        let cache = SharedItems::new(rows());
        let sync = SyncClient::new(MemoryRepository::default(), cache.clone(), SyncMode::UpdatesOnly);
        let filter = sync.filter("public", "bingo_items");
        let delays = RefCell::new(Vec::new());
        let mut connects = 0;

        let connect = |attempt: u32| {
            connects += 1;
            let hub = ChangeHub::new();
            let sub = hub.subscribe(filter.clone());
            match attempt {
                // socket dropped before anything arrived
                0 => hub.close(),
                1 => {
                    hub.publish(ChangeEvent::new(
                        "public",
                        "bingo_items",
                        RowChange::Update(Item::new(1u64, "A").with_checked(true)),
                    ));
                    hub.close();
                }
                _ => return Err(BingoError::Subscription("offline".into())),
            }
            sub
        };
        let sleep = |delay: Duration| {
            delays.borrow_mut().push(delay.as_millis());
            futures::future::ready(())
        };

        let backoff = Backoff::new(Duration::from_millis(100), Duration::from_secs(1)).with_max_attempts(2);
        sync.follow_reconnecting(connect, backoff, sleep).await;

        assert!(cache.get(&"1".into()).unwrap().checked);
        assert_eq!(connects, 4);
        // grows after the empty feed, resets after the one that delivered
        assert_eq!(*delays.borrow(), vec![100, 100, 200]);
    }
}
