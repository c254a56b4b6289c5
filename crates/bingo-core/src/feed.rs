//! Change Feed
//!
//! Row-level change notifications from the store, modeled as an event
//! source handing out subscriptions. A subscription is a lazy stream that
//! ends only when its source goes away and cannot be restarted. Dropping it
//! unsubscribes.

use std::any::Any;
use std::cell::RefCell;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::channel::mpsc;
use futures::stream::{FusedStream, Stream};
use serde::{Deserialize, Serialize};

use crate::domain::{Item, ItemId};
use crate::error::BingoResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    pub const ALL: [ChangeKind; 3] = [ChangeKind::Insert, ChangeKind::Update, ChangeKind::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Insert => "INSERT",
            ChangeKind::Update => "UPDATE",
            ChangeKind::Delete => "DELETE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INSERT" => Some(ChangeKind::Insert),
            "UPDATE" => Some(ChangeKind::Update),
            "DELETE" => Some(ChangeKind::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowChange {
    Insert(Item),
    Update(Item),
    /// Deletes only carry the primary key
    Delete(ItemId),
}

impl RowChange {
    pub fn kind(&self) -> ChangeKind {
        match self {
            RowChange::Insert(_) => ChangeKind::Insert,
            RowChange::Update(_) => ChangeKind::Update,
            RowChange::Delete(_) => ChangeKind::Delete,
        }
    }

    pub fn id(&self) -> &ItemId {
        match self {
            RowChange::Insert(item) | RowChange::Update(item) => &item.id,
            RowChange::Delete(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub schema: String,
    pub table: String,
    pub change: RowChange,
}

impl ChangeEvent {
    pub fn new(schema: impl Into<String>, table: impl Into<String>, change: RowChange) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            change,
        }
    }

    pub fn kind(&self) -> ChangeKind {
        self.change.kind()
    }
}

/// Which events a subscriber wants: one `schema.table`, some event kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeFilter {
    pub schema: String,
    pub table: String,
    pub kinds: Vec<ChangeKind>,
}

impl ChangeFilter {
    pub fn new(schema: impl Into<String>, table: impl Into<String>, kinds: &[ChangeKind]) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            kinds: kinds.to_vec(),
        }
    }

    pub fn matches(&self, event: &ChangeEvent) -> bool {
        event.schema == self.schema && event.table == self.table && self.kinds.contains(&event.kind())
    }
}

/// Anything that can hand out change subscriptions
pub trait EventSource {
    fn subscribe(&self, filter: ChangeFilter) -> BingoResult<Subscription>;
}

/// A live feed of change events for one filter
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
    on_drop: Option<Box<dyn FnOnce()>>,
    guards: Vec<Box<dyn Any>>,
}

impl Subscription {
    pub fn new(rx: mpsc::UnboundedReceiver<ChangeEvent>, on_drop: impl FnOnce() + 'static) -> Self {
        Self {
            rx,
            on_drop: Some(Box::new(on_drop)),
            guards: Vec::new(),
        }
    }

    /// Keep `guard` alive for as long as this subscription lives
    pub fn retain<G: 'static>(mut self, guard: G) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    /// Take an event that has already arrived, without waiting
    pub fn try_next(&mut self) -> Option<ChangeEvent> {
        self.rx.try_next().ok().flatten()
    }

    /// Stop receiving; same as dropping
    pub fn unsubscribe(self) {}
}

impl Stream for Subscription {
    type Item = ChangeEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<ChangeEvent>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}

impl FusedStream for Subscription {
    fn is_terminated(&self) -> bool {
        self.rx.is_terminated()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.rx.close();
        if let Some(on_drop) = self.on_drop.take() {
            on_drop();
        }
    }
}

struct Subscriber {
    id: u64,
    filter: ChangeFilter,
    tx: mpsc::UnboundedSender<ChangeEvent>,
}

#[derive(Default)]
struct HubState {
    next_id: u64,
    subscribers: Vec<Subscriber>,
    closed: bool,
}

/// Fans published events out to matching subscriptions.
///
/// The websocket transport publishes into one of these; tests publish by hand.
#[derive(Clone, Default)]
pub struct ChangeHub {
    state: Rc<RefCell<HubState>>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver to every matching subscriber; returns how many got it
    pub fn publish(&self, event: ChangeEvent) -> usize {
        let mut state = self.state.borrow_mut();
        state.subscribers.retain(|s| !s.tx.is_closed());
        let mut delivered = 0;
        for subscriber in state.subscribers.iter().filter(|s| s.filter.matches(&event)) {
            if subscriber.tx.unbounded_send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().subscribers.len()
    }

    /// End every stream. Later subscriptions end immediately.
    pub fn close(&self) {
        let mut state = self.state.borrow_mut();
        state.closed = true;
        state.subscribers.clear();
    }
}

impl EventSource for ChangeHub {
    fn subscribe(&self, filter: ChangeFilter) -> BingoResult<Subscription> {
        let (tx, rx) = mpsc::unbounded();
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        if !state.closed {
            state.subscribers.push(Subscriber { id, filter, tx });
        }
        drop(state);

        let hub = Rc::downgrade(&self.state);
        Ok(Subscription::new(rx, move || {
            if let Some(state) = hub.upgrade() {
                // publish() may hold the borrow if a subscriber is dropped mid-delivery
                if let Ok(mut state) = state.try_borrow_mut() {
                    state.subscribers.retain(|s| s.id != id);
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn update(table: &str, id: &str) -> ChangeEvent {
        ChangeEvent::new("public", table, RowChange::Update(Item::new(id, "x")))
    }

    #[test]
    fn test_filter_matches_table_and_kind() {
        let filter = ChangeFilter::new("public", "bingo_items", &[ChangeKind::Update]);
        assert!(filter.matches(&update("bingo_items", "1")));
        assert!(!filter.matches(&update("other", "1")));
        let elsewhere = ChangeEvent::new("audit", "bingo_items", RowChange::Update(Item::new("1", "x")));
        assert!(!filter.matches(&elsewhere));
        let delete = ChangeEvent::new("public", "bingo_items", RowChange::Delete("1".into()));
        assert!(!filter.matches(&delete));
    }

    #[test]
    fn test_hub_delivers_only_matching_events() {
        let hub = ChangeHub::new();
        let mut updates = hub
            .subscribe(ChangeFilter::new("public", "bingo_items", &[ChangeKind::Update]))
            .unwrap();
        let mut everything = hub
            .subscribe(ChangeFilter::new("public", "bingo_items", &ChangeKind::ALL))
            .unwrap();

        hub.publish(ChangeEvent::new("public", "bingo_items", RowChange::Insert(Item::new("9", "new"))));
        assert_eq!(hub.publish(update("bingo_items", "1")), 2);

        assert_eq!(updates.try_next().map(|e| e.kind()), Some(ChangeKind::Update));
        assert!(updates.try_next().is_none());
        assert_eq!(everything.try_next().map(|e| e.kind()), Some(ChangeKind::Insert));
        assert_eq!(everything.try_next().map(|e| e.kind()), Some(ChangeKind::Update));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let hub = ChangeHub::new();
        let sub = hub
            .subscribe(ChangeFilter::new("public", "bingo_items", &ChangeKind::ALL))
            .unwrap();
        assert_eq!(hub.subscriber_count(), 1);
        sub.unsubscribe();
        assert_eq!(hub.subscriber_count(), 0);
        assert_eq!(hub.publish(update("bingo_items", "1")), 0);
    }

    #[test]
    fn test_guard_lives_as_long_as_subscription() {
        let hub = ChangeHub::new();
        let guard = Rc::new(());
        let sub = hub
            .subscribe(ChangeFilter::new("public", "t", &ChangeKind::ALL))
            .unwrap()
            .retain(guard.clone());
        assert_eq!(Rc::strong_count(&guard), 2);
        drop(sub);
        assert_eq!(Rc::strong_count(&guard), 1);
    }

    #[tokio::test]
    async fn test_stream_ends_when_hub_closes() {
        let hub = ChangeHub::new();
        let mut sub = hub
            .subscribe(ChangeFilter::new("public", "bingo_items", &ChangeKind::ALL))
            .unwrap();
        hub.publish(update("bingo_items", "1"));
        hub.close();

        assert!(sub.next().await.is_some());
        assert!(sub.next().await.is_none());
        assert!(sub.is_terminated());
        // not restartable
        assert!(sub.next().await.is_none());

        let mut late = hub
            .subscribe(ChangeFilter::new("public", "bingo_items", &ChangeKind::ALL))
            .unwrap();
        assert!(late.next().await.is_none());
    }
}
