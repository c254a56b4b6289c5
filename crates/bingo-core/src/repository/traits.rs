//! Repository Layer - Core Traits
//!
//! Abstract access to the remote item table.
//! Implementations: PostgREST over HTTP, in-memory for tests.

use std::rc::Rc;

use async_trait::async_trait;

use crate::domain::{Item, ItemId, ItemPatch, NewItem};
use crate::error::BingoResult;

/// Row order for a full listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    /// Whatever the store returns
    #[default]
    Unordered,
    IdAscending,
}

/// CRUD surface the pages need. All calls are fire-and-forget from the
/// caller's perspective: no retries, no timeouts.
///
/// Futures are not `Send`; everything runs on the browser's event loop.
#[async_trait(?Send)]
pub trait ItemRepository {
    /// Select every row
    async fn list(&self, order: ListOrder) -> BingoResult<Vec<Item>>;

    /// Insert a row; the store assigns the id
    async fn insert(&self, item: &NewItem) -> BingoResult<()>;

    /// Update the present fields of one row
    async fn update(&self, id: &ItemId, patch: &ItemPatch) -> BingoResult<()>;
}

#[async_trait(?Send)]
impl<R: ItemRepository + ?Sized> ItemRepository for Rc<R> {
    async fn list(&self, order: ListOrder) -> BingoResult<Vec<Item>> {
        (**self).list(order).await
    }

    async fn insert(&self, item: &NewItem) -> BingoResult<()> {
        (**self).insert(item).await
    }

    async fn update(&self, id: &ItemId, patch: &ItemPatch) -> BingoResult<()> {
        (**self).update(id, patch).await
    }
}
