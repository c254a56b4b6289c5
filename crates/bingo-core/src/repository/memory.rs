//! In-Memory Repository
//!
//! Stand-in for the hosted table. Can be told to fail, and can echo every
//! successful write into a `ChangeHub` the way the realtime feed would.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;

use super::traits::{ItemRepository, ListOrder};
use crate::domain::{Item, ItemId, ItemPatch, NewItem};
use crate::error::{BingoError, BingoResult};
use crate::feed::{ChangeEvent, ChangeHub, RowChange};

#[derive(Default)]
struct MemoryState {
    rows: Vec<Item>,
    next_id: u64,
    fail_reads: bool,
    fail_writes: bool,
    echo: Option<(String, String, ChangeHub)>,
}

#[derive(Clone, Default)]
pub struct MemoryRepository {
    state: Rc<RefCell<MemoryState>>,
    calls: Rc<Cell<usize>>,
}

impl MemoryRepository {
    pub fn new(rows: Vec<Item>) -> Self {
        let next_id = rows
            .iter()
            .filter_map(|row| row.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            state: Rc::new(RefCell::new(MemoryState {
                rows,
                next_id,
                ..Default::default()
            })),
            calls: Rc::new(Cell::new(0)),
        }
    }

    /// Publish every successful write as a change on `schema.table`
    pub fn echo_into(&self, schema: impl Into<String>, table: impl Into<String>, hub: ChangeHub) {
        self.state.borrow_mut().echo = Some((schema.into(), table.into(), hub));
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.borrow_mut().fail_reads = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }

    /// Rows as the store holds them
    pub fn rows(&self) -> Vec<Item> {
        self.state.borrow().rows.clone()
    }

    /// Number of calls made, successful or not
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Remove a row directly, as another client would
    pub fn delete(&self, id: &ItemId) {
        let echo = {
            let mut state = self.state.borrow_mut();
            state.rows.retain(|row| &row.id != id);
            state.echo.clone()
        };
        if let Some((schema, table, hub)) = echo {
            hub.publish(ChangeEvent::new(schema, table, RowChange::Delete(id.clone())));
        }
    }

    fn check_write(&self) -> BingoResult<()> {
        self.calls.set(self.calls.get() + 1);
        if self.state.borrow().fail_writes {
            return Err(BingoError::Remote {
                status: 503,
                message: "write rejected".into(),
            });
        }
        Ok(())
    }

    fn publish(&self, change: RowChange) {
        let echo = self.state.borrow().echo.clone();
        if let Some((schema, table, hub)) = echo {
            hub.publish(ChangeEvent::new(schema, table, change));
        }
    }
}

#[async_trait(?Send)]
impl ItemRepository for MemoryRepository {
    async fn list(&self, order: ListOrder) -> BingoResult<Vec<Item>> {
        self.calls.set(self.calls.get() + 1);
        let state = self.state.borrow();
        if state.fail_reads {
            return Err(BingoError::Transport("store unreachable".into()));
        }
        let mut rows = state.rows.clone();
        if order == ListOrder::IdAscending {
            rows.sort_by(|a, b| match (a.id.as_str().parse::<u64>(), b.id.as_str().parse::<u64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => a.id.cmp(&b.id),
            });
        }
        Ok(rows)
    }

    async fn insert(&self, item: &NewItem) -> BingoResult<()> {
        self.check_write()?;
        let created = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            let created = Item::new(id, item.text.clone()).with_checked(item.checked);
            state.rows.push(created.clone());
            created
        };
        self.publish(RowChange::Insert(created));
        Ok(())
    }

    async fn update(&self, id: &ItemId, patch: &ItemPatch) -> BingoResult<()> {
        self.check_write()?;
        let updated = {
            let mut state = self.state.borrow_mut();
            let row = state.rows.iter_mut().find(|row| &row.id == id);
            row.map(|row| {
                patch.apply_to(row);
                row.clone()
            })
        };
        // PostgREST reports success for a filter that matches nothing
        if let Some(updated) = updated {
            self.publish(RowChange::Update(updated));
        }
        Ok(())
    }
}
