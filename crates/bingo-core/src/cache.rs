//! Local Item Cache
//!
//! The in-memory copy of the item table a page renders from. The UI backs
//! it with a reactive store; `SharedItems` backs it in tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::{merge_replace, remove_by_id, Item, ItemId};

pub trait ItemCache {
    /// Current rows, in display order
    fn snapshot(&self) -> Vec<Item>;

    /// Run `f` against the row list
    fn modify(&self, f: &mut dyn FnMut(&mut Vec<Item>));

    fn get(&self, id: &ItemId) -> Option<Item> {
        self.snapshot().into_iter().find(|item| &item.id == id)
    }

    fn replace_all(&self, items: Vec<Item>) {
        let mut items = Some(items);
        self.modify(&mut |rows| {
            if let Some(items) = items.take() {
                *rows = items;
            }
        });
    }

    /// Overwrite the row with the same id. Unknown ids are ignored.
    fn replace(&self, item: Item) -> bool {
        let mut item = Some(item);
        let mut replaced = false;
        self.modify(&mut |rows| {
            if let Some(item) = item.take() {
                replaced = merge_replace(rows, item);
            }
        });
        replaced
    }

    /// Append, or overwrite if the id is already present
    fn upsert(&self, item: Item) {
        let mut item = Some(item);
        self.modify(&mut |rows| {
            if let Some(item) = item.take() {
                if let Err(item) = replace_or_return(rows, item) {
                    rows.push(item);
                }
            }
        });
    }

    fn remove(&self, id: &ItemId) -> bool {
        let mut removed = false;
        self.modify(&mut |rows| removed = remove_by_id(rows, id));
        removed
    }

    /// Set the checked flag on one row; returns `false` if it is not cached
    fn set_checked(&self, id: &ItemId, checked: bool) -> bool {
        let mut found = false;
        self.modify(&mut |rows| {
            if let Some(row) = rows.iter_mut().find(|row| &row.id == id) {
                row.checked = checked;
                found = true;
            }
        });
        found
    }
}

fn replace_or_return(rows: &mut [Item], item: Item) -> Result<(), Item> {
    match rows.iter_mut().find(|row| row.id == item.id) {
        Some(row) => {
            *row = item;
            Ok(())
        }
        None => Err(item),
    }
}

/// Plain shared row list
#[derive(Debug, Clone, Default)]
pub struct SharedItems {
    rows: Rc<RefCell<Vec<Item>>>,
}

impl SharedItems {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            rows: Rc::new(RefCell::new(items)),
        }
    }
}

impl ItemCache for SharedItems {
    fn snapshot(&self) -> Vec<Item> {
        self.rows.borrow().clone()
    }

    fn modify(&self, f: &mut dyn FnMut(&mut Vec<Item>)) {
        f(&mut self.rows.borrow_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_appends_new_and_replaces_known() {
        let cache = SharedItems::new(vec![Item::new("1", "A")]);
        cache.upsert(Item::new("2", "B"));
        cache.upsert(Item::new("1", "A2"));
        let rows = cache.snapshot();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text, "A2");
        assert_eq!(rows[1].text, "B");
    }

    #[test]
    fn test_set_checked_unknown_id() {
        let cache = SharedItems::new(vec![Item::new("1", "A")]);
        assert!(cache.set_checked(&"1".into(), true));
        assert!(!cache.set_checked(&"2".into(), true));
        assert!(cache.get(&"1".into()).unwrap().checked);
    }

    #[test]
    fn test_remove() {
        let cache = SharedItems::new(vec![Item::new("1", "A"), Item::new("2", "B")]);
        assert!(cache.remove(&"1".into()));
        assert!(!cache.remove(&"1".into()));
        assert_eq!(cache.snapshot().len(), 1);
    }
}
