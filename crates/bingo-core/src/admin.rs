//! Admin Controller
//!
//! Insert, edit and toggle against the store without touching the local
//! list; the page waits for the echoed change event instead.

use crate::domain::{ItemId, ItemPatch, NewItem};
use crate::error::BingoResult;
use crate::repository::ItemRepository;

/// Inline text editing on the admin list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Idle,
    Editing { id: ItemId, draft: String },
}

impl EditSession {
    pub fn start(id: ItemId, current_text: impl Into<String>) -> Self {
        EditSession::Editing {
            id,
            draft: current_text.into(),
        }
    }

    pub fn is_editing(&self, id: &ItemId) -> bool {
        matches!(self, EditSession::Editing { id: editing, .. } if editing == id)
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            EditSession::Editing { draft, .. } => Some(draft),
            EditSession::Idle => None,
        }
    }

    /// Replace the draft text; ignored while idle
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let EditSession::Editing { draft, .. } = self {
            *draft = text.into();
        }
    }

    pub fn cancel(&mut self) {
        *self = EditSession::Idle;
    }

    /// Leave edit mode, returning the id and trimmed text worth saving.
    ///
    /// A blank draft yields `None` but still ends the session.
    pub fn finish(&mut self) -> Option<(ItemId, String)> {
        match std::mem::take(self) {
            EditSession::Editing { id, draft } => {
                let text = draft.trim();
                (!text.is_empty()).then(|| (id, text.to_string()))
            }
            EditSession::Idle => None,
        }
    }
}

/// Trimmed text, or `None` if nothing is left
pub fn normalize_text(raw: &str) -> Option<String> {
    let text = raw.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[derive(Clone)]
pub struct AdminController<R> {
    repo: R,
}

impl<R: ItemRepository> AdminController<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Insert a new unchecked item. Returns `Ok(false)` without calling the
    /// store when the trimmed text is empty.
    pub async fn add_item(&self, raw: &str) -> BingoResult<bool> {
        let Some(text) = normalize_text(raw) else {
            return Ok(false);
        };
        self.repo.insert(&NewItem::new(text)).await?;
        Ok(true)
    }

    /// End the edit session and persist the draft if it is not blank
    pub async fn save_edit(&self, session: &mut EditSession) -> BingoResult<bool> {
        let Some((id, text)) = session.finish() else {
            return Ok(false);
        };
        self.repo.update(&id, &ItemPatch::text(text)).await?;
        Ok(true)
    }

    /// Persist `!was_checked` with no local change
    pub async fn toggle(&self, id: &ItemId, was_checked: bool) -> BingoResult<()> {
        self.repo.update(id, &ItemPatch::checked(!was_checked)).await
    }
}
