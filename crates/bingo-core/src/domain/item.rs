//! Item Entity
//!
//! One bingo cell: its text and whether it has been ticked off.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::entity::Entity;

/// Opaque row identifier.
///
/// The store may hand out integer or uuid keys; both arrive here as text so
/// card selections persisted on older devices keep matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u64> for ItemId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl<'de> Visitor<'de> for IdVisitor {
            type Value = ItemId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string or integer item id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ItemId, E> {
                Ok(ItemId::new(v))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<ItemId, E> {
                Ok(ItemId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ItemId, E> {
                Ok(ItemId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<ItemId, E> {
                Ok(ItemId(v.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// A bingo cell as stored in the `bingo_items` table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    #[serde(default)]
    pub checked: bool,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            checked: false,
        }
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &ItemId {
        &self.id
    }
}

/// Insert payload; the store assigns the id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewItem {
    pub text: String,
    pub checked: bool,
}

impl NewItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            checked: false,
        }
    }
}

/// Partial update; only the present fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

impl ItemPatch {
    pub fn checked(checked: bool) -> Self {
        Self {
            checked: Some(checked),
            ..Default::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Apply the present fields to a local copy
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(text) = &self.text {
            item.text = text.clone();
        }
        if let Some(checked) = self.checked {
            item.checked = checked;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::merge_replace;

    #[test]
    fn test_id_accepts_number_or_string() {
        let from_num: Item = serde_json::from_str(r#"{"id":7,"text":"A","checked":true}"#).unwrap();
        let from_str: Item = serde_json::from_str(r#"{"id":"7","text":"A","checked":true}"#).unwrap();
        assert_eq!(from_num, from_str);
        assert_eq!(from_num.id.as_str(), "7");
    }

    #[test]
    fn test_missing_checked_defaults_to_false() {
        let item: Item = serde_json::from_str(r#"{"id":"a","text":"A"}"#).unwrap();
        assert!(!item.checked);
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let json = serde_json::to_string(&ItemPatch::checked(true)).unwrap();
        assert_eq!(json, r#"{"checked":true}"#);
        let json = serde_json::to_string(&ItemPatch::text("Hoi")).unwrap();
        assert_eq!(json, r#"{"text":"Hoi"}"#);
    }

    #[test]
    fn test_new_item_payload() {
        let json = serde_json::to_string(&NewItem::new("Zegt 'gezellig'")).unwrap();
        assert_eq!(json, r#"{"text":"Zegt 'gezellig'","checked":false}"#);
    }

    #[test]
    fn test_merge_replace_overwrites_whole_row() {
        let mut rows = vec![Item::new("1", "A"), Item::new("2", "B")];
        let updated = Item::new("2", "B2").with_checked(true);
        assert!(merge_replace(&mut rows, updated.clone()));
        assert_eq!(rows[1], updated);
        assert!(!merge_replace(&mut rows, Item::new("3", "C")));
        assert_eq!(rows.len(), 2);
    }
}
