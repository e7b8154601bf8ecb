use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type StickerId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sticker {
    pub id: StickerId,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl Sticker {
    pub fn new(id: StickerId, src: impl Into<String>, prompt: Option<String>) -> Self {
        Self {
            id,
            src: src.into(),
            date: Some(Utc::now()),
            prompt,
        }
    }

    /// Duplicate policy: a match on either the id or the image reference.
    pub fn matches(&self, id: Option<StickerId>, src: &str) -> bool {
        id == Some(self.id) || self.src == src
    }
}

/// Ordered sticker collection. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub stickers: Vec<Sticker>,
}

impl Inventory {
    pub fn new(stickers: Vec<Sticker>) -> Self {
        Self { stickers }
    }

    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }

    pub fn push(&mut self, sticker: Sticker) {
        self.stickers.push(sticker);
    }

    pub fn exists(&self, id: Option<StickerId>, src: &str) -> bool {
        self.stickers.iter().any(|s| s.matches(id, src))
    }

    pub fn position(&self, id: StickerId) -> Option<usize> {
        self.stickers.iter().position(|s| s.id == id)
    }

    pub fn get(&self, id: StickerId) -> Option<&Sticker> {
        self.stickers.iter().find(|s| s.id == id)
    }

    /// Removes the sticker at `index`, or returns `None` when out of bounds.
    pub fn remove_at(&mut self, index: usize) -> Option<Sticker> {
        if index < self.stickers.len() {
            Some(self.stickers.remove(index))
        } else {
            None
        }
    }

    pub fn max_id(&self) -> Option<StickerId> {
        self.stickers.iter().map(|s| s.id).max()
    }
}

/// The persisted document: `{ "inventory": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedState {
    pub inventory: Vec<Sticker>,
}

impl From<&Inventory> for PersistedState {
    fn from(inventory: &Inventory) -> Self {
        Self {
            inventory: inventory.stickers.clone(),
        }
    }
}

impl From<PersistedState> for Inventory {
    fn from(state: PersistedState) -> Self {
        Inventory::new(state.inventory)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSticker {
    pub src: String,
    pub prompt: Option<String>,
}
