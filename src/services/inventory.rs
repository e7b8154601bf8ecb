use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use rand::seq::SliceRandom;
use tokio::sync::Mutex;

use crate::{
    error::{AppError, AppResult},
    models::{Inventory, PersistedState, Sticker, StickerId},
    storage::StateStorage,
};

/// Mints sticker ids from the wall clock, bumped past the last issued id
/// so two stickers created in the same millisecond never collide.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new(floor: StickerId) -> Self {
        Self {
            last: AtomicI64::new(floor),
        }
    }

    pub fn next_id(&self) -> AppResult<StickerId> {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let bumped = last.checked_add(1).ok_or(AppError::StickerIdsExhausted)?;
            let next = now.max(bumped);
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return Ok(next),
                Err(actual) => last = actual,
            }
        }
    }
}

/// Authoritative copy of the sticker album, kept in step with its
/// persisted form. Every mutation is written before it becomes visible.
pub struct InventoryStore {
    storage: Arc<dyn StateStorage>,
    key: String,
    inventory: Mutex<Inventory>,
    ids: IdGenerator,
}

impl InventoryStore {
    /// Loads the persisted inventory and returns a store backed by `storage`.
    pub async fn open(storage: Arc<dyn StateStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let inventory = load(storage.as_ref(), &key).await;
        let ids = IdGenerator::new(inventory.max_id().unwrap_or(0));

        tracing::info!(
            "Loaded {} stickers from {} storage",
            inventory.len(),
            storage.name()
        );

        Self {
            storage,
            key,
            inventory: Mutex::new(inventory),
            ids,
        }
    }

    pub fn next_id(&self) -> AppResult<StickerId> {
        self.ids.next_id()
    }

    pub async fn list(&self) -> Vec<Sticker> {
        self.inventory.lock().await.stickers.clone()
    }

    pub async fn len(&self) -> usize {
        self.inventory.lock().await.len()
    }

    pub async fn get(&self, id: StickerId) -> AppResult<Sticker> {
        self.inventory
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or(AppError::StickerNotFound)
    }

    /// True if any held sticker shares the id or the image reference.
    pub async fn exists(&self, id: Option<StickerId>, src: &str) -> bool {
        self.inventory.lock().await.exists(id, src)
    }

    /// Appends without a uniqueness check.
    pub async fn add(&self, sticker: Sticker) -> AppResult<Sticker> {
        let mut guard = self.inventory.lock().await;
        let mut next = guard.clone();
        next.push(sticker.clone());
        self.commit(&mut guard, next).await?;

        tracing::info!("Added sticker {} ({})", sticker.id, sticker.src);
        Ok(sticker)
    }

    /// Appends only when neither the id nor the src is already held.
    /// Returns `None` for a duplicate.
    pub async fn add_if_absent(
        &self,
        match_id: Option<StickerId>,
        sticker: Sticker,
    ) -> AppResult<Option<Sticker>> {
        let mut guard = self.inventory.lock().await;
        if guard.exists(match_id, &sticker.src) {
            return Ok(None);
        }

        let mut next = guard.clone();
        next.push(sticker.clone());
        self.commit(&mut guard, next).await?;

        tracing::info!("Added sticker {} ({})", sticker.id, sticker.src);
        Ok(Some(sticker))
    }

    pub async fn remove_at(&self, index: usize) -> AppResult<Sticker> {
        let mut guard = self.inventory.lock().await;
        let mut next = guard.clone();
        let removed = next
            .remove_at(index)
            .ok_or(AppError::StickerIndexOutOfRange(index))?;
        self.commit(&mut guard, next).await?;

        tracing::info!("Removed sticker {} at position {}", removed.id, index);
        Ok(removed)
    }

    pub async fn remove(&self, id: StickerId) -> AppResult<Sticker> {
        let mut guard = self.inventory.lock().await;
        let index = guard.position(id).ok_or(AppError::StickerNotFound)?;
        let mut next = guard.clone();
        let removed = next.stickers.remove(index);
        self.commit(&mut guard, next).await?;

        tracing::info!("Removed sticker {}", id);
        Ok(removed)
    }

    /// Removes `give` and appends `take` as one persisted step.
    pub async fn swap(&self, give: StickerId, take: Sticker) -> AppResult<Sticker> {
        let mut guard = self.inventory.lock().await;
        let index = guard.position(give).ok_or(AppError::StickerNotFound)?;
        let mut next = guard.clone();
        let given = next.stickers.remove(index);
        next.push(take.clone());
        self.commit(&mut guard, next).await?;

        tracing::info!("Traded sticker {} for {}", given.id, take.id);
        Ok(given)
    }

    /// Draws a fresh sticker from the bundled asset pool. Does not mutate.
    pub fn draw_random(&self, pool: &[String]) -> AppResult<Sticker> {
        let src = pool
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| AppError::Config("asset pool is empty".to_string()))?;
        Ok(Sticker::new(self.next_id()?, src.clone(), None))
    }

    async fn commit(&self, current: &mut Inventory, next: Inventory) -> AppResult<()> {
        save(self.storage.as_ref(), &self.key, &next).await?;
        *current = next;
        Ok(())
    }
}

/// Reads the inventory stored under `key`. Anything unreadable loads as an
/// empty inventory.
pub async fn load(storage: &dyn StateStorage, key: &str) -> Inventory {
    let blob = match storage.read(key).await {
        Ok(Some(blob)) => blob,
        Ok(None) => return Inventory::default(),
        Err(e) => {
            tracing::warn!("Could not read saved stickers, starting empty: {}", e);
            return Inventory::default();
        }
    };

    let document: serde_json::Value = match serde_json::from_str(&blob) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!("Saved stickers are not valid JSON, starting empty: {}", e);
            return Inventory::default();
        }
    };

    if document.get("inventory").is_none() {
        tracing::debug!("Saved state has no inventory, starting empty");
        return Inventory::default();
    }

    match serde_json::from_value::<PersistedState>(document) {
        Ok(state) => state.into(),
        Err(e) => {
            tracing::warn!("Saved inventory is malformed, starting empty: {}", e);
            Inventory::default()
        }
    }
}

/// Serializes `inventory` and overwrites the blob under `key`.
pub async fn save(storage: &dyn StateStorage, key: &str, inventory: &Inventory) -> AppResult<()> {
    let blob = serde_json::to_string(&PersistedState::from(inventory))?;
    storage.write(key, &blob).await
}
