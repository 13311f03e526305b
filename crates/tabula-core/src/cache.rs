//! Process-local snapshot of the settings table
//!
//! The whole key -> raw value mapping is loaded in one pass on the first read
//! after an invalidation. Every write path calls [`SettingsCache::invalidate`]
//! before returning, so a read that follows a write in the same process
//! never sees the old value. Other processes writing to the same store are
//! not observed until the next local write or flush.

use parking_lot::RwLock;
use std::sync::Arc;

use tabula_types::store_adapter::{StoreAdapter, ValueMap};

use crate::prelude::*;

#[derive(Debug, Default)]
struct CacheState {
	snapshot: Option<Arc<ValueMap>>,
	/// Bumped on every invalidation
	generation: u64,
}

#[derive(Debug, Default)]
pub struct SettingsCache {
	state: RwLock<CacheState>,
}

impl SettingsCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_loaded(&self) -> bool {
		self.state.read().snapshot.is_some()
	}

	/// Returns the snapshot, loading it from the store if needed
	///
	/// A store failure (e.g. schema not created yet) yields an empty mapping.
	/// The empty mapping is not memoized, the next read tries the store again.
	pub async fn load(&self, store: &dyn StoreAdapter) -> Arc<ValueMap> {
		let generation = {
			let state = self.state.read();
			if let Some(snapshot) = &state.snapshot {
				return snapshot.clone();
			}
			state.generation
		};

		match store.list_values().await {
			Ok(values) => {
				let values = Arc::new(values);
				let mut state = self.state.write();
				// A write committed while we were loading, drop this snapshot
				if state.generation == generation {
					state.snapshot = Some(values.clone());
					debug!("Settings cache loaded with {} keys", values.len());
				}
				values
			}
			Err(err) => {
				warn!("Settings cache load failed, using empty mapping: {}", err);
				Arc::new(ValueMap::new())
			}
		}
	}

	/// Looks up a key, `None` if the key does not exist
	pub async fn get(&self, store: &dyn StoreAdapter, key: &str) -> Option<Option<Box<str>>> {
		self.load(store).await.get(key).cloned()
	}

	pub async fn contains(&self, store: &dyn StoreAdapter, key: &str) -> bool {
		self.load(store).await.contains_key(key)
	}

	/// Discards the snapshot
	pub fn invalidate(&self) {
		let mut state = self.state.write();
		state.snapshot = None;
		state.generation = state.generation.wrapping_add(1);
	}

	/// Explicit operator flush, same as [`invalidate`](Self::invalidate)
	pub fn flush(&self) {
		self.invalidate();
	}
}


// vim: ts=4
