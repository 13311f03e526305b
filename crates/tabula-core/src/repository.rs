//! Query layer over the store adapter
//!
//! No business rules here: the repository only adds the value codec to
//! `get`/`set` and keeps the cache consistent with every write.

use std::sync::Arc;

use tabula_types::setting::{ListSettingOptions, NewSetting, Page, Setting, UpdateSettingData};
use tabula_types::store_adapter::StoreAdapter;

use crate::cache::SettingsCache;
use crate::codec;
use crate::prelude::*;

#[derive(Debug, Clone)]
pub struct SettingsRepository {
	store: Arc<dyn StoreAdapter>,
	cache: Option<Arc<SettingsCache>>,
}

impl SettingsRepository {
	pub fn new(store: Arc<dyn StoreAdapter>, cache: Option<Arc<SettingsCache>>) -> Self {
		Self { store, cache }
	}

	pub fn store(&self) -> &Arc<dyn StoreAdapter> {
		&self.store
	}

	pub fn cache(&self) -> Option<&Arc<SettingsCache>> {
		self.cache.as_ref()
	}

	fn invalidate(&self) {
		if let Some(cache) = &self.cache {
			cache.invalidate();
		}
	}

	/// Discards the cached snapshot, if any
	pub fn flush(&self) {
		if let Some(cache) = &self.cache {
			cache.flush();
		}
	}

	// Lookups
	//*********

	pub async fn find(&self, id: SettingId) -> ClResult<Option<Setting>> {
		self.store.read_setting(id).await
	}

	pub async fn find_or_fail(&self, id: SettingId) -> ClResult<Setting> {
		self.find(id).await?.ok_or(Error::NotFound)
	}

	/// First setting matching the filter
	pub async fn find_by(&self, opts: &ListSettingOptions) -> ClResult<Option<Setting>> {
		let opts = ListSettingOptions { limit: Some(1), offset: None, ..opts.clone() };
		Ok(self.store.list_settings(&opts).await?.into_iter().next())
	}

	pub async fn find_by_key(&self, key: &str) -> ClResult<Option<Setting>> {
		self.find_by(&ListSettingOptions::by_key(key)).await
	}

	pub async fn find_all_by(&self, opts: &ListSettingOptions) -> ClResult<Vec<Setting>> {
		self.store.list_settings(opts).await
	}

	pub async fn all(&self) -> ClResult<Vec<Setting>> {
		self.store.list_settings(&ListSettingOptions::default()).await
	}

	pub async fn count(&self, opts: &ListSettingOptions) -> ClResult<u64> {
		self.store.count_settings(opts).await
	}

	/// One page of matching settings, `page` starts at 1
	pub async fn paginate(
		&self,
		opts: &ListSettingOptions,
		page: u32,
		per_page: u32,
	) -> ClResult<Page<Setting>> {
		let page = page.max(1);
		let per_page = per_page.max(1);
		let list_opts = ListSettingOptions {
			limit: Some(per_page),
			offset: Some((page - 1).saturating_mul(per_page)),
			..opts.clone()
		};

		let total = self.count(opts).await?;
		let items = self.store.list_settings(&list_opts).await?;

		Ok(Page { items, page, per_page, total })
	}

	// Writes
	//********

	pub async fn create(&self, setting: &NewSetting) -> ClResult<Setting> {
		let created = self.store.create_setting(setting).await?;
		self.invalidate();
		Ok(created)
	}

	/// Returns `false` if the setting does not exist
	pub async fn update(&self, id: SettingId, data: &UpdateSettingData) -> ClResult<bool> {
		let updated = self.store.update_setting(id, data).await?;
		if updated {
			self.invalidate();
		}
		Ok(updated)
	}

	/// Returns `false` if the setting does not exist
	pub async fn delete(&self, id: SettingId) -> ClResult<bool> {
		let deleted = self.store.delete_setting(id).await?;
		if deleted {
			self.invalidate();
		}
		Ok(deleted)
	}

	// Key-value access
	//******************

	/// Raw stored value of a key, `None` if the key does not exist
	pub async fn raw(&self, key: &str) -> ClResult<Option<Option<Box<str>>>> {
		match &self.cache {
			Some(cache) => Ok(cache.get(self.store.as_ref(), key).await),
			None => Ok(self.find_by_key(key).await?.map(|setting| setting.value)),
		}
	}

	/// Decoded value of a key, or `default` if the key does not exist
	pub async fn get(&self, key: &str, default: SettingValue) -> ClResult<SettingValue> {
		Ok(match self.raw(key).await? {
			Some(raw) => codec::decode(raw.as_deref()),
			None => default,
		})
	}

	pub async fn has(&self, key: &str) -> ClResult<bool> {
		match &self.cache {
			Some(cache) => Ok(cache.contains(self.store.as_ref(), key).await),
			None => Ok(self.find_by_key(key).await?.is_some()),
		}
	}

	/// Encodes and stores a value, creating the setting if it does not exist
	pub async fn set(&self, key: &str, value: &SettingValue) -> ClResult<bool> {
		self.set_many(&[(key.to_string(), value.clone())]).await?;
		Ok(true)
	}

	/// Encodes and stores several values in one store transaction
	pub async fn set_many(&self, entries: &[(String, SettingValue)]) -> ClResult<()> {
		let values: Vec<(Box<str>, Option<Box<str>>)> = entries
			.iter()
			.map(|(key, value)| (key.as_str().into(), codec::encode(value)))
			.collect();

		let res = self.store.write_values(&values).await;
		// The store rolled back on failure, but the snapshot may predate it either way
		self.invalidate();
		res
	}
}

// vim: ts=4
