//! Shared test stores and setup helpers

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::{
	Arc,
	atomic::{AtomicBool, AtomicUsize, Ordering},
};
use tempfile::TempDir;

use tabula_core::{SettingsConfig, SettingsService};
use tabula_store_adapter_sqlite::StoreAdapterSqlite;
use tabula_types::audit::{AuditEvent, AuditSink};
use tabula_types::prelude::*;
use tabula_types::setting::{ListSettingOptions, NewSetting, Setting, UpdateSettingData};
use tabula_types::store_adapter::{StoreAdapter, ValueMap};

/// Test-local patch application: Undefined keeps, Null clears, Value replaces
trait ApplyPatch<T> {
	fn apply_to(self, current: Option<T>) -> Option<T>;
}

impl<T> ApplyPatch<T> for Patch<T> {
	fn apply_to(self, current: Option<T>) -> Option<T> {
		match self {
			Patch::Undefined => current,
			Patch::Null => None,
			Patch::Value(v) => Some(v),
		}
	}
}

pub fn setup_test_logging() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::DEBUG)
		.try_init();
}

/// Service over a fresh SQLite store
pub async fn create_sqlite_service(config: SettingsConfig) -> (SettingsService, TempDir) {
	setup_test_logging();
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let store = StoreAdapterSqlite::new(temp_dir.path()).await.expect("Failed to create adapter");

	(SettingsService::new(Arc::new(store), config), temp_dir)
}

/// Service over an in-memory store, the store handle is returned for fault injection
pub fn create_memory_service(config: SettingsConfig) -> (SettingsService, Arc<MemoryStore>) {
	setup_test_logging();
	let store = Arc::new(MemoryStore::default());
	(SettingsService::new(store.clone(), config), store)
}

pub fn uncached() -> SettingsConfig {
	SettingsConfig { cache_enabled: false, ..SettingsConfig::default() }
}

/// In-memory store with write failure injection and a load counter
#[derive(Debug, Default)]
pub struct MemoryStore {
	rows: Mutex<Vec<Setting>>,
	next_id: AtomicUsize,
	pub fail_writes: AtomicBool,
	pub value_loads: AtomicUsize,
}

impl MemoryStore {
	pub fn len(&self) -> usize {
		self.rows.lock().len()
	}

	/// Changes a value behind the service's back, like another process would
	pub fn poke(&self, key: &str, value: Option<&str>) {
		for row in self.rows.lock().iter_mut().filter(|row| row.key.as_ref() == key) {
			row.value = value.map(Into::into);
		}
	}

	fn check_writable(&self) -> ClResult<()> {
		if self.fail_writes.load(Ordering::SeqCst) { Err(Error::DbError) } else { Ok(()) }
	}

	fn next_id(&self) -> SettingId {
		SettingId(self.next_id.fetch_add(1, Ordering::SeqCst) as u64 + 1)
	}

	fn matches(row: &Setting, opts: &ListSettingOptions) -> bool {
		let contains = |field: Option<&str>, q: &str| {
			field.is_some_and(|f| f.to_lowercase().contains(&q.to_lowercase()))
		};
		opts.key.as_deref().is_none_or(|key| row.key.as_ref() == key)
			&& opts.role.is_none_or(|role| row.role == role)
			&& opts.group.as_deref().is_none_or(|group| row.group.as_deref() == Some(group))
			&& opts.field_type.is_none_or(|ft| row.field_type == ft)
			&& opts.q.as_deref().is_none_or(|q| {
				contains(Some(&row.key), q)
					|| contains(row.label.as_deref(), q)
					|| contains(row.description.as_deref(), q)
					|| contains(row.value.as_deref(), q)
			})
	}

	fn new_row(&self, setting: &NewSetting) -> Setting {
		let now = Timestamp::now();
		Setting {
			id: self.next_id(),
			key: setting.key.clone(),
			value: setting.value.clone(),
			field_type: setting.field_type,
			options: setting.options.clone(),
			label: setting.label.clone(),
			description: setting.description.clone(),
			role: setting.role,
			group: setting.group.clone(),
			created_at: now,
			updated_at: now,
		}
	}
}

#[async_trait]
impl StoreAdapter for MemoryStore {
	async fn read_setting(&self, id: SettingId) -> ClResult<Option<Setting>> {
		Ok(self.rows.lock().iter().find(|row| row.id == id).cloned())
	}

	async fn list_settings(&self, opts: &ListSettingOptions) -> ClResult<Vec<Setting>> {
		let rows = self.rows.lock();
		Ok(rows
			.iter()
			.filter(|row| Self::matches(row, opts))
			.skip(opts.offset.unwrap_or(0) as usize)
			.take(opts.limit.map_or(usize::MAX, |l| l as usize))
			.cloned()
			.collect())
	}

	async fn count_settings(&self, opts: &ListSettingOptions) -> ClResult<u64> {
		Ok(self.rows.lock().iter().filter(|row| Self::matches(row, opts)).count() as u64)
	}

	async fn list_values(&self) -> ClResult<ValueMap> {
		self.value_loads.fetch_add(1, Ordering::SeqCst);
		Ok(self.rows.lock().iter().map(|row| (row.key.clone(), row.value.clone())).collect())
	}

	async fn create_setting(&self, setting: &NewSetting) -> ClResult<Setting> {
		self.check_writable()?;
		let mut rows = self.rows.lock();
		if rows.iter().any(|row| row.key == setting.key) {
			return Err(Error::field("key", "has already been taken"));
		}
		let row = self.new_row(setting);
		rows.push(row.clone());
		Ok(row)
	}

	async fn update_setting(&self, id: SettingId, data: &UpdateSettingData) -> ClResult<bool> {
		self.check_writable()?;
		let mut rows = self.rows.lock();
		let Some(row) = rows.iter_mut().find(|row| row.id == id) else {
			return Ok(false);
		};
		if let Patch::Value(key) = &data.key {
			row.key = key.clone();
		}
		row.value = data.value.clone().apply_to(row.value.take());
		if let Patch::Value(field_type) = data.field_type {
			row.field_type = field_type;
		}
		row.options = data.options.clone().apply_to(row.options.take());
		row.label = data.label.clone().apply_to(row.label.take());
		row.description = data.description.clone().apply_to(row.description.take());
		if let Patch::Value(role) = data.role {
			row.role = role;
		}
		row.group = data.group.clone().apply_to(row.group.take());
		row.updated_at = Timestamp::now();
		Ok(true)
	}

	async fn delete_setting(&self, id: SettingId) -> ClResult<bool> {
		self.check_writable()?;
		let mut rows = self.rows.lock();
		let len = rows.len();
		rows.retain(|row| row.id != id);
		Ok(rows.len() != len)
	}

	async fn write_values(&self, values: &[(Box<str>, Option<Box<str>>)]) -> ClResult<()> {
		self.check_writable()?;
		let mut rows = self.rows.lock();
		for (key, value) in values {
			match rows.iter_mut().find(|row| &row.key == key) {
				Some(row) => {
					row.value = value.clone();
					row.updated_at = Timestamp::now();
				}
				None => {
					let row = self.new_row(&NewSetting {
						key: key.clone(),
						value: value.clone(),
						..NewSetting::default()
					});
					rows.push(row);
				}
			}
		}
		Ok(())
	}
}

/// Audit sink that keeps every event
#[derive(Debug, Default)]
pub struct RecordingSink {
	pub events: Mutex<Vec<AuditEvent>>,
}

impl AuditSink for RecordingSink {
	fn record(&self, event: &AuditEvent) {
		self.events.lock().push(event.clone());
	}
}

// vim: ts=4
