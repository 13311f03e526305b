//! Settings service with validation, delete protection and audit hooks

use serde::de::DeserializeOwned;
use std::{collections::BTreeMap, sync::Arc};

use tabula_types::audit::{AuditAction, AuditEvent, AuditSink, Snapshot};
use tabula_types::setting::{
	CreateSettingData, ListSettingOptions, NewSetting, Page, Role, Setting, UpdateSetting,
	UpdateSettingData,
};
use tabula_types::store_adapter::StoreAdapter;

use crate::cache::SettingsCache;
use crate::codec;
use crate::config::SettingsConfig;
use crate::prelude::*;
use crate::repository::SettingsRepository;
use crate::validate::{SettingForm, validate_form, validate_key};

fn type_mismatch(key: &str, expected: &str, value: &SettingValue) -> Error {
	Error::field(key, format!("is not {}, got {}", expected, value.type_name()))
}

fn encode_patch(value: Patch<SettingValue>) -> Patch<Box<str>> {
	match value {
		Patch::Undefined => Patch::Undefined,
		Patch::Null => Patch::Null,
		Patch::Value(value) => match codec::encode(&value) {
			Some(raw) => Patch::Value(raw),
			None => Patch::Null,
		},
	}
}

fn snapshot(key: &str, value: Option<&str>) -> Snapshot {
	Snapshot::from([(key.into(), value.map(Into::into))])
}

/// Settings service - main interface for reading and managing settings
#[derive(Debug)]
pub struct SettingsService {
	repo: SettingsRepository,
	config: SettingsConfig,
	audit: Option<Arc<dyn AuditSink>>,
}

impl SettingsService {
	pub fn new(store: Arc<dyn StoreAdapter>, config: SettingsConfig) -> Self {
		let cache = config.cache_enabled.then(|| Arc::new(SettingsCache::new()));
		Self { repo: SettingsRepository::new(store, cache), config, audit: None }
	}

	/// Notify `sink` after every successful write
	pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
		self.audit = Some(sink);
		self
	}

	pub fn repository(&self) -> &SettingsRepository {
		&self.repo
	}

	pub fn config(&self) -> &SettingsConfig {
		&self.config
	}

	fn record(&self, action: AuditAction, id: Option<SettingId>, before: Snapshot, after: Snapshot) {
		if let Some(sink) = &self.audit {
			sink.record(&AuditEvent { action, setting_id: id, before, after });
		}
	}

	// Reads
	//*******

	/// Decoded value of `key`, or `default` if the setting does not exist
	pub async fn get(&self, key: &str, default: SettingValue) -> ClResult<SettingValue> {
		self.repo.get(key, default).await
	}

	pub async fn has(&self, key: &str) -> ClResult<bool> {
		self.repo.has(key).await
	}

	/// Type-safe getters (default if absent, error if the stored type does not fit)
	pub async fn get_bool(&self, key: &str, default: bool) -> ClResult<bool> {
		match self.get(key, SettingValue::Null).await? {
			SettingValue::Null => Ok(default),
			v => codec::as_bool(&v).ok_or_else(|| type_mismatch(key, "a boolean", &v)),
		}
	}

	pub async fn get_int(&self, key: &str, default: i64) -> ClResult<i64> {
		match self.get(key, SettingValue::Null).await? {
			SettingValue::Null => Ok(default),
			v => v.as_i64().ok_or_else(|| type_mismatch(key, "an integer", &v)),
		}
	}

	/// Scalars that were decoded from their text form are returned as text again
	pub async fn get_string(&self, key: &str, default: &str) -> ClResult<String> {
		match self.get(key, SettingValue::Null).await? {
			SettingValue::Null => Ok(default.to_string()),
			SettingValue::String(s) => Ok(s),
			SettingValue::Number(n) => Ok(n.to_string()),
			SettingValue::Bool(b) => Ok(b.to_string()),
			v @ SettingValue::Json(_) => Err(type_mismatch(key, "a string", &v)),
		}
	}

	/// Deserializes the decoded value, `None` if the setting does not exist
	pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> ClResult<Option<T>> {
		match self.get(key, SettingValue::Null).await? {
			SettingValue::Null => Ok(None),
			v => serde_json::from_value(v.clone().into_json())
				.map(Some)
				.map_err(|_| type_mismatch(key, "the expected structure", &v)),
		}
	}

	/// Values of several keys, missing keys map to null
	pub async fn get_multiple(&self, keys: &[&str]) -> ClResult<BTreeMap<String, SettingValue>> {
		let mut values = BTreeMap::new();
		for key in keys {
			values.insert((*key).to_string(), self.get(key, SettingValue::Null).await?);
		}
		Ok(values)
	}

	/// Values of several keys, each missing key maps to its own default
	pub async fn get_multiple_or(
		&self,
		defaults: BTreeMap<String, SettingValue>,
	) -> ClResult<BTreeMap<String, SettingValue>> {
		let mut values = BTreeMap::new();
		for (key, default) in defaults {
			let value = self.get(&key, default).await?;
			values.insert(key, value);
		}
		Ok(values)
	}

	pub async fn find(&self, id: SettingId) -> ClResult<Option<Setting>> {
		self.repo.find(id).await
	}

	pub async fn find_or_fail(&self, id: SettingId) -> ClResult<Setting> {
		self.repo.find_or_fail(id).await
	}

	pub async fn find_by_key(&self, key: &str) -> ClResult<Option<Setting>> {
		self.repo.find_by_key(key).await
	}

	/// Case-insensitive substring match over key, label, description and value
	pub async fn search(&self, term: &str) -> ClResult<Vec<Setting>> {
		self.repo.find_all_by(&ListSettingOptions::search(term)).await
	}

	pub async fn get_by_role(&self, role: Role) -> ClResult<Vec<Setting>> {
		self.repo.find_all_by(&ListSettingOptions::by_role(role)).await
	}

	pub async fn get_by_group(&self, group: &str) -> ClResult<Vec<Setting>> {
		self.repo.find_all_by(&ListSettingOptions::by_group(group)).await
	}

	pub async fn all(&self) -> ClResult<Vec<Setting>> {
		self.repo.all().await
	}

	/// Paginated listing with the configured page size bounds
	pub async fn list(
		&self,
		opts: &ListSettingOptions,
		page: Option<u32>,
		per_page: Option<u32>,
	) -> ClResult<Page<Setting>> {
		let per_page = self.config.per_page(per_page);
		self.repo.paginate(opts, page.unwrap_or(1), per_page).await
	}

	// Writes
	//********

	/// Stores a value, creating the setting if it does not exist
	pub async fn set(&self, key: &str, value: impl Into<SettingValue>) -> ClResult<bool> {
		let key = key.trim();
		let mut errors = ValidationErrors::new();
		validate_key(Some(key), &mut errors);
		errors.into_result()?;

		let res = self.repo.set(key, &value.into()).await?;
		debug!("Setting '{}' stored", key);
		Ok(res)
	}

	pub async fn create(&self, data: CreateSettingData) -> ClResult<Setting> {
		let key = data.key.trim();
		let form = SettingForm {
			key: Some(key),
			field_type: Some(data.field_type),
			options: data.options.as_deref(),
			label: data.label.as_deref(),
			group: data.group.as_deref(),
		};
		let mut errors = validate_form(&form);
		if !errors.has("key") && self.repo.find_by_key(key).await?.is_some() {
			errors.add("key", "has already been taken");
		}
		errors.into_result()?;

		let new_setting = NewSetting {
			key: key.into(),
			value: codec::encode(&data.value),
			field_type: data.field_type,
			options: data.options,
			label: data.label.map(Into::into),
			description: data.description.map(Into::into),
			role: data.role,
			group: data.group.map(Into::into),
		};
		let created = self.repo.create(&new_setting).await?;

		info!("Setting '{}' created with id={} role={}", created.key, created.id, created.role);
		self.record(
			AuditAction::Create,
			Some(created.id),
			Snapshot::new(),
			snapshot(&created.key, created.value.as_deref()),
		);
		Ok(created)
	}

	/// Returns `false` if the setting does not exist
	pub async fn update(&self, id: SettingId, data: UpdateSetting) -> ClResult<bool> {
		let Some(existing) = self.repo.find(id).await? else {
			return Ok(false);
		};

		// Validate the record as it will look after the update
		let key = match &data.key {
			Patch::Undefined => Some(&*existing.key),
			Patch::Null => None,
			Patch::Value(key) => Some(key.trim()),
		};
		let field_type = match data.field_type {
			Patch::Undefined => Some(existing.field_type),
			Patch::Null => None,
			Patch::Value(field_type) => Some(field_type),
		};
		let options = match &data.options {
			Patch::Undefined => existing.options.as_deref(),
			Patch::Null => None,
			Patch::Value(options) => Some(options.as_slice()),
		};
		let label = match &data.label {
			Patch::Undefined => existing.label.as_deref(),
			Patch::Null => None,
			Patch::Value(label) => Some(label.as_str()),
		};
		let group = match &data.group {
			Patch::Undefined => existing.group.as_deref(),
			Patch::Null => None,
			Patch::Value(group) => Some(group.as_str()),
		};
		let mut errors = validate_form(&SettingForm { key, field_type, options, label, group });

		match data.role {
			Patch::Null => errors.add("role", "is required"),
			Patch::Value(role) if existing.role.is_protected() && role != Role::System => {
				errors.add("role", "system settings must keep the system role");
			}
			_ => {}
		}

		if !errors.has("key") {
			if let Some(key) = key.filter(|key| *key != &*existing.key) {
				if self.repo.find_by_key(key).await?.is_some_and(|other| other.id != id) {
					errors.add("key", "has already been taken");
				}
			}
		}
		errors.into_result()?;

		let key_after: Box<str> = key.map_or_else(|| existing.key.clone(), Into::into);
		let update = UpdateSettingData {
			key: data.key.map(|key| key.trim().into()),
			value: encode_patch(data.value),
			field_type: data.field_type,
			options: data.options,
			label: data.label.map(Into::into),
			description: data.description.map(Into::into),
			role: data.role,
			group: data.group.map(Into::into),
		};
		let value_after = match &update.value {
			Patch::Undefined => existing.value.clone(),
			Patch::Null => None,
			Patch::Value(raw) => Some(raw.clone()),
		};

		let updated = self.repo.update(id, &update).await?;
		if updated {
			info!("Setting '{}' updated (id={})", key_after, id);
			self.record(
				AuditAction::Update,
				Some(id),
				snapshot(&existing.key, existing.value.as_deref()),
				snapshot(&key_after, value_after.as_deref()),
			);
		}
		Ok(updated)
	}

	/// Deletes a setting
	///
	/// Returns `false` if it does not exist and `Error::ProtectedSetting` for
	/// system settings, which are left untouched.
	pub async fn delete(&self, id: SettingId) -> ClResult<bool> {
		let Some(existing) = self.repo.find(id).await? else {
			return Ok(false);
		};

		if existing.role.is_protected() {
			warn!("Refusing to delete system setting '{}' (id={})", existing.key, id);
			return Err(Error::ProtectedSetting(existing.key));
		}

		let deleted = self.repo.delete(id).await?;
		if deleted {
			info!("Setting '{}' deleted (id={})", existing.key, id);
			self.record(
				AuditAction::Delete,
				Some(id),
				snapshot(&existing.key, existing.value.as_deref()),
				Snapshot::new(),
			);
		}
		Ok(deleted)
	}

	/// Stores several values in one transaction, all or nothing
	///
	/// An empty batch touches neither the store nor the cache.
	pub async fn set_multiple(
		&self,
		entries: impl IntoIterator<Item = (String, SettingValue)>,
	) -> ClResult<bool> {
		let entries: Vec<(String, SettingValue)> = entries.into_iter().collect();
		if entries.is_empty() {
			return Ok(true);
		}

		let mut errors = ValidationErrors::new();
		for (key, _) in &entries {
			let mut key_errors = ValidationErrors::new();
			validate_key(Some(key.trim()), &mut key_errors);
			for message in key_errors.get("key").unwrap_or_default() {
				errors.add(&format!("settings.{}", key), message.clone());
			}
		}
		errors.into_result()?;

		let entries: Vec<(String, SettingValue)> =
			entries.into_iter().map(|(key, value)| (key.trim().to_string(), value)).collect();

		let mut before = Snapshot::new();
		if self.audit.is_some() {
			for (key, _) in &entries {
				before.insert(key.as_str().into(), self.repo.raw(key).await?.flatten());
			}
		}

		self.repo.set_many(&entries).await?;

		info!("Bulk update of {} settings", entries.len());
		if self.audit.is_some() {
			let after = entries
				.iter()
				.map(|(key, value)| (key.as_str().into(), codec::encode(value)))
				.collect();
			self.record(AuditAction::BulkUpdate, None, before, after);
		}
		Ok(true)
	}

	/// Discards the cached snapshot so the next read goes to the store
	pub fn flush_cache(&self) {
		self.repo.flush();
		debug!("Settings cache flushed");
	}
}

// vim: ts=4
