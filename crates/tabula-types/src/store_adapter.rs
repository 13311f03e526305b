//! Persistence seam for the settings table
//!
//! Adapters implement plain CRUD over the store. They know nothing about
//! value typing, caching or the system-role rules; those live in `tabula-core`.

use async_trait::async_trait;
use std::{collections::HashMap, fmt::Debug};

use crate::prelude::*;
use crate::setting::{ListSettingOptions, NewSetting, Setting, UpdateSettingData};

/// Raw key -> stored value mapping of the whole table
pub type ValueMap = HashMap<Box<str>, Option<Box<str>>>;

#[async_trait]
pub trait StoreAdapter: Debug + Send + Sync {
	/// Reads a setting by id, `None` if it does not exist
	async fn read_setting(&self, id: SettingId) -> ClResult<Option<Setting>>;

	/// Lists settings matching the filter, ordered by id
	async fn list_settings(&self, opts: &ListSettingOptions) -> ClResult<Vec<Setting>>;

	/// Counts settings matching the filter (limit and offset are ignored)
	async fn count_settings(&self, opts: &ListSettingOptions) -> ClResult<u64>;

	/// Reads every key with its raw value in one pass
	async fn list_values(&self) -> ClResult<ValueMap>;

	/// Inserts a new row. A duplicate key fails with a `key` validation error.
	async fn create_setting(&self, setting: &NewSetting) -> ClResult<Setting>;

	/// Updates a row, returns `false` if the id does not exist
	async fn update_setting(&self, id: SettingId, data: &UpdateSettingData) -> ClResult<bool>;

	/// Deletes a row, returns `false` if the id does not exist
	async fn delete_setting(&self, id: SettingId) -> ClResult<bool>;

	/// Upserts values by key in a single transaction
	///
	/// Missing keys are created with the default field type and role.
	/// Either every value is written or none is.
	async fn write_values(&self, values: &[(Box<str>, Option<Box<str>>)]) -> ClResult<()>;
}

// vim: ts=4
