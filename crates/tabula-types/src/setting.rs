//! Setting record and the attribute types used to create, update and query it

use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::prelude::*;
use crate::value::SettingValue;

/// Maximum length of keys, labels and groups
pub const MAX_FIELD_LEN: usize = 255;

/// UI rendering hint for a setting's value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
	#[default]
	Input,
	Checkbox,
	Multioptions,
}

impl FieldType {
	pub fn as_str(&self) -> &'static str {
		match self {
			FieldType::Input => "input",
			FieldType::Checkbox => "checkbox",
			FieldType::Multioptions => "multioptions",
		}
	}
}

impl std::str::FromStr for FieldType {
	type Err = Error;

	fn from_str(s: &str) -> ClResult<Self> {
		match s {
			"input" => Ok(FieldType::Input),
			"checkbox" => Ok(FieldType::Checkbox),
			"multioptions" => Ok(FieldType::Multioptions),
			_ => Err(Error::field("fieldType", "must be one of: input, checkbox, multioptions")),
		}
	}
}

/// Origin and protection level of a setting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	/// Can not be deleted, role can not be changed
	System,
	#[default]
	User,
	Plugin,
}

impl Role {
	pub fn as_str(&self) -> &'static str {
		match self {
			Role::System => "system",
			Role::User => "user",
			Role::Plugin => "plugin",
		}
	}

	pub fn is_protected(&self) -> bool {
		matches!(self, Role::System)
	}
}

impl std::str::FromStr for Role {
	type Err = Error;

	fn from_str(s: &str) -> ClResult<Self> {
		match s {
			"system" => Ok(Role::System),
			"user" => Ok(Role::User),
			"plugin" => Ok(Role::Plugin),
			_ => Err(Error::field("role", "must be one of: system, user, plugin")),
		}
	}
}

impl std::fmt::Display for Role {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Persisted setting row. `value` is the raw stored text.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
	pub id: SettingId,
	pub key: Box<str>,
	pub value: Option<Box<str>>,
	pub field_type: FieldType,
	pub options: Option<Vec<serde_json::Value>>,
	pub label: Option<Box<str>>,
	pub description: Option<Box<str>>,
	pub role: Role,
	pub group: Option<Box<str>>,
	pub created_at: Timestamp,
	pub updated_at: Timestamp,
}

// Store-level attributes (raw, already encoded values)
//*****************************************************

/// Attributes for a new row
#[derive(Debug, Clone, Default)]
pub struct NewSetting {
	pub key: Box<str>,
	pub value: Option<Box<str>>,
	pub field_type: FieldType,
	pub options: Option<Vec<serde_json::Value>>,
	pub label: Option<Box<str>>,
	pub description: Option<Box<str>>,
	pub role: Role,
	pub group: Option<Box<str>>,
}

/// Attributes for an update, absent fields stay untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateSettingData {
	pub key: Patch<Box<str>>,
	pub value: Patch<Box<str>>,
	pub field_type: Patch<FieldType>,
	pub options: Patch<Vec<serde_json::Value>>,
	pub label: Patch<Box<str>>,
	pub description: Patch<Box<str>>,
	pub role: Patch<Role>,
	pub group: Patch<Box<str>>,
}

/// Filter attributes for lookups and listings
///
/// `q` is a case-insensitive substring match over key, label, description and value.
#[derive(Debug, Clone, Default)]
pub struct ListSettingOptions {
	pub key: Option<Box<str>>,
	pub role: Option<Role>,
	pub group: Option<Box<str>>,
	pub field_type: Option<FieldType>,
	pub q: Option<Box<str>>,
	pub limit: Option<u32>,
	pub offset: Option<u32>,
}

impl ListSettingOptions {
	pub fn by_key(key: &str) -> Self {
		Self { key: Some(key.into()), ..Self::default() }
	}

	pub fn by_role(role: Role) -> Self {
		Self { role: Some(role), ..Self::default() }
	}

	pub fn by_group(group: &str) -> Self {
		Self { group: Some(group.into()), ..Self::default() }
	}

	pub fn search(term: &str) -> Self {
		Self { q: Some(term.into()), ..Self::default() }
	}
}

/// One page of a listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
	pub items: Vec<T>,
	pub page: u32,
	pub per_page: u32,
	pub total: u64,
}

impl<T> Page<T> {
	pub fn last_page(&self) -> u32 {
		if self.per_page == 0 || self.total == 0 {
			return 1;
		}
		u32::try_from(self.total.div_ceil(u64::from(self.per_page))).unwrap_or(u32::MAX)
	}

	pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
		Page {
			items: self.items.into_iter().map(f).collect(),
			page: self.page,
			per_page: self.per_page,
			total: self.total,
		}
	}
}

// Service-level input (typed values)
//************************************

/// Input for creating a setting
#[derive(Debug, Clone, Default)]
pub struct CreateSettingData {
	pub key: String,
	pub value: SettingValue,
	pub field_type: FieldType,
	pub options: Option<Vec<serde_json::Value>>,
	pub label: Option<String>,
	pub description: Option<String>,
	pub role: Role,
	pub group: Option<String>,
}

/// Input for updating a setting
#[derive(Debug, Clone, Default)]
pub struct UpdateSetting {
	pub key: Patch<String>,
	pub value: Patch<SettingValue>,
	pub field_type: Patch<FieldType>,
	pub options: Patch<Vec<serde_json::Value>>,
	pub label: Patch<String>,
	pub description: Patch<String>,
	pub role: Patch<Role>,
	pub group: Patch<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_enums_parse_and_print() {
		assert_eq!("multioptions".parse::<FieldType>().ok(), Some(FieldType::Multioptions));
		assert_eq!("plugin".parse::<Role>().ok(), Some(Role::Plugin));
		assert!(matches!("admin".parse::<Role>(), Err(Error::ValidationFailed(e)) if e.has("role")));
		assert!(
			matches!("radio".parse::<FieldType>(), Err(Error::ValidationFailed(e)) if e.has("fieldType"))
		);
		assert_eq!(Role::System.to_string(), "system");
	}

	#[test]
	fn test_create_data_defaults() {
		let data = CreateSettingData { key: "site_name".into(), ..CreateSettingData::default() };
		assert_eq!(data.field_type, FieldType::Input);
		assert_eq!(data.role, Role::User);
		assert!(data.value.is_null());
	}

	#[test]
	fn test_page_last_page() {
		let page = Page { items: vec![1, 2], page: 1, per_page: 2, total: 5 };
		assert_eq!(page.last_page(), 3);
		let empty: Page<i32> = Page { items: vec![], page: 1, per_page: 15, total: 0 };
		assert_eq!(empty.last_page(), 1);
	}
}

// vim: ts=4
