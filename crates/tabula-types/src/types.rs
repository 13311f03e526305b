//! Common types used throughout Tabula.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::SystemTime;

// SettingId //
//***********//
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SettingId(pub u64);

impl std::fmt::Display for SettingId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for SettingId {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_u64(self.0)
	}
}

impl<'de> Deserialize<'de> for SettingId {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(SettingId(u64::deserialize(deserializer)?))
	}
}

// Timestamp //
//***********//
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub i64);

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for Timestamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(Timestamp(i64::deserialize(deserializer)?))
	}
}

impl Timestamp {
	pub fn now() -> Timestamp {
		now()
	}
}

pub fn now() -> Timestamp {
	let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
	Timestamp(i64::try_from(res.as_secs()).unwrap_or(i64::MAX))
}

// Patch //
//*******//
/// Three-state field for partial updates
///
/// - `Undefined`: field absent, leave untouched
/// - `Null`: field explicitly null, clear it
/// - `Value`: set it
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Patch<T> {
	#[default]
	Undefined,
	Null,
	Value(T),
}

impl<T> Patch<T> {
	pub fn is_undefined(&self) -> bool {
		matches!(self, Patch::Undefined)
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Patch::Null)
	}

	pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
		match self {
			Patch::Undefined => Patch::Undefined,
			Patch::Null => Patch::Null,
			Patch::Value(v) => Patch::Value(f(v)),
		}
	}
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		// Missing fields never reach here, `#[serde(default)]` yields Undefined
		Ok(match Option::<T>::deserialize(deserializer)? {
			Some(v) => Patch::Value(v),
			None => Patch::Null,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug, Deserialize)]
	struct Form {
		#[serde(default)]
		label: Patch<String>,
		#[serde(default)]
		group: Patch<String>,
	}

	#[test]
	fn test_patch_deserialize_states() {
		let form: Form = serde_json::from_str(r#"{"label": null}"#).unwrap();
		assert!(form.label.is_null());
		assert!(form.group.is_undefined());

		let form: Form = serde_json::from_str(r#"{"group": "security"}"#).unwrap();
		assert_eq!(form.group, Patch::Value("security".to_string()));
	}

	#[test]
	fn test_patch_map_keeps_state() {
		assert!(Patch::<i32>::Undefined.map(|v| v + 1).is_undefined());
		assert!(Patch::<i32>::Null.map(|v| v + 1).is_null());
		assert_eq!(Patch::Value(1).map(|v| v + 1), Patch::Value(2));
	}

	#[test]
	fn test_setting_id_serializes_as_number() {
		assert_eq!(serde_json::to_string(&SettingId(42)).unwrap(), "42");
	}
}

// vim: ts=4
