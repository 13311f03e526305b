//! Typed setting value used at the application boundary

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Setting value types
///
/// The stored form is always text; see `tabula_core::codec` for the conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
	#[default]
	Null,
	Bool(bool), // Must be before Number to avoid bool -> number coercion
	Number(serde_json::Number),
	String(String),
	/// Arrays and objects
	Json(Value),
}

impl SettingValue {
	/// Get the type name for error messages
	pub fn type_name(&self) -> &'static str {
		match self {
			SettingValue::Null => "null",
			SettingValue::Bool(_) => "bool",
			SettingValue::Number(_) => "number",
			SettingValue::String(_) => "string",
			SettingValue::Json(_) => "json",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, SettingValue::Null)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			SettingValue::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			SettingValue::Number(n) => n.as_i64(),
			_ => None,
		}
	}

	pub fn into_json(self) -> Value {
		match self {
			SettingValue::Null => Value::Null,
			SettingValue::Bool(b) => Value::Bool(b),
			SettingValue::Number(n) => Value::Number(n),
			SettingValue::String(s) => Value::String(s),
			SettingValue::Json(j) => j,
		}
	}
}

impl From<Value> for SettingValue {
	fn from(value: Value) -> Self {
		match value {
			Value::Null => SettingValue::Null,
			Value::Bool(b) => SettingValue::Bool(b),
			Value::Number(n) => SettingValue::Number(n),
			Value::String(s) => SettingValue::String(s),
			j @ (Value::Array(_) | Value::Object(_)) => SettingValue::Json(j),
		}
	}
}

impl From<bool> for SettingValue {
	fn from(value: bool) -> Self {
		SettingValue::Bool(value)
	}
}

impl From<i64> for SettingValue {
	fn from(value: i64) -> Self {
		SettingValue::Number(value.into())
	}
}

impl From<&str> for SettingValue {
	fn from(value: &str) -> Self {
		SettingValue::String(value.to_string())
	}
}

impl From<String> for SettingValue {
	fn from(value: String) -> Self {
		SettingValue::String(value)
	}
}

impl<T: Into<SettingValue>> From<Option<T>> for SettingValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(SettingValue::Null, Into::into)
	}
}


// vim: ts=4
