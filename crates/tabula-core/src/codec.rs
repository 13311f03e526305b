//! Conversion between typed setting values and their stored text
//!
//! Encoding is lossy: booleans are stored as
//! `"1"` / `"0"` and come back as the numbers `1` / `0`. Plain strings that
//! happen to be valid JSON (`"123"`, `"true"`, `"null"`) come back decoded.
//! Callers needing a specific type should use the typed getters on
//! [`SettingsService`](crate::service::SettingsService).

use serde_json::Value;

use crate::prelude::*;

/// Converts a typed value into its stored text, `None` for null
pub fn encode(value: &SettingValue) -> Option<Box<str>> {
	match value {
		SettingValue::Null => None,
		SettingValue::Bool(true) => Some("1".into()),
		SettingValue::Bool(false) => Some("0".into()),
		SettingValue::Number(n) => Some(n.to_string().into()),
		SettingValue::String(s) => Some(s.as_str().into()),
		SettingValue::Json(j) => Some(j.to_string().into()),
	}
}

/// Converts stored text back into a typed value
pub fn decode(raw: Option<&str>) -> SettingValue {
	match raw {
		None => SettingValue::Null,
		Some(raw) => sniff_json(raw),
	}
}

/// Compatibility shim: text that parses as JSON is returned decoded,
/// anything else is returned as the raw string.
///
/// This reinterprets the type from the content (`"1"` becomes a number).
/// Keep every use of it behind [`decode`].
fn sniff_json(raw: &str) -> SettingValue {
	match serde_json::from_str::<Value>(raw) {
		Ok(value) => value.into(),
		Err(_) => SettingValue::String(raw.to_string()),
	}
}

/// Interprets a decoded value as a boolean
///
/// Accepts real booleans and the numbers `0` / `1` that encoded booleans
/// decode to.
pub fn as_bool(value: &SettingValue) -> Option<bool> {
	match value {
		SettingValue::Bool(b) => Some(*b),
		SettingValue::Number(n) => match n.as_i64() {
			Some(0) => Some(false),
			Some(1) => Some(true),
			_ => None,
		},
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn round_trip(value: SettingValue) -> SettingValue {
		decode(encode(&value).as_deref())
	}

	#[test]
	fn test_encode_booleans() {
		assert_eq!(encode(&SettingValue::Bool(true)).as_deref(), Some("1"));
		assert_eq!(encode(&SettingValue::Bool(false)).as_deref(), Some("0"));
	}

	#[test]
	fn test_encode_structures_as_json() {
		let value = SettingValue::Json(json!(["a", "b"]));
		assert_eq!(encode(&value).as_deref(), Some(r#"["a","b"]"#));

		let value = SettingValue::Json(json!({"driver": "smtp"}));
		assert_eq!(encode(&value).as_deref(), Some(r#"{"driver":"smtp"}"#));
	}

	#[test]
	fn test_encode_scalars_pass_through() {
		assert_eq!(encode(&SettingValue::from("hello")).as_deref(), Some("hello"));
		assert_eq!(encode(&SettingValue::from(42i64)).as_deref(), Some("42"));
		assert_eq!(encode(&SettingValue::Null), None);
	}

	#[test]
	fn test_decode_non_json_returns_raw() {
		assert_eq!(decode(Some("hello world")), SettingValue::from("hello world"));
		assert_eq!(decode(Some("")), SettingValue::from(""));
		// Leading zeros are not valid JSON numbers
		assert_eq!(decode(Some("01234")), SettingValue::from("01234"));
		assert_eq!(decode(None), SettingValue::Null);
	}

	#[test]
	fn test_boolean_decodes_as_number() {
		assert_eq!(round_trip(SettingValue::Bool(true)), SettingValue::from(1i64));
		assert_eq!(round_trip(SettingValue::Bool(false)), SettingValue::from(0i64));
	}

	#[test]
	fn test_json_looking_strings_are_reinterpreted() {
		assert_eq!(round_trip(SettingValue::from("123")), SettingValue::from(123i64));
		assert_eq!(round_trip(SettingValue::from("true")), SettingValue::Bool(true));
		assert_eq!(round_trip(SettingValue::from("null")), SettingValue::Null);
		assert_eq!(round_trip(SettingValue::from("[1]")), SettingValue::Json(json!([1])));
	}

	#[test]
	fn test_structures_round_trip() {
		let list = SettingValue::Json(json!(["a", "b"]));
		assert_eq!(round_trip(list.clone()), list);

		let object = SettingValue::Json(json!({"host": "localhost", "port": 25}));
		assert_eq!(round_trip(object.clone()), object);
	}

	#[test]
	fn test_as_bool() {
		assert_eq!(as_bool(&SettingValue::Bool(false)), Some(false));
		assert_eq!(as_bool(&SettingValue::from(1i64)), Some(true));
		assert_eq!(as_bool(&SettingValue::from(0i64)), Some(false));
		assert_eq!(as_bool(&SettingValue::from(2i64)), None);
		assert_eq!(as_bool(&SettingValue::from("yes")), None);
	}
}

// vim: ts=4
