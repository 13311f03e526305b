//! Field rules for setting writes
//!
//! Rules that need the store (key uniqueness) are checked by the service.

use tabula_types::setting::{FieldType, MAX_FIELD_LEN};

use crate::prelude::*;

/// The fields of a setting as they would be after a write
#[derive(Debug, Clone, Copy)]
pub struct SettingForm<'a> {
	pub key: Option<&'a str>,
	pub field_type: Option<FieldType>,
	pub options: Option<&'a [serde_json::Value]>,
	pub label: Option<&'a str>,
	pub group: Option<&'a str>,
}

pub fn validate_key(key: Option<&str>, errors: &mut ValidationErrors) {
	match key {
		None => errors.add("key", "is required"),
		Some(key) if key.trim().is_empty() => errors.add("key", "is required"),
		Some(key) if key.chars().count() > MAX_FIELD_LEN => {
			errors.add("key", format!("may not be greater than {} characters", MAX_FIELD_LEN));
		}
		Some(_) => {}
	}
}

fn validate_len(field: &str, value: Option<&str>, errors: &mut ValidationErrors) {
	if value.is_some_and(|v| v.chars().count() > MAX_FIELD_LEN) {
		errors.add(field, format!("may not be greater than {} characters", MAX_FIELD_LEN));
	}
}

/// Collects every violation of the field rules
pub fn validate_form(form: &SettingForm<'_>) -> ValidationErrors {
	let mut errors = ValidationErrors::new();

	validate_key(form.key, &mut errors);

	match form.field_type {
		None => errors.add("fieldType", "is required"),
		Some(FieldType::Multioptions) => {
			if form.options.is_none_or(<[serde_json::Value]>::is_empty) {
				errors.add("options", "are required for multioptions fields");
			}
		}
		Some(_) => {}
	}

	validate_len("label", form.label, &mut errors);
	validate_len("group", form.group, &mut errors);

	errors
}


// vim: ts=4
