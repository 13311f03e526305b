//! Error type shared by every Tabula crate

use axum::{Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::collections::BTreeMap;

pub type ClResult<T> = std::result::Result<T, Error>;

/// Field-level validation messages, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
	fields: BTreeMap<Box<str>, Vec<Box<str>>>,
}

impl ValidationErrors {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, field: &str, message: impl Into<Box<str>>) {
		self.fields.entry(field.into()).or_default().push(message.into());
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	pub fn merge(&mut self, other: ValidationErrors) {
		for (field, messages) in other.fields {
			self.fields.entry(field).or_default().extend(messages);
		}
	}

	pub fn has(&self, field: &str) -> bool {
		self.fields.contains_key(field)
	}

	pub fn get(&self, field: &str) -> Option<&[Box<str>]> {
		self.fields.get(field).map(Vec::as_slice)
	}

	pub fn fields(&self) -> impl Iterator<Item = &str> {
		self.fields.keys().map(AsRef::as_ref)
	}

	/// Returns `Ok(())` when nothing was collected
	pub fn into_result(self) -> ClResult<()> {
		if self.is_empty() { Ok(()) } else { Err(Error::ValidationFailed(self)) }
	}
}

impl std::fmt::Display for ValidationErrors {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut first = true;
		for (field, messages) in &self.fields {
			for message in messages {
				if !first {
					write!(f, "; ")?;
				}
				write!(f, "{}: {}", field, message)?;
				first = false;
			}
		}
		Ok(())
	}
}

#[derive(Debug)]
pub enum Error {
	NotFound,
	PermissionDenied,
	ValidationFailed(ValidationErrors),
	/// A system setting can not be deleted
	ProtectedSetting(Box<str>),
	DbError,
	ConfigError(String),

	// externals
	Io(std::io::Error),
}

impl Error {
	/// Shorthand for a single-field validation failure
	pub fn field(field: &str, message: impl Into<Box<str>>) -> Self {
		let mut errors = ValidationErrors::new();
		errors.add(field, message);
		Error::ValidationFailed(errors)
	}

	pub fn code(&self) -> &'static str {
		match self {
			Error::NotFound => "E-CORE-NOTFOUND",
			Error::PermissionDenied => "E-AUTH-NOPERM",
			Error::ValidationFailed(_) => "E-VAL-INVALID",
			Error::ProtectedSetting(_) => "E-SETTING-PROTECTED",
			Error::DbError => "E-CORE-DBERR",
			Error::ConfigError(_) => "E-CORE-CONFIG",
			Error::Io(_) => "E-CORE-INTERNAL",
		}
	}

	pub fn status(&self) -> StatusCode {
		match self {
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::PermissionDenied | Error::ProtectedSetting(_) => StatusCode::FORBIDDEN,
			Error::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
			Error::DbError => StatusCode::SERVICE_UNAVAILABLE,
			Error::ConfigError(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

/// A body that is not valid JSON for the target type is a validation failure of "body"
impl From<JsonRejection> for Error {
	fn from(rejection: JsonRejection) -> Self {
		Error::field("body", rejection.body_text())
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::ValidationFailed(errors) => write!(f, "validation failed: {}", errors),
			Error::ProtectedSetting(key) => {
				write!(f, "system settings cannot be deleted: '{}'", key)
			}
			Error::DbError => write!(f, "database error"),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}

#[derive(Serialize)]
struct ErrorBody<'a> {
	code: &'static str,
	message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	fields: Option<&'a ValidationErrors>,
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
	error: ErrorBody<'a>,
}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		let status = self.status();
		// Internal details stay in the log
		let message = match &self {
			Error::DbError | Error::Io(_) | Error::ConfigError(_) => {
				tracing::warn!("request failed: {}", self);
				"internal error".to_string()
			}
			_ => self.to_string(),
		};
		let fields = match &self {
			Error::ValidationFailed(errors) => Some(errors),
			_ => None,
		};
		let body = ErrorResponse { error: ErrorBody { code: self.code(), message, fields } };
		(status, Json(serde_json::to_value(&body).unwrap_or_default())).into_response()
	}
}


// vim: ts=4
