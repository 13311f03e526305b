//! Admin settings handlers

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::{collections::BTreeMap, str::FromStr};

use tabula_core::codec;
use tabula_types::error::ValidationErrors;
use tabula_types::setting::{
	CreateSettingData, FieldType, ListSettingOptions, Role, Setting, UpdateSetting,
};

use crate::extract::{ApiJson, ApiQuery, OptionalRequestId};
use crate::prelude::*;
use crate::types::ApiResponse;

/// Setting as returned by the admin API, with the decoded value
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingView {
	pub id: SettingId,
	pub key: Box<str>,
	pub value: SettingValue,
	pub field_type: FieldType,
	pub options: Option<Vec<serde_json::Value>>,
	pub label: Option<Box<str>>,
	pub description: Option<Box<str>>,
	pub role: Role,
	pub group: Option<Box<str>>,
	pub created_at: Timestamp,
	pub updated_at: Timestamp,
}

impl From<Setting> for SettingView {
	fn from(setting: Setting) -> Self {
		SettingView {
			id: setting.id,
			value: codec::decode(setting.value.as_deref()),
			key: setting.key,
			field_type: setting.field_type,
			options: setting.options,
			label: setting.label,
			description: setting.description,
			role: setting.role,
			group: setting.group,
			created_at: setting.created_at,
			updated_at: setting.updated_at,
		}
	}
}

/// Parses a `fieldType` or `role` given as text, collecting the failure under its field name
fn parse_choice<T>(raw: Option<&str>, errors: &mut ValidationErrors) -> ClResult<Option<T>>
where
	T: FromStr<Err = Error>,
{
	let Some(raw) = raw else {
		return Ok(None);
	};
	match raw.parse() {
		Ok(value) => Ok(Some(value)),
		Err(Error::ValidationFailed(field_errors)) => {
			errors.merge(field_errors);
			Ok(None)
		}
		Err(err) => Err(err),
	}
}

fn parse_choice_patch<T>(patch: Patch<String>, errors: &mut ValidationErrors) -> ClResult<Patch<T>>
where
	T: FromStr<Err = Error>,
{
	Ok(match patch {
		Patch::Undefined => Patch::Undefined,
		Patch::Null => Patch::Null,
		Patch::Value(raw) => {
			parse_choice(Some(raw.as_str()), errors)?.map_or(Patch::Undefined, Patch::Value)
		}
	})
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSettingsQuery {
	pub q: Option<String>,
	pub role: Option<String>,
	pub group: Option<String>,
	pub field_type: Option<String>,
	pub page: Option<u32>,
	pub per_page: Option<u32>,
}

impl ListSettingsQuery {
	fn to_options(&self) -> ClResult<ListSettingOptions> {
		let mut errors = ValidationErrors::new();
		let role = parse_choice(self.role.as_deref(), &mut errors)?;
		let field_type = parse_choice(self.field_type.as_deref(), &mut errors)?;
		errors.into_result()?;

		Ok(ListSettingOptions {
			q: self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()).map(Into::into),
			role,
			group: self.group.as_deref().map(Into::into),
			field_type,
			..ListSettingOptions::default()
		})
	}
}

/// Body of a create request
///
/// `fieldType` and `role` are read as text so unknown values come back as field errors.
/// A missing key is left empty and reported by the service.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSettingRequest {
	#[serde(default)]
	pub key: String,
	#[serde(default)]
	pub value: SettingValue,
	pub field_type: Option<String>,
	pub options: Option<Vec<serde_json::Value>>,
	pub label: Option<String>,
	pub description: Option<String>,
	pub role: Option<String>,
	pub group: Option<String>,
}

impl TryFrom<CreateSettingRequest> for CreateSettingData {
	type Error = Error;

	fn try_from(req: CreateSettingRequest) -> ClResult<Self> {
		let mut errors = ValidationErrors::new();
		let field_type = parse_choice(req.field_type.as_deref(), &mut errors)?;
		let role = parse_choice(req.role.as_deref(), &mut errors)?;
		errors.into_result()?;

		Ok(CreateSettingData {
			key: req.key,
			value: req.value,
			field_type: field_type.unwrap_or_default(),
			options: req.options,
			label: req.label,
			description: req.description,
			role: role.unwrap_or_default(),
			group: req.group,
		})
	}
}

/// Body of a patch request, absent fields stay untouched
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingRequest {
	#[serde(default)]
	pub key: Patch<String>,
	#[serde(default)]
	pub value: Patch<SettingValue>,
	#[serde(default)]
	pub field_type: Patch<String>,
	#[serde(default)]
	pub options: Patch<Vec<serde_json::Value>>,
	#[serde(default)]
	pub label: Patch<String>,
	#[serde(default)]
	pub description: Patch<String>,
	#[serde(default)]
	pub role: Patch<String>,
	#[serde(default)]
	pub group: Patch<String>,
}

impl TryFrom<UpdateSettingRequest> for UpdateSetting {
	type Error = Error;

	fn try_from(req: UpdateSettingRequest) -> ClResult<Self> {
		let mut errors = ValidationErrors::new();
		let field_type = parse_choice_patch(req.field_type, &mut errors)?;
		let role = parse_choice_patch(req.role, &mut errors)?;
		errors.into_result()?;

		Ok(UpdateSetting {
			key: req.key,
			value: req.value,
			field_type,
			options: req.options,
			label: req.label,
			description: req.description,
			role,
			group: req.group,
		})
	}
}

#[derive(Debug, Deserialize)]
pub struct BulkUpdateRequest {
	pub settings: BTreeMap<String, SettingValue>,
}

/// GET /api/admin/settings - List settings, filtered and paginated
pub async fn list_settings(
	State(app): State<App>,
	ApiQuery(query): ApiQuery<ListSettingsQuery>,
	OptionalRequestId(req_id): OptionalRequestId,
) -> ClResult<(StatusCode, Json<ApiResponse<Vec<SettingView>>>)> {
	info!(
		q = ?query.q,
		role = ?query.role,
		group = ?query.group,
		page = ?query.page,
		"GET /api/admin/settings - Listing settings"
	);

	let opts = query.to_options()?;
	let page = app.settings.list(&opts, query.page, query.per_page).await?;

	let response = ApiResponse::from_page(page, SettingView::from).with_req_id(req_id);
	Ok((StatusCode::OK, Json(response)))
}

/// POST /api/admin/settings - Create a setting
pub async fn create_setting(
	State(app): State<App>,
	OptionalRequestId(req_id): OptionalRequestId,
	ApiJson(req): ApiJson<CreateSettingRequest>,
) -> ClResult<(StatusCode, Json<ApiResponse<SettingView>>)> {
	info!(key = %req.key, "POST /api/admin/settings - Creating setting");

	let setting = app.settings.create(CreateSettingData::try_from(req)?).await?;

	let response = ApiResponse::new(SettingView::from(setting)).with_req_id(req_id);
	Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/admin/settings/{id} - Get one setting
pub async fn get_setting(
	State(app): State<App>,
	Path(id): Path<u64>,
	OptionalRequestId(req_id): OptionalRequestId,
) -> ClResult<(StatusCode, Json<ApiResponse<SettingView>>)> {
	let setting = app.settings.find_or_fail(SettingId(id)).await?;

	let response = ApiResponse::new(SettingView::from(setting)).with_req_id(req_id);
	Ok((StatusCode::OK, Json(response)))
}

/// PATCH /api/admin/settings/{id} - Update a setting, absent fields stay untouched
pub async fn patch_setting(
	State(app): State<App>,
	Path(id): Path<u64>,
	OptionalRequestId(req_id): OptionalRequestId,
	ApiJson(req): ApiJson<UpdateSettingRequest>,
) -> ClResult<(StatusCode, Json<ApiResponse<SettingView>>)> {
	info!(id = id, "PATCH /api/admin/settings/:id - Updating setting");

	let id = SettingId(id);
	if !app.settings.update(id, UpdateSetting::try_from(req)?).await? {
		return Err(Error::NotFound);
	}
	let setting = app.settings.find_or_fail(id).await?;

	let response = ApiResponse::new(SettingView::from(setting)).with_req_id(req_id);
	Ok((StatusCode::OK, Json(response)))
}

/// DELETE /api/admin/settings/{id} - Delete a setting (system settings are refused)
pub async fn delete_setting(
	State(app): State<App>,
	Path(id): Path<u64>,
) -> ClResult<StatusCode> {
	info!(id = id, "DELETE /api/admin/settings/:id - Deleting setting");

	if app.settings.delete(SettingId(id)).await? {
		Ok(StatusCode::NO_CONTENT)
	} else {
		Err(Error::NotFound)
	}
}

/// PUT /api/admin/settings - Store several values at once, all or nothing
pub async fn bulk_update(
	State(app): State<App>,
	OptionalRequestId(req_id): OptionalRequestId,
	ApiJson(req): ApiJson<BulkUpdateRequest>,
) -> ClResult<(StatusCode, Json<ApiResponse<BTreeMap<String, SettingValue>>>)> {
	info!(count = req.settings.len(), "PUT /api/admin/settings - Bulk update");

	let keys: Vec<String> = req.settings.keys().cloned().collect();
	app.settings.set_multiple(req.settings).await?;

	let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
	let values = app.settings.get_multiple(&keys).await?;

	let response = ApiResponse::new(values).with_req_id(req_id);
	Ok((StatusCode::OK, Json(response)))
}

/// POST /api/admin/settings/cache/flush - Drop the cached values
pub async fn flush_cache(State(app): State<App>) -> StatusCode {
	info!("POST /api/admin/settings/cache/flush - Flushing settings cache");
	app.settings.flush_cache();
	StatusCode::NO_CONTENT
}

// vim: ts=4
