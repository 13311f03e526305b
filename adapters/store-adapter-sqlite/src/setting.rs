//! Settings table queries
//!
//! Values are stored as raw text; the adapter never interprets them.

use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use tabula::prelude::*;
use tabula::setting::{FieldType, ListSettingOptions, NewSetting, Role, Setting, UpdateSettingData};
use tabula::store_adapter::ValueMap;

const SETTING_COLS: &str = "id, key, value, field_type, options, label, description, role, grp, \
	created_at, updated_at";

fn decode_err(msg: String) -> sqlx::Error {
	sqlx::Error::Decode(msg.into())
}

fn row_to_setting(row: &SqliteRow) -> Result<Setting, sqlx::Error> {
	let id: i64 = row.try_get("id")?;
	let field_type: String = row.try_get("field_type")?;
	let role: String = row.try_get("role")?;
	let options: Option<String> = row.try_get("options")?;

	let options = options
		.map(|s| serde_json::from_str::<Vec<serde_json::Value>>(&s))
		.transpose()
		.map_err(|e| decode_err(format!("invalid options json: {}", e)))?;

	Ok(Setting {
		id: SettingId(u64::try_from(id).map_err(|e| decode_err(e.to_string()))?),
		key: row.try_get::<String, _>("key")?.into(),
		value: row.try_get::<Option<String>, _>("value")?.map(Into::into),
		field_type: field_type
			.parse::<FieldType>()
			.map_err(|_| decode_err(format!("invalid field_type: {}", field_type)))?,
		options,
		label: row.try_get::<Option<String>, _>("label")?.map(Into::into),
		description: row.try_get::<Option<String>, _>("description")?.map(Into::into),
		role: role.parse::<Role>().map_err(|_| decode_err(format!("invalid role: {}", role)))?,
		group: row.try_get::<Option<String>, _>("grp")?.map(Into::into),
		created_at: Timestamp(row.try_get("created_at")?),
		updated_at: Timestamp(row.try_get("updated_at")?),
	})
}

fn options_json(options: &[serde_json::Value]) -> String {
	serde_json::Value::Array(options.to_vec()).to_string()
}

/// Appends the WHERE clause for a filter, except for `q`
fn push_filter<'a>(query: &mut QueryBuilder<'a, Sqlite>, opts: &'a ListSettingOptions) {
	query.push(" WHERE 1=1");
	if let Some(key) = &opts.key {
		query.push(" AND key=").push_bind(key.as_ref());
	}
	if let Some(role) = opts.role {
		query.push(" AND role=").push_bind(role.as_str());
	}
	if let Some(group) = &opts.group {
		query.push(" AND grp=").push_bind(group.as_ref());
	}
	if let Some(field_type) = opts.field_type {
		query.push(" AND field_type=").push_bind(field_type.as_str());
	}
}

/// Read a single setting by id
pub(crate) async fn read(db: &SqlitePool, id: SettingId) -> ClResult<Option<Setting>> {
	let row = sqlx::query(&format!("SELECT {} FROM settings WHERE id=?", SETTING_COLS))
		.bind(db_id(id))
		.fetch_optional(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	row.as_ref().map(row_to_setting).transpose().inspect_err(inspect).map_err(|_| Error::DbError)
}

/// Case-insensitive substring match over key, label, description and value
///
/// SQLite LIKE only folds ASCII, so the term is matched here with full Unicode lowercasing.
fn matches_term(setting: &Setting, term: &str) -> bool {
	[Some(&setting.key), setting.label.as_ref(), setting.description.as_ref(), setting.value.as_ref()]
		.into_iter()
		.flatten()
		.any(|field| field.to_lowercase().contains(term))
}

async fn fetch_filtered(
	db: &SqlitePool,
	opts: &ListSettingOptions,
	limit: Option<u32>,
	offset: Option<u32>,
) -> ClResult<Vec<Setting>> {
	let mut query = QueryBuilder::new(format!("SELECT {} FROM settings", SETTING_COLS));
	push_filter(&mut query, opts);
	query.push(" ORDER BY id");
	if let Some(limit) = limit {
		query.push(" LIMIT ").push_bind(i64::from(limit));
		if let Some(offset) = offset {
			query.push(" OFFSET ").push_bind(i64::from(offset));
		}
	} else if let Some(offset) = offset {
		query.push(" LIMIT -1 OFFSET ").push_bind(i64::from(offset));
	}

	let rows = query
		.build()
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	collect_res(rows.iter().map(row_to_setting))
}

/// Rows matching every filter including `q`, without limit or offset
async fn fetch_searched(db: &SqlitePool, opts: &ListSettingOptions, q: &str) -> ClResult<Vec<Setting>> {
	let term = q.to_lowercase();
	let mut settings = fetch_filtered(db, opts, None, None).await?;
	settings.retain(|setting| matches_term(setting, &term));
	Ok(settings)
}

/// List settings matching a filter
pub(crate) async fn list(db: &SqlitePool, opts: &ListSettingOptions) -> ClResult<Vec<Setting>> {
	let Some(q) = &opts.q else {
		return fetch_filtered(db, opts, opts.limit, opts.offset).await;
	};

	let offset = opts.offset.map_or(0, |o| usize::try_from(o).unwrap_or(usize::MAX));
	let limit = opts.limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
	Ok(fetch_searched(db, opts, q).await?.into_iter().skip(offset).take(limit).collect())
}

/// Count settings matching a filter
pub(crate) async fn count(db: &SqlitePool, opts: &ListSettingOptions) -> ClResult<u64> {
	if let Some(q) = &opts.q {
		let found = fetch_searched(db, opts, q).await?;
		return Ok(u64::try_from(found.len()).unwrap_or(u64::MAX));
	}

	let mut query = QueryBuilder::new("SELECT count(*) AS cnt FROM settings");
	push_filter(&mut query, opts);

	let row = query
		.build()
		.fetch_one(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;
	let cnt: i64 = row.try_get("cnt").inspect_err(inspect).map_err(|_| Error::DbError)?;

	Ok(u64::try_from(cnt).unwrap_or_default())
}

/// Read every key with its raw value
pub(crate) async fn list_values(db: &SqlitePool) -> ClResult<ValueMap> {
	let rows = sqlx::query("SELECT key, value FROM settings")
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	let mut values = ValueMap::with_capacity(rows.len());
	for row in rows {
		let key: String = row.try_get("key").inspect_err(inspect).map_err(|_| Error::DbError)?;
		let value: Option<String> =
			row.try_get("value").inspect_err(inspect).map_err(|_| Error::DbError)?;
		values.insert(key.into(), value.map(Into::into));
	}

	Ok(values)
}

/// Insert a new setting
pub(crate) async fn create(db: &SqlitePool, setting: &NewSetting) -> ClResult<Setting> {
	let row = sqlx::query(&format!(
		"INSERT INTO settings (key, value, field_type, options, label, description, role, grp)
		VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
		SETTING_COLS
	))
	.bind(setting.key.as_ref())
	.bind(setting.value.as_deref())
	.bind(setting.field_type.as_str())
	.bind(setting.options.as_deref().map(options_json))
	.bind(setting.label.as_deref())
	.bind(setting.description.as_deref())
	.bind(setting.role.as_str())
	.bind(setting.group.as_deref())
	.fetch_one(db)
	.await
	.map_err(map_write_err)?;

	row_to_setting(&row).inspect_err(inspect).map_err(|_| Error::DbError)
}

/// Update a setting, returns false if it does not exist
pub(crate) async fn update(
	db: &SqlitePool,
	id: SettingId,
	data: &UpdateSettingData,
) -> ClResult<bool> {
	let mut query = QueryBuilder::<Sqlite>::new("UPDATE settings SET ");
	let mut has_updates = false;

	has_updates = push_patch!(query, has_updates, "key", &data.key, |v| &**v);
	has_updates = push_patch!(query, has_updates, "value", &data.value, |v| &**v);
	has_updates =
		push_patch!(query, has_updates, "field_type", &data.field_type, |v| v.as_str());
	has_updates = push_patch!(query, has_updates, "options", &data.options, |v| options_json(v));
	has_updates = push_patch!(query, has_updates, "label", &data.label, |v| &**v);
	has_updates = push_patch!(query, has_updates, "description", &data.description, |v| &**v);
	has_updates = push_patch!(query, has_updates, "role", &data.role, |v| v.as_str());
	has_updates = push_patch!(query, has_updates, "grp", &data.group, |v| &**v);

	if has_updates {
		query.push(", ");
	}
	query.push("updated_at=unixepoch() WHERE id=").push_bind(db_id(id));

	let res = query.build().execute(db).await.map_err(map_write_err)?;

	Ok(res.rows_affected() > 0)
}

/// Delete a setting, returns false if it does not exist
pub(crate) async fn delete(db: &SqlitePool, id: SettingId) -> ClResult<bool> {
	let res = sqlx::query("DELETE FROM settings WHERE id=?")
		.bind(db_id(id))
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	Ok(res.rows_affected() > 0)
}

/// Upsert values by key, all or nothing
pub(crate) async fn write_values(
	db: &SqlitePool,
	values: &[(Box<str>, Option<Box<str>>)],
) -> ClResult<()> {
	let mut tx = db.begin().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	for (key, value) in values {
		sqlx::query(
			"INSERT INTO settings (key, value) VALUES (?1, ?2)
			ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=unixepoch()",
		)
		.bind(key.as_ref())
		.bind(value.as_deref())
		.execute(&mut *tx)
		.await
		.map_err(map_write_err)?;
	}

	tx.commit().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	Ok(())
}

// vim: ts=4
