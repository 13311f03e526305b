//! SQLite implementation of the Tabula settings store
//!
//! The database lives in `settings.db` inside the directory passed to
//! [`StoreAdapterSqlite::new`]. The schema is created on first start.

#![forbid(unsafe_code)]

mod schema;
mod setting;
mod utils;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use tabula::prelude::*;
use tabula::setting::{ListSettingOptions, NewSetting, Setting, UpdateSettingData};
use tabula::store_adapter::{StoreAdapter, ValueMap};

#[derive(Debug)]
pub struct StoreAdapterSqlite {
	db: SqlitePool,
}

impl StoreAdapterSqlite {
	pub async fn new(path: impl AsRef<Path>) -> ClResult<Self> {
		tokio::fs::create_dir_all(path.as_ref()).await?;

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref().join("settings.db"))
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		info!("Settings store opened at {}", path.as_ref().display());
		Ok(Self { db })
	}

	/// Wraps an existing pool without touching the schema
	///
	/// Used when the host application manages migrations itself.
	pub fn from_pool(db: SqlitePool) -> Self {
		Self { db }
	}
}

#[async_trait]
impl StoreAdapter for StoreAdapterSqlite {
	async fn read_setting(&self, id: SettingId) -> ClResult<Option<Setting>> {
		setting::read(&self.db, id).await
	}

	async fn list_settings(&self, opts: &ListSettingOptions) -> ClResult<Vec<Setting>> {
		setting::list(&self.db, opts).await
	}

	async fn count_settings(&self, opts: &ListSettingOptions) -> ClResult<u64> {
		setting::count(&self.db, opts).await
	}

	async fn list_values(&self) -> ClResult<ValueMap> {
		setting::list_values(&self.db).await
	}

	async fn create_setting(&self, new_setting: &NewSetting) -> ClResult<Setting> {
		setting::create(&self.db, new_setting).await
	}

	async fn update_setting(&self, id: SettingId, data: &UpdateSettingData) -> ClResult<bool> {
		setting::update(&self.db, id, data).await
	}

	async fn delete_setting(&self, id: SettingId) -> ClResult<bool> {
		setting::delete(&self.db, id).await
	}

	async fn write_values(&self, values: &[(Box<str>, Option<Box<str>>)]) -> ClResult<()> {
		setting::write_values(&self.db, values).await
	}
}

// vim: ts=4
