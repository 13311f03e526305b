use std::{env, path, sync::Arc};

use tabula::prelude::*;
use tabula::{AppBuilder, SettingsConfig, TokenAdminGuard, TracingAuditSink};
use tabula_store_adapter_sqlite::StoreAdapterSqlite;

pub struct Config {
	pub listen: String,
	pub db_dir: path::PathBuf,
	pub admin_token: String,
	pub cache_enabled: bool,
}

impl Config {
	fn from_env() -> ClResult<Self> {
		Ok(Config {
			listen: env::var("LISTEN").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
			db_dir: path::PathBuf::from(env::var("DB_DIR").unwrap_or_else(|_| "./data".to_string())),
			admin_token: env::var("ADMIN_TOKEN")
				.map_err(|_| Error::ConfigError("ADMIN_TOKEN is not set".into()))?,
			cache_enabled: env::var("SETTINGS_CACHE")
				.map(|v| !matches!(v.trim(), "0" | "false" | "off" | "no"))
				.unwrap_or(true),
		})
	}
}

#[tokio::main]
async fn main() -> ClResult<()> {
	let config = Config::from_env()?;

	let store_adapter = Arc::new(StoreAdapterSqlite::new(&config.db_dir).await?);
	let admin_guard = Arc::new(TokenAdminGuard::new(config.admin_token)?);

	let mut builder = AppBuilder::new();
	builder
		.listen(config.listen)
		.settings_config(SettingsConfig {
			cache_enabled: config.cache_enabled,
			..SettingsConfig::default()
		})
		.store_adapter(store_adapter)
		.audit_sink(Arc::new(TracingAuditSink))
		.admin_guard(admin_guard);

	builder.run().await
}

// vim: ts=4
