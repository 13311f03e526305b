//! Database schema initialization
//!
//! Creates the settings table and its indexes if they do not exist yet.

use sqlx::SqlitePool;

/// Initialize the database schema with all required tables and indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Settings
	//**********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS settings (
		id integer PRIMARY KEY AUTOINCREMENT,
		key text NOT NULL UNIQUE CHECK (length(key) BETWEEN 1 AND 255),
		value text,
		field_type text NOT NULL DEFAULT 'input',
		options json,
		label text,
		description text,
		role text NOT NULL DEFAULT 'user',
		grp text,
		created_at integer NOT NULL DEFAULT (unixepoch()),
		updated_at integer NOT NULL DEFAULT (unixepoch())
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_settings_role ON settings(role)")
		.execute(&mut *tx)
		.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_settings_grp ON settings(grp)")
		.execute(&mut *tx)
		.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
