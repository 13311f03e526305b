//! Shared utilities for the SQLite adapter
//!
//! Helper macros and error mapping used by the query modules.

use tabula::prelude::*;

/// Applies a Patch field to an UPDATE query, converting the value before binding
/// Returns true if the field was added (for tracking has_updates)
macro_rules! push_patch {
	($query:expr, $has_updates:expr, $field:literal, $patch:expr, |$v:ident| $convert:expr) => {{
		match $patch {
			Patch::Undefined => $has_updates,
			Patch::Null => {
				if $has_updates {
					$query.push(", ");
				}
				$query.push(concat!($field, "=NULL"));
				true
			}
			Patch::Value($v) => {
				if $has_updates {
					$query.push(", ");
				}
				$query.push(concat!($field, "=")).push_bind($convert);
				true
			}
		}
	}};
}

pub(crate) use push_patch;

/// Log database error for debugging
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Translates a failed write into a ClResult error
///
/// Constraint violations on the settings table concern the key, so they are
/// reported as field-level validation errors rather than store failures.
pub(crate) fn map_write_err(err: sqlx::Error) -> Error {
	if let sqlx::Error::Database(db_err) = &err {
		if db_err.is_unique_violation() {
			return Error::field("key", "has already been taken");
		}
		if db_err.is_check_violation() {
			return Error::field("key", "must be between 1 and 255 characters");
		}
	}
	inspect(&err);
	Error::DbError
}

/// Collect an iterator of row mapping results, translating errors
pub(crate) fn collect_res<T>(
	iter: impl Iterator<Item = Result<T, sqlx::Error>> + Unpin,
) -> ClResult<Vec<T>> {
	let mut items = Vec::new();
	for item in iter {
		items.push(item.inspect_err(inspect).map_err(|_| Error::DbError)?);
	}
	Ok(items)
}

/// Store ids are sqlite integers
pub(crate) fn db_id(id: SettingId) -> i64 {
	i64::try_from(id.0).unwrap_or(i64::MAX)
}

// vim: ts=4
