//! Optional audit-log collaborator

use serde::Serialize;
use std::{collections::BTreeMap, fmt::Debug};

use crate::types::SettingId;

/// Key -> raw stored value snapshot
pub type Snapshot = BTreeMap<Box<str>, Option<Box<str>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
	Create,
	Update,
	Delete,
	BulkUpdate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
	pub action: AuditAction,
	pub setting_id: Option<SettingId>,
	pub before: Snapshot,
	pub after: Snapshot,
}

/// Receives an event after every successful write
///
/// Fire-and-forget: implementations must not block and their failures are
/// never reported back to the writer.
pub trait AuditSink: Debug + Send + Sync {
	fn record(&self, event: &AuditEvent);
}

// vim: ts=4
