//! Audit sink that writes setting changes to the log

use tabula_types::audit::{AuditEvent, AuditSink};

use crate::prelude::*;

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
	fn record(&self, event: &AuditEvent) {
		info!(
			target: "tabula::audit",
			action = ?event.action,
			setting_id = ?event.setting_id.map(|id| id.0),
			before = ?event.before,
			after = ?event.after,
			"Settings changed"
		);
	}
}

// vim: ts=4
