use axum::{
	Router, middleware,
	routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::middleware::require_admin;
use crate::prelude::*;

fn init_admin(app: App) -> Router<App> {
	Router::new()
		.route(
			"/api/admin/settings",
			get(handler::list_settings).post(handler::create_setting).put(handler::bulk_update),
		)
		.route("/api/admin/settings/cache/flush", post(handler::flush_cache))
		.route(
			"/api/admin/settings/{id}",
			get(handler::get_setting).patch(handler::patch_setting).delete(handler::delete_setting),
		)
		.layer(middleware::from_fn_with_state(app, require_admin))
}

pub fn init(app: App) -> Router {
	Router::new()
		.route("/health", get(async || "ok\n"))
		.merge(init_admin(app.clone()))
		.layer(TraceLayer::new_for_http())
		.with_state(app)
}

// vim: ts=4
