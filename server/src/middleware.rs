//! Admin permission middleware

use axum::{
	extract::{Request, State},
	middleware::Next,
	response::Response,
};

use crate::prelude::*;

/// Lets the request through only if the admin guard accepts it
pub async fn require_admin(
	State(app): State<App>,
	req: Request,
	next: Next,
) -> Result<Response, Error> {
	let subject = match app.admin_guard.authorize(req.headers()).await {
		Ok(subject) => subject,
		Err(err) => {
			warn!(
				method = %req.method(),
				path = %req.uri().path(),
				"Admin permission denied"
			);
			return Err(err);
		}
	};
	debug!(subject = %subject, path = %req.uri().path(), "Admin request");

	Ok(next.run(req).await)
}

// vim: ts=4
