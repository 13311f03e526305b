//! Custom extractors

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::prelude::*;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

// RequestId //
//***********//
/// Request ID supplied by the client or a proxy, echoed back in responses
#[derive(Clone, Debug)]
pub struct OptionalRequestId(pub Option<String>);

impl<S> FromRequestParts<S> for OptionalRequestId
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let req_id = parts
			.headers
			.get(REQUEST_ID_HEADER)
			.and_then(|h| h.to_str().ok())
			.filter(|id| !id.is_empty())
			.map(ToString::to_string);
		Ok(OptionalRequestId(req_id))
	}
}

// ApiJson //
//*********//
/// JSON request body, rejections are reported as validation errors
#[derive(Clone, Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
	S: Send + Sync,
	T: DeserializeOwned,
{
	type Rejection = Error;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let Json(value) = Json::<T>::from_request(req, state).await?;
		Ok(ApiJson(value))
	}
}

// ApiQuery //
//**********//
/// Query string parameters, rejections are reported as validation errors
#[derive(Clone, Debug)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
	S: Send + Sync,
	T: DeserializeOwned,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		let Query(value) = Query::<T>::from_request_parts(parts, state)
			.await
			.map_err(|rejection| Error::field("query", rejection.body_text()))?;
		Ok(ApiQuery(value))
	}
}

// vim: ts=4
