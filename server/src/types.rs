//! Response envelope used by every API handler

use serde::Serialize;
use serde_with::skip_serializing_none;

use tabula_types::setting::Page;

use crate::prelude::*;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
	pub page: u32,
	pub per_page: u32,
	pub total: u64,
	pub last_page: u32,
}

impl<T> From<&Page<T>> for Pagination {
	fn from(page: &Page<T>) -> Self {
		Self { page: page.page, per_page: page.per_page, total: page.total, last_page: page.last_page() }
	}
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
	pub data: T,
	pub pagination: Option<Pagination>,
	pub time: Timestamp,
	pub req_id: Option<String>,
}

impl<T> ApiResponse<T> {
	pub fn new(data: T) -> Self {
		Self { data, pagination: None, time: Timestamp::now(), req_id: None }
	}

	pub fn with_pagination(data: T, pagination: Pagination) -> Self {
		Self { pagination: Some(pagination), ..Self::new(data) }
	}

	pub fn with_req_id(mut self, req_id: Option<String>) -> Self {
		self.req_id = req_id;
		self
	}
}

impl<T> ApiResponse<Vec<T>> {
	/// Wraps a page of items, converting each one
	pub fn from_page<U>(page: Page<U>, f: impl FnMut(U) -> T) -> Self {
		let pagination = Pagination::from(&page);
		Self::with_pagination(page.map(f).items, pagination)
	}
}


// vim: ts=4
