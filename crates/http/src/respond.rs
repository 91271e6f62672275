//! Uniform response envelopes for the shelf API.
//!
//! Every success response carries `{status, message, data}`; `data` is
//! omitted entirely when there is no payload.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

fn success<T: Serialize>(status: StatusCode, message: impl Into<String>, data: T) -> Response {
    (
        status,
        Json(Envelope {
            status: "success",
            message: message.into(),
            data: Some(data),
        }),
    )
        .into_response()
}

/// 200 success envelope.
pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> Response {
    success(StatusCode::OK, message, data)
}

/// 201 success envelope.
pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> Response {
    success(StatusCode::CREATED, message, data)
}

/// 204 with an empty body.
pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// One page of results plus pagination metadata and navigation links.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: u64,
    pub per_page: u64,
    pub last_page: u64,
    pub total: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub path: String,
    pub first_page_url: String,
    pub last_page_url: String,
    pub next_page_url: Option<String>,
    pub prev_page_url: Option<String>,
}

impl<T> Page<T> {
    /// Build a page envelope for an already-sliced set of items.
    ///
    /// `from`/`to` are 1-based positions within the full result set and are
    /// null for an empty page (e.g. a page past the end).
    pub fn new(data: Vec<T>, total: u64, current_page: u64, per_page: u64, path: &str) -> Self {
        let last_page = if total == 0 {
            1
        } else {
            total.div_ceil(per_page)
        };

        let from = if data.is_empty() {
            None
        } else {
            Some((current_page - 1) * per_page + 1)
        };
        let to = from.map(|start| start + data.len() as u64 - 1);

        let page_url = |page: u64| format!("{path}?page={page}");

        Self {
            first_page_url: page_url(1),
            last_page_url: page_url(last_page),
            next_page_url: (current_page < last_page).then(|| page_url(current_page + 1)),
            prev_page_url: (current_page > 1).then(|| page_url(current_page - 1)),
            path: path.to_string(),
            data,
            current_page,
            per_page,
            last_page,
            total,
            from,
            to,
        }
    }
}
