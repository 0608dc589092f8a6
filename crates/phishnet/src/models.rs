// SPDX-License-Identifier: GPL-3.0-or-later

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::date::serde_date;

/// Standard success envelope returned by every endpoint.
///
/// `error_code` and `error_message` are carried through as-is. Success is
/// decided by the HTTP status alone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub error_code: i64,
    #[serde(default)]
    pub error_message: Option<String>,
    pub response: Option<ResponseBody<T>>,
}

impl<T> ApiResponse<T> {
    /// Number of records reported by the server, zero when the payload is absent.
    pub fn count(&self) -> u64 {
        self.response.as_ref().map_or(0, |body| body.count)
    }

    /// Records in the payload, empty when the payload is absent.
    pub fn data(&self) -> &[T] {
        self.response
            .as_ref()
            .map_or(&[][..], |body| body.data.as_slice())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseBody<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Error envelope returned alongside any non-200 status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    #[serde(rename = "error")]
    pub code: i64,
    #[serde(default)]
    pub response: Option<ErrorResponseBody>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponseBody {
    #[serde(default)]
    pub message: String,
    /// Additional context supplied by the server.
    #[serde(default)]
    pub body: HashMap<String, Value>,
}

impl ErrorResponse {
    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn message(&self) -> &str {
        self.response
            .as_ref()
            .map_or("", |body| body.message.as_str())
    }

    pub fn context(&self) -> Option<&HashMap<String, Value>> {
        self.response.as_ref().map(|body| &body.body)
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error {}: {}", self.code, self.message())
    }
}

impl std::error::Error for ErrorResponse {}

/// Ordering accepted by query endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Filters for `shows/query`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ShowsQueryRequest {
    #[serde(rename = "showids", skip_serializing_if = "Vec::is_empty")]
    pub show_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(rename = "venueid", skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<i64>,
    #[serde(rename = "tourid", skip_serializing_if = "Option::is_none")]
    pub tour_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(with = "serde_date::option", skip_serializing_if = "Option::is_none")]
    pub showdate_gt: Option<NaiveDate>,
    #[serde(with = "serde_date::option", skip_serializing_if = "Option::is_none")]
    pub showdate_gte: Option<NaiveDate>,
    #[serde(with = "serde_date::option", skip_serializing_if = "Option::is_none")]
    pub showdate_lt: Option<NaiveDate>,
    #[serde(with = "serde_date::option", skip_serializing_if = "Option::is_none")]
    pub showdate_lte: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showyear_gt: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showyear_gte: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showyear_lt: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showyear_lte: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

/// A show as returned by `shows/query`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Show {
    #[serde(rename = "showid")]
    pub show_id: i64,
    #[serde(with = "serde_date")]
    pub showdate: NaiveDate,
    #[serde(rename = "artistid", default)]
    pub artist_id: i64,
    #[serde(default)]
    pub billed_as: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub setlistnotes: String,
    #[serde(rename = "venueid", default)]
    pub venue_id: i64,
    #[serde(rename = "tourid", default)]
    pub tour_id: i64,
    #[serde(default)]
    pub tourname: String,
    #[serde(default)]
    pub tour_when: String,
    #[serde(default)]
    pub artistlink: String,
}

pub type ShowsQueryResponse = ApiResponse<Show>;

/// Lookup for `setlists/get`, by show id or by date.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SetlistsGetRequest {
    #[serde(rename = "showid", skip_serializing_if = "Option::is_none")]
    pub show_id: Option<i64>,
    #[serde(with = "serde_date::option", skip_serializing_if = "Option::is_none")]
    pub showdate: Option<NaiveDate>,
}

impl SetlistsGetRequest {
    pub fn by_show_id(show_id: i64) -> Self {
        Self {
            show_id: Some(show_id),
            ..Self::default()
        }
    }

    pub fn by_date(showdate: NaiveDate) -> Self {
        Self {
            showdate: Some(showdate),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SetlistsRecentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl SetlistsRecentRequest {
    pub fn new(limit: u32) -> Self {
        Self { limit: Some(limit) }
    }
}

/// A setlist as returned by the `setlists/*` endpoints.
///
/// `artist`, `venue` and `setlistdata` hold HTML fragments exactly as served.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Setlist {
    #[serde(rename = "showid")]
    pub show_id: i64,
    #[serde(with = "serde_date")]
    pub showdate: NaiveDate,
    #[serde(default)]
    pub short_date: String,
    #[serde(default)]
    pub long_date: String,
    #[serde(default)]
    pub relative_date: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub gapchart: String,
    #[serde(default)]
    pub artist: String,
    #[serde(rename = "artistid", default)]
    pub artist_id: i64,
    #[serde(rename = "venueid", default)]
    pub venue_id: i64,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub setlistdata: String,
    #[serde(default)]
    pub setlistnotes: String,
    #[serde(default)]
    pub rating: String,
}

pub type SetlistsResponse = ApiResponse<Setlist>;
