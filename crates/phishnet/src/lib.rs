// SPDX-License-Identifier: GPL-3.0-or-later

//! Phish.Net API client for show and setlist metadata.
//!
//! This crate provides a client for the Phish.Net v3 API with built-in,
//! per-client rate limiting (120 requests per minute by default), typed
//! request filters encoded as query parameters, and typed decoding of both
//! success and error envelopes.

pub mod client;
pub mod date;
pub mod error;
pub mod models;
pub mod query;
pub mod throttle;

pub use client::{PhishNetClient, PhishNetClientBuilder};
pub use date::{format_date, parse_date};
pub use error::{PhishNetError, Result};
pub use models::{
    ApiResponse, ErrorResponse, ErrorResponseBody, ResponseBody, Setlist, SetlistsGetRequest,
    SetlistsRecentRequest, SetlistsResponse, Show, ShowsQueryRequest, ShowsQueryResponse,
    SortOrder,
};
pub use throttle::{IntervalThrottle, Throttle, TickThrottle, DEFAULT_QUERY_RATE};
