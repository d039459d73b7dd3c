// ReadLog - Open Library Reading List Client
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Open Library catalog access
//!
//! Everything that knows about the catalog's JSON shapes lives here. The two
//! read endpoints return differently shaped payloads; both are normalized into
//! [`BookRecord`](crate::library::BookRecord) before leaving this module.
//!
//! - `client` - HTTP transport, configuration, retries
//! - `reading_log` - `/people/{user}/books/already-read.json`
//! - `search` - `/search.json?q=`
//! - `source` - the trait the store consumes

pub mod client;
pub mod reading_log;
pub mod search;
pub mod source;

// Re-export commonly used types
pub use client::{CatalogClient, CatalogConfig, CatalogConfigBuilder, READING_LOG_LIMIT};
pub use reading_log::{normalize_reading_log, ReadingLogResponse};
pub use search::{normalize_search, SearchOutcome, SearchResponse};
pub use source::CatalogSource;
