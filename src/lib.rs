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

//! ReadLog core
//!
//! Client-side logic for a reading list screen backed by Open Library:
//! fetch a user's already-read shelf, search the catalog by title, and keep
//! a per-session Read/Unread status for every listed book.

uniffi::setup_scaffolding!();

pub mod api;
pub mod error;
pub mod library;

pub use api::{CatalogClient, CatalogConfig, CatalogSource};
pub use error::{ReadLogError, Result};
pub use library::{BookRecord, ListKind, ReadStatus, ReadingListState, ReadingListStore};

/// Medium-size cover URL for a cover id, on the default covers host
#[uniffi::export]
pub fn cover_image_url(cover_image_id: i64) -> String {
    library::cover_url_for(library::models::DEFAULT_COVERS_BASE_URL, cover_image_id)
}

/// Which list the screen shows for the current search text
#[uniffi::export]
pub fn active_list_kind(query: String) -> ListKind {
    library::active_list_kind(&query)
}
