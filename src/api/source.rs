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

//! Seam between the store and the catalog
//!
//! [`ReadingListStore`](crate::library::ReadingListStore) talks to the catalog
//! only through [`CatalogSource`], so the store can be driven by
//! [`CatalogClient`] in production and by an in-memory source in tests.

use crate::api::client::CatalogClient;
use crate::error::Result;
use crate::library::models::BookRecord;
use async_trait::async_trait;

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Normalized already-read shelf for `user_id`, capped
    async fn fetch_reading_log(&self, user_id: &str) -> Result<Vec<BookRecord>>;

    /// Normalized search hits for `query`, in relevance order
    async fn search_by_title(&self, query: &str) -> Result<Vec<BookRecord>>;
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_reading_log(&self, user_id: &str) -> Result<Vec<BookRecord>> {
        CatalogClient::fetch_reading_log(self, user_id).await
    }

    async fn search_by_title(&self, query: &str) -> Result<Vec<BookRecord>> {
        CatalogClient::search_by_title(self, query).await
    }
}
