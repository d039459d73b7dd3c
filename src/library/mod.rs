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

//! Reading list model, session store and view selection
//!
//! - `models` - [`BookRecord`] and its enums
//! - `store` - [`ReadingListStore`], the per-session state owner
//! - `view` - which of the two lists is on screen

pub mod models;
pub mod store;
pub mod view;

pub use models::{cover_url_for, BookRecord, ListKind, ReadStatus, RecordSource};
pub use store::{ReadingListState, ReadingListStore};
pub use view::{active_list, active_list_kind};
