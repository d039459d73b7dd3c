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

//! Which list is on screen
//!
//! The rule is a single comparison: an empty query shows the reading log,
//! anything else shows the search results. Whitespace counts as text.

use crate::library::models::{BookRecord, ListKind};
use crate::library::store::ReadingListState;

/// List selected by `query`
pub fn active_list_kind(query: &str) -> ListKind {
    if query.is_empty() {
        ListKind::ReadingLog
    } else {
        ListKind::SearchResults
    }
}

/// The list the display layer should render for `state`
pub fn active_list(state: &ReadingListState) -> &[BookRecord] {
    state.list(active_list_kind(&state.query))
}
