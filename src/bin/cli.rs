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

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use readlog_core::library::{cover_url_for, BookRecord, ListKind};
use readlog_core::{CatalogConfig, CatalogSource, ReadingListStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "readlog-cli")]
#[command(about = "ReadLog CLI - Desktop testing tool", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Reading log owner (defaults to READLOG_USER_ID or mekBot)
    #[arg(long, global = true)]
    user_id: Option<String>,

    /// Catalog host (defaults to READLOG_BASE_URL or https://openlibrary.org)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the already-read shelf
    Log {
        /// Mark these positions as read before printing
        #[arg(short, long)]
        read: Vec<usize>,
    },
    /// Search the catalog by title
    Search {
        /// Free-text query
        query: String,

        /// Mark these positions as read before printing
        #[arg(short, long)]
        read: Vec<usize>,
    },
    /// Print the cover URL for a cover id
    Cover {
        /// Cover image id
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "readlog_cli=debug,readlog_core=debug"
    } else {
        "readlog_cli=info,readlog_core=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = CatalogConfig::from_env();
    if let Some(user_id) = cli.user_id {
        config.user_id = user_id;
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let covers_base_url = config.covers_base_url.clone();

    match cli.command {
        Commands::Log { read } => {
            let store = ReadingListStore::from_config(config).context("invalid configuration")?;
            store.load_initial().await.context("failed to load reading log")?;
            mark_read(&store, ListKind::ReadingLog, &read)?;
            print_books(&store.reading_log(), &covers_base_url);
        }
        Commands::Search { query, read } => {
            let store = ReadingListStore::from_config(config).context("invalid configuration")?;
            store.set_query(query);
            store.submit_search().await.context("search failed")?;
            mark_read(&store, ListKind::SearchResults, &read)?;
            print_books(&store.active_list(), &covers_base_url);
        }
        Commands::Cover { id } => {
            println!("{}", cover_url_for(&covers_base_url, id));
        }
    }

    Ok(())
}

fn mark_read<S: CatalogSource>(
    store: &ReadingListStore<S>,
    list: ListKind,
    positions: &[usize],
) -> Result<()> {
    for &index in positions {
        store
            .toggle_status(list, index)
            .with_context(|| format!("no book at position {}", index))?;
    }
    Ok(())
}

fn print_books(books: &[BookRecord], covers_base_url: &str) {
    if books.is_empty() {
        println!("(no books)");
        return;
    }

    for (index, book) in books.iter().enumerate() {
        let year = book
            .first_publish_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:>3}. [{}] {}", index, book.status, book.title);
        println!("     Author: {}", book.author_line());
        println!("     Published Year: {}", year);
        if let Some(url) = book.cover_url_with_base(covers_base_url) {
            println!("     Cover: {}", url);
        }
    }
}
