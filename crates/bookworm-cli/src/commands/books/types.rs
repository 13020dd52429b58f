//! Book command types

use std::path::PathBuf;

use bookworm_core::{Book, Genre, SortField};
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use crate::commands::helpers::{format_credit, format_date, or_dash, truncate};

#[derive(Subcommand)]
pub enum BooksAction {
    /// List books in the catalog
    List {
        /// Search by title
        #[arg(short, long)]
        search: Option<String>,

        /// Filter by genre (replaces a title search)
        #[arg(short, long)]
        genre: Option<Genre>,

        /// Sort by: title, created, credit
        #[arg(long, default_value = "title")]
        sort: SortField,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Page number
        #[arg(long)]
        page: Option<u32>,

        /// Page size
        #[arg(long, default_value = "100")]
        page_size: u32,
    },

    /// Show a book with its availability
    Show {
        /// Book ID
        id: i64,
    },

    /// Request to borrow one or more books
    Borrow {
        /// Book IDs
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Add a book to the catalog
    Add {
        /// Title
        #[arg(short, long)]
        title: String,

        /// Description
        #[arg(short = 'D', long)]
        description: Option<String>,

        /// Genre
        #[arg(short, long)]
        genre: Option<Genre>,

        /// Credit cost of one borrowing
        #[arg(short, long)]
        credit: Option<f64>,

        /// Total number of copies
        #[arg(long, default_value = "1")]
        copies: i64,

        /// Copies available now, defaults to all copies
        #[arg(long)]
        available: Option<i64>,

        /// Cover image file
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Update a book
    Update {
        /// Book ID
        id: i64,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short = 'D', long)]
        description: Option<String>,

        /// New genre
        #[arg(short, long)]
        genre: Option<Genre>,

        /// New credit cost
        #[arg(short, long)]
        credit: Option<f64>,

        /// Author IDs (repeatable, replaces the current list)
        #[arg(long = "author")]
        authors: Vec<i64>,

        /// Publisher IDs (repeatable, replaces the current list)
        #[arg(long = "publisher")]
        publishers: Vec<i64>,

        /// New total copies
        #[arg(long)]
        copies: Option<i64>,

        /// New available copies
        #[arg(long)]
        available: Option<i64>,
    },

    /// Delete a book
    Delete {
        /// Book ID
        id: i64,

        /// Skip the confirmation step
        #[arg(short, long)]
        force: bool,
    },
}

/// Book row for list display
#[derive(Debug, Serialize, Tabled)]
pub struct BookRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Genre")]
    pub genre: String,
    #[tabled(rename = "Authors")]
    pub authors: String,
    #[tabled(rename = "Credit")]
    pub credit: String,
    #[tabled(rename = "Available")]
    pub available: String,
}

impl From<Book> for BookRow {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: truncate(&book.title, 40),
            genre: book.genre.to_string(),
            authors: truncate(&book.author_names(), 30),
            credit: format_credit(book.credit),
            available: format!("{}/{}", book.available_copies, book.total_copies),
        }
    }
}

/// Full book view
#[derive(Debug, Serialize, Tabled)]
pub struct BookDetailRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Genre")]
    pub genre: String,
    #[tabled(rename = "Authors")]
    pub authors: String,
    #[tabled(rename = "Publishers")]
    pub publishers: String,
    #[tabled(rename = "Credit")]
    pub credit: String,
    #[tabled(rename = "Copies")]
    pub copies: i64,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Added")]
    pub added: String,
    #[tabled(rename = "Description")]
    pub description: String,
}

impl From<&Book> for BookDetailRow {
    fn from(book: &Book) -> Self {
        let publishers: Vec<&str> = book
            .publishers
            .iter()
            .filter_map(|p| p.name.as_deref())
            .collect();
        let status = if book.is_available() {
            format!("Available ({})", book.available_copies)
        } else {
            "Not available".to_string()
        };
        Self {
            id: book.id,
            title: book.title.clone(),
            genre: book.genre.to_string(),
            authors: book.author_names(),
            publishers: if publishers.is_empty() {
                "-".to_string()
            } else {
                publishers.join(", ")
            },
            credit: format_credit(book.credit),
            copies: book.total_copies,
            status,
            added: format_date(&book.created_at),
            description: truncate(&or_dash(book.description.as_deref()), 60),
        }
    }
}
