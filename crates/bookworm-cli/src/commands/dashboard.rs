//! Dashboard command
//!
//! Newest books, a few authors and publishers, and the latest borrowings,
//! loaded together.

use anyhow::{Context as _, Result};
use bookworm_core::{DashboardSnapshot, Role, Route};
use serde::Serialize;

use super::authors::AuthorRow;
use super::books::BookRow;
use super::borrowings::BorrowingRow;
use super::publishers::PublisherRow;
use super::Context;
use crate::output::{print_heading, print_output, OutputFormat};

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub recent_books: Vec<BookRow>,
    pub authors: Vec<AuthorRow>,
    pub publishers: Vec<PublisherRow>,
    pub recent_borrowings: Vec<BorrowingRow>,
}

impl DashboardView {
    pub fn new(snapshot: DashboardSnapshot, role: Role) -> Self {
        Self {
            recent_borrowings: snapshot
                .recent_borrowings
                .iter()
                .map(|b| BorrowingRow::for_viewer(b, role))
                .collect(),
            recent_books: snapshot.recent_books.into_iter().map(BookRow::from).collect(),
            authors: snapshot.authors.into_iter().map(AuthorRow::from).collect(),
            publishers: snapshot.publishers.into_iter().map(PublisherRow::from).collect(),
        }
    }
}

pub async fn execute(ctx: &Context) -> Result<()> {
    let viewer = ctx.viewer(Route::Dashboard)?;
    let snapshot = ctx
        .client
        .dashboard()
        .await
        .context("Failed to load dashboard")?;
    let view = DashboardView::new(snapshot, viewer.user_role);

    if ctx.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    print_heading("Recent books", ctx.format, ctx.quiet);
    print_output(&view.recent_books, ctx.format)?;
    print_heading("Authors", ctx.format, ctx.quiet);
    print_output(&view.authors, ctx.format)?;
    print_heading("Publishers", ctx.format, ctx.quiet);
    print_output(&view.publishers, ctx.format)?;
    print_heading("Recent borrowings", ctx.format, ctx.quiet);
    print_output(&view.recent_borrowings, ctx.format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_view_serializes_sections() {
        let snapshot = DashboardSnapshot {
            recent_books: Vec::new(),
            authors: Vec::new(),
            publishers: Vec::new(),
            recent_borrowings: Vec::new(),
        };
        let json = serde_json::to_value(DashboardView::new(snapshot, Role::User)).unwrap();
        for key in ["recent_books", "authors", "publishers", "recent_borrowings"] {
            assert!(json[key].as_array().unwrap().is_empty(), "{key}");
        }
    }
}
