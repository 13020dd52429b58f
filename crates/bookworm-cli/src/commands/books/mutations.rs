//! Book mutation commands

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use bookworm_core::config::expand_path;
use bookworm_core::models::{BookCreateRequest, BookUpdateRequest};
use bookworm_core::transport::Upload;
use bookworm_core::{BaseRef, Genre, Route};

use crate::commands::borrowings::report_outcome;
use crate::commands::Context;
use crate::output::{print_error, print_single, print_success};
use super::types::BookDetailRow;

pub async fn borrow_books(ctx: &Context, ids: Vec<i64>) -> Result<()> {
    let outcome = ctx.client.borrow_books(&ids).await?;
    report_outcome(ctx, &outcome, "Borrow request")
}

pub struct AddArgs {
    pub title: String,
    pub description: Option<String>,
    pub genre: Option<Genre>,
    pub credit: Option<f64>,
    pub copies: i64,
    pub available: Option<i64>,
    pub image: Option<PathBuf>,
}

pub async fn add_book(ctx: &Context, args: AddArgs) -> Result<()> {
    ctx.admin(Route::Dashboard, "add books")?;

    let image = match &args.image {
        Some(path) => {
            let path = expand_path(&path.to_string_lossy());
            Some(
                Upload::from_path(&path)
                    .with_context(|| format!("Failed to read image {}", path.display()))?,
            )
        }
        None => None,
    };

    let request = BookCreateRequest {
        title: args.title,
        description: args.description,
        genre: args.genre,
        credit: args.credit,
        total_copies: args.copies,
        available_copies: args.available.unwrap_or(args.copies),
        image,
    };
    let title = request.title.clone();

    match ctx
        .client
        .books()
        .create(request)
        .await
        .context("Failed to add book")?
    {
        Some(book) => {
            print_single(&BookDetailRow::from(&book), ctx.format)?;
            print_success(&format!("Added book #{}", book.id), ctx.quiet);
        }
        None => print_success(&format!("Added book: {}", title), ctx.quiet),
    }
    Ok(())
}

pub struct UpdateArgs {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<Genre>,
    pub credit: Option<f64>,
    pub authors: Vec<i64>,
    pub publishers: Vec<i64>,
    pub copies: Option<i64>,
    pub available: Option<i64>,
}

impl UpdateArgs {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.genre.is_none()
            && self.credit.is_none()
            && self.authors.is_empty()
            && self.publishers.is_empty()
            && self.copies.is_none()
            && self.available.is_none()
    }

    /// Only the given fields are sent; `time_stamp` echoes the server's token.
    fn into_request(self, time_stamp: Option<String>) -> BookUpdateRequest {
        BookUpdateRequest {
            id: self.id,
            time_stamp,
            title: self.title,
            description: self.description,
            genre: self.genre,
            credit: self.credit,
            authors_ids: (!self.authors.is_empty()).then_some(self.authors),
            publishers_ids: (!self.publishers.is_empty()).then_some(self.publishers),
            total_copies: self.copies,
            available_copies: self.available,
        }
    }
}

pub async fn update_book(ctx: &Context, args: UpdateArgs) -> Result<()> {
    ctx.admin(Route::Dashboard, "update books")?;
    if args.is_empty() {
        print_error("Nothing to update. Pass at least one field.");
        return Ok(());
    }

    let current = ctx
        .client
        .books()
        .get(args.id)
        .await
        .with_context(|| format!("Failed to load book {}", args.id))?;
    let request = args.into_request(current.time_stamp.clone());

    let updated = ctx
        .client
        .books()
        .update(&request)
        .await
        .context("Failed to update book")?;
    if let Some(book) = updated {
        print_single(&BookDetailRow::from(&book), ctx.format)?;
    }
    print_success(&format!("Updated book #{}", request.id), ctx.quiet);
    Ok(())
}

pub async fn delete_book(ctx: &Context, id: i64, force: bool) -> Result<()> {
    ctx.admin(Route::Dashboard, "delete books")?;
    let book = ctx
        .client
        .books()
        .get(id)
        .await
        .with_context(|| format!("Failed to load book {}", id))?;

    if !force {
        print_single(&BookDetailRow::from(&book), ctx.format)?;
        print_error("Use --force to confirm deletion");
        return Ok(());
    }

    ctx.client
        .books()
        .delete(&BaseRef::new(book.id, book.time_stamp.clone()))
        .await
        .context("Failed to delete book")?;
    print_success(&format!("Deleted book: {}", book.title), ctx.quiet);
    Ok(())
}
