//! Book commands
//!
//! Catalog browsing for everyone, borrowing for signed-in readers and
//! catalog maintenance for administrators.

mod mutations;
mod queries;
mod types;

use anyhow::Result;

use crate::commands::Context;

pub use types::{BookRow, BooksAction};

pub async fn execute(ctx: &Context, action: BooksAction) -> Result<()> {
    match action {
        BooksAction::List {
            search,
            genre,
            sort,
            desc,
            page,
            page_size,
        } => {
            let args = queries::ListArgs {
                search,
                genre,
                sort,
                desc,
                page,
                page_size,
            };
            queries::list_books(ctx, args).await
        }
        BooksAction::Show { id } => queries::show_book(ctx, id).await,
        BooksAction::Borrow { ids } => mutations::borrow_books(ctx, ids).await,
        BooksAction::Add {
            title,
            description,
            genre,
            credit,
            copies,
            available,
            image,
        } => {
            let args = mutations::AddArgs {
                title,
                description,
                genre,
                credit,
                copies,
                available,
                image,
            };
            mutations::add_book(ctx, args).await
        }
        BooksAction::Update {
            id,
            title,
            description,
            genre,
            credit,
            authors,
            publishers,
            copies,
            available,
        } => {
            let args = mutations::UpdateArgs {
                id,
                title,
                description,
                genre,
                credit,
                authors,
                publishers,
                copies,
                available,
            };
            mutations::update_book(ctx, args).await
        }
        BooksAction::Delete { id, force } => mutations::delete_book(ctx, id, force).await,
    }
}
