//! Author commands

use anyhow::{Context as _, Result};
use bookworm_core::models::{AuthorCreateRequest, AuthorUpdateRequest};
use bookworm_core::{Author, BaseRef, CatalogQuery, FilterField, Route};
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use super::helpers::{format_date, or_dash, truncate};
use super::Context;
use crate::output::{print_error, print_output, print_single, print_success};

#[derive(Subcommand)]
pub enum AuthorsAction {
    /// List authors
    List {
        /// Search by name
        #[arg(short, long)]
        search: Option<String>,

        /// Page number
        #[arg(long)]
        page: Option<u32>,
    },

    /// Show an author
    Show {
        /// Author ID
        id: i64,
    },

    /// Add an author
    Add {
        /// Name
        #[arg(short, long)]
        name: String,

        /// Short biography
        #[arg(short, long)]
        bio: Option<String>,
    },

    /// Update an author
    Update {
        /// Author ID
        id: i64,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New biography
        #[arg(short, long)]
        bio: Option<String>,
    },

    /// Delete an author
    Delete {
        /// Author ID
        id: i64,

        /// Skip the confirmation step
        #[arg(short, long)]
        force: bool,
    },
}

/// Author row for display
#[derive(Debug, Serialize, Tabled)]
pub struct AuthorRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Bio")]
    pub bio: String,
    #[tabled(rename = "Added")]
    pub added: String,
}

impl From<Author> for AuthorRow {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: or_dash(author.name.as_deref()),
            bio: truncate(&or_dash(author.bio.as_deref()), 50),
            added: format_date(&author.created_at),
        }
    }
}

pub async fn execute(ctx: &Context, action: AuthorsAction) -> Result<()> {
    match action {
        AuthorsAction::List { search, page } => {
            ctx.gate(Route::Authors)?;
            let mut query = CatalogQuery::authors();
            if let Some(search) = search {
                query.set_filter(FilterField::Name, search);
            }
            if let Some(page) = page {
                query = query.with_page(page);
            }
            let authors = ctx
                .client
                .authors()
                .list(&query)
                .await
                .context("Failed to load authors")?;
            let rows: Vec<AuthorRow> = authors.into_iter().map(AuthorRow::from).collect();
            print_output(&rows, ctx.format)
        }
        AuthorsAction::Show { id } => {
            ctx.gate(Route::Authors)?;
            let author = load(ctx, id).await?;
            print_single(&AuthorRow::from(author), ctx.format)
        }
        AuthorsAction::Add { name, bio } => {
            ctx.admin(Route::Authors, "add authors")?;
            let request = AuthorCreateRequest { name, bio };
            let created = ctx
                .client
                .authors()
                .create(&request)
                .await
                .context("Failed to add author")?;
            match created {
                Some(author) => {
                    let id = author.id;
                    print_single(&AuthorRow::from(author), ctx.format)?;
                    print_success(&format!("Added author #{}", id), ctx.quiet);
                }
                None => print_success(&format!("Added author: {}", request.name), ctx.quiet),
            }
            Ok(())
        }
        AuthorsAction::Update { id, name, bio } => {
            ctx.admin(Route::Authors, "update authors")?;
            if name.is_none() && bio.is_none() {
                print_error("Nothing to update. Pass --name or --bio.");
                return Ok(());
            }
            let current = load(ctx, id).await?;
            let request = AuthorUpdateRequest {
                id,
                time_stamp: current.time_stamp,
                name,
                bio,
            };
            ctx.client
                .authors()
                .update(&request)
                .await
                .context("Failed to update author")?;
            print_success(&format!("Updated author #{}", id), ctx.quiet);
            Ok(())
        }
        AuthorsAction::Delete { id, force } => {
            ctx.admin(Route::Authors, "delete authors")?;
            let author = load(ctx, id).await?;
            if !force {
                print_single(&AuthorRow::from(author), ctx.format)?;
                print_error("Use --force to confirm deletion");
                return Ok(());
            }
            ctx.client
                .authors()
                .delete(&BaseRef::new(author.id, author.time_stamp))
                .await
                .context("Failed to delete author")?;
            print_success(&format!("Deleted author #{}", id), ctx.quiet);
            Ok(())
        }
    }
}

async fn load(ctx: &Context, id: i64) -> Result<Author> {
    ctx.client
        .authors()
        .get(id)
        .await
        .with_context(|| format!("Failed to load author {}", id))
}
