//! Publisher commands

use anyhow::{Context as _, Result};
use bookworm_core::models::{PublisherCreateRequest, PublisherUpdateRequest};
use bookworm_core::{BaseRef, CatalogQuery, FilterField, Publisher, Route};
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use super::helpers::{format_date, or_dash, truncate};
use super::Context;
use crate::output::{print_error, print_output, print_single, print_success};

#[derive(Subcommand)]
pub enum PublishersAction {
    /// List publishers
    List {
        /// Search by name
        #[arg(short, long)]
        search: Option<String>,

        /// Page number
        #[arg(long)]
        page: Option<u32>,
    },

    /// Show a publisher
    Show {
        /// Publisher ID
        id: i64,
    },

    /// Add a publisher
    Add {
        /// Name
        #[arg(short, long)]
        name: String,

        /// Contact details
        #[arg(short, long)]
        contact: Option<String>,
    },

    /// Update a publisher
    Update {
        /// Publisher ID
        id: i64,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New contact details
        #[arg(short, long)]
        contact: Option<String>,
    },

    /// Delete a publisher
    Delete {
        /// Publisher ID
        id: i64,

        /// Skip the confirmation step
        #[arg(short, long)]
        force: bool,
    },
}

/// Publisher row for display
#[derive(Debug, Serialize, Tabled)]
pub struct PublisherRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Contact")]
    pub contact: String,
    #[tabled(rename = "Added")]
    pub added: String,
}

impl From<Publisher> for PublisherRow {
    fn from(publisher: Publisher) -> Self {
        Self {
            id: publisher.id,
            name: or_dash(publisher.name.as_deref()),
            contact: truncate(&or_dash(publisher.contact_info.as_deref()), 40),
            added: format_date(&publisher.created_at),
        }
    }
}

pub async fn execute(ctx: &Context, action: PublishersAction) -> Result<()> {
    match action {
        PublishersAction::List { search, page } => {
            ctx.gate(Route::Publishers)?;
            let mut query = CatalogQuery::publishers();
            if let Some(search) = search {
                query.set_filter(FilterField::Name, search);
            }
            if let Some(page) = page {
                query = query.with_page(page);
            }
            let publishers = ctx
                .client
                .publishers()
                .list(&query)
                .await
                .context("Failed to load publishers")?;
            let rows: Vec<PublisherRow> = publishers.into_iter().map(PublisherRow::from).collect();
            print_output(&rows, ctx.format)
        }
        PublishersAction::Show { id } => {
            ctx.gate(Route::Publishers)?;
            let publisher = load(ctx, id).await?;
            print_single(&PublisherRow::from(publisher), ctx.format)
        }
        PublishersAction::Add { name, contact } => {
            ctx.admin(Route::Publishers, "add publishers")?;
            let request = PublisherCreateRequest {
                name,
                contact_info: contact,
            };
            let created = ctx
                .client
                .publishers()
                .create(&request)
                .await
                .context("Failed to add publisher")?;
            match created {
                Some(publisher) => {
                    let id = publisher.id;
                    print_single(&PublisherRow::from(publisher), ctx.format)?;
                    print_success(&format!("Added publisher #{}", id), ctx.quiet);
                }
                None => print_success(&format!("Added publisher: {}", request.name), ctx.quiet),
            }
            Ok(())
        }
        PublishersAction::Update { id, name, contact } => {
            ctx.admin(Route::Publishers, "update publishers")?;
            if name.is_none() && contact.is_none() {
                print_error("Nothing to update. Pass --name or --contact.");
                return Ok(());
            }
            let current = load(ctx, id).await?;
            let request = PublisherUpdateRequest {
                id,
                time_stamp: current.time_stamp,
                name,
                contact_info: contact,
            };
            ctx.client
                .publishers()
                .update(&request)
                .await
                .context("Failed to update publisher")?;
            print_success(&format!("Updated publisher #{}", id), ctx.quiet);
            Ok(())
        }
        PublishersAction::Delete { id, force } => {
            ctx.admin(Route::Publishers, "delete publishers")?;
            let publisher = load(ctx, id).await?;
            if !force {
                print_single(&PublisherRow::from(publisher), ctx.format)?;
                print_error("Use --force to confirm deletion");
                return Ok(());
            }
            ctx.client
                .publishers()
                .delete(&BaseRef::new(publisher.id, publisher.time_stamp))
                .await
                .context("Failed to delete publisher")?;
            print_success(&format!("Deleted publisher #{}", id), ctx.quiet);
            Ok(())
        }
    }
}

async fn load(ctx: &Context, id: i64) -> Result<Publisher> {
    ctx.client
        .publishers()
        .get(id)
        .await
        .with_context(|| format!("Failed to load publisher {}", id))
}
