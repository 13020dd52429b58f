//! Borrowing command types

use bookworm_core::workflow::BoardRow;
use bookworm_core::{resolve_for, Borrowing, BorrowingAction, BorrowingStatus, ItemOutcome, Role};
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use crate::commands::helpers::{format_date, format_opt_date, or_dash, truncate};

#[derive(Subcommand)]
pub enum BorrowingsAction {
    /// List borrowings visible to you, with the actions you can take
    List {
        /// Only show this status (pending, approved, borrowed, ...)
        #[arg(short, long)]
        status: Option<BorrowingStatus>,

        /// Page number
        #[arg(long)]
        page: Option<u32>,

        /// Page size
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Show one borrowing
    Show {
        /// Borrowing ID
        id: i64,
    },

    /// Apply an action (cancel, confirm, approve, reject, return) to borrowings
    Act {
        /// Action to apply
        action: BorrowingAction,

        /// Borrowing IDs
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Delete a borrowing record
    Delete {
        /// Borrowing ID
        id: i64,

        /// Skip the confirmation step
        #[arg(short, long)]
        force: bool,
    },
}

/// Borrowing row for display
#[derive(Debug, Serialize, Tabled)]
pub struct BorrowingRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Book")]
    pub book: String,
    #[tabled(rename = "Borrower")]
    pub borrower: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Requested")]
    pub requested: String,
    #[tabled(rename = "Due")]
    pub due: String,
    #[tabled(rename = "Actions")]
    pub actions: String,
    #[tabled(rename = "Error")]
    pub error: String,
}

impl BorrowingRow {
    /// Row with the actions `role` may take on it
    pub fn for_viewer(borrowing: &Borrowing, role: Role) -> Self {
        let labels: Vec<&str> = resolve_for(borrowing, role)
            .iter()
            .map(|item| item.label)
            .collect();
        Self {
            id: borrowing.id,
            book: truncate(&borrowing.book.title, 32),
            borrower: or_dash(borrowing.borrower.name.as_deref()),
            status: borrowing.status.to_string(),
            requested: format_date(&borrowing.created_at),
            due: format_opt_date(borrowing.due_date.as_ref()),
            actions: if labels.is_empty() {
                "-".to_string()
            } else {
                labels.join(", ")
            },
            error: "-".to_string(),
        }
    }

    pub fn from_board(row: &BoardRow, role: Role) -> Self {
        let mut display = Self::for_viewer(&row.borrowing, role);
        if let Some(error) = &row.error {
            display.error = error.clone();
        }
        display
    }
}

/// Per-item result of a batch request
#[derive(Debug, Serialize, Tabled)]
pub struct OutcomeRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Result")]
    pub result: String,
    #[tabled(rename = "Detail")]
    pub detail: String,
}

impl From<(i64, &ItemOutcome)> for OutcomeRow {
    fn from((id, outcome): (i64, &ItemOutcome)) -> Self {
        match outcome {
            ItemOutcome::Updated(borrowing) => Self {
                id,
                result: "ok".to_string(),
                detail: format!("#{} {}", borrowing.id, borrowing.status),
            },
            ItemOutcome::Failed(message) => Self {
                id,
                result: "failed".to_string(),
                detail: message.clone(),
            },
        }
    }
}
