//! Displayed borrowing rows
//!
//! Rows change only through server data: a full refresh, or records the
//! server returned for a batch. A failed item keeps its previous status and
//! carries an inline error instead.

use crate::guard::{Generation, Ticket};
use crate::models::{Borrowing, BorrowingStatus};

use super::outcome::{BatchOutcome, ItemOutcome};

#[derive(Debug, Clone, PartialEq)]
pub struct BoardRow {
    pub borrowing: Borrowing,
    /// Error from the last batch that touched this row
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct BorrowingBoard {
    rows: Vec<BoardRow>,
    generation: Generation,
    stale: bool,
}

impl BorrowingBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for a list request; only the newest one may replace the rows.
    pub fn begin_refresh(&self) -> Ticket {
        self.generation.next()
    }

    /// Replace every row with a fresh list. Returns `false`, leaving the
    /// board untouched, when a newer refresh has started since `ticket`.
    pub fn replace_all(&mut self, ticket: Ticket, borrowings: Vec<Borrowing>) -> bool {
        if !self.generation.is_current(ticket) {
            log::debug!("[board] Discarding stale borrowing list");
            return false;
        }
        self.rows = borrowings
            .into_iter()
            .map(|borrowing| BoardRow { borrowing, error: None })
            .collect();
        self.stale = false;
        true
    }

    /// Apply a batch result: successes take the server's record, failures
    /// keep their row and gain an error.
    pub fn apply_outcome(&mut self, outcome: &BatchOutcome) {
        for (id, item) in outcome.items() {
            let Some(row) = self.rows.iter_mut().find(|r| r.borrowing.id == *id) else {
                log::debug!("[board] Borrowing {} is not displayed", id);
                continue;
            };
            match item {
                ItemOutcome::Updated(record) => {
                    row.borrowing = record.clone();
                    row.error = None;
                }
                ItemOutcome::Failed(message) => {
                    row.error = Some(message.clone());
                }
            }
        }
        if outcome.succeeded() > 0 {
            self.stale = true;
        }
    }

    /// Put the batch's failure messages back on rows still displayed, so a
    /// refresh after a partial batch keeps showing why items failed.
    pub fn attach_errors(&mut self, outcome: &BatchOutcome) {
        for (id, message) in outcome.failures() {
            if let Some(row) = self.rows.iter_mut().find(|r| r.borrowing.id == id) {
                row.error = Some(message.to_string());
            }
        }
    }

    /// Set after a batch with any success; cleared by the next refresh
    pub fn needs_refresh(&self) -> bool {
        self.stale
    }

    pub fn rows(&self) -> &[BoardRow] {
        &self.rows
    }

    pub fn row(&self, id: i64) -> Option<&BoardRow> {
        self.rows.iter().find(|r| r.borrowing.id == id)
    }

    pub fn with_status(&self, status: BorrowingStatus) -> impl Iterator<Item = &BoardRow> {
        self.rows
            .iter()
            .filter(move |r| r.borrowing.status == status)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
