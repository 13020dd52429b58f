//! Per-item results of a batched borrowing request

use crate::error::{Error, Result};
use crate::models::{Borrowing, InitiateBorrowingResponse, StatusUpdateResponse};

/// Message for an id the server neither confirmed nor rejected
pub const UNREPORTED: &str = "no result reported";

const UNSPECIFIED_FAILURE: &str = "request failed";

#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// The record as the server now reports it
    Updated(Borrowing),
    Failed(String),
}

impl ItemOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, ItemOutcome::Updated(_))
    }
}

/// Exactly one outcome per requested id, in request order
///
/// Ids are borrowing ids for a status change and book ids for a new borrow.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchOutcome {
    items: Vec<(i64, ItemOutcome)>,
}

impl BatchOutcome {
    /// Pair server results with the requested ids.
    ///
    /// Duplicate ids collapse to their first occurrence; results for ids that
    /// were never requested are dropped.
    pub fn from_results(
        requested: &[i64],
        successes: Vec<(i64, Borrowing)>,
        errors: Vec<(i64, Option<String>)>,
    ) -> Self {
        let mut items: Vec<(i64, Option<ItemOutcome>)> = Vec::with_capacity(requested.len());
        for id in requested {
            if !items.iter().any(|(seen, _)| seen == id) {
                items.push((*id, None));
            }
        }

        for (id, record) in successes {
            match items.iter_mut().find(|(requested_id, _)| *requested_id == id) {
                Some((_, slot)) => *slot = Some(ItemOutcome::Updated(record)),
                None => log::warn!("[workflow] Ignoring result for unrequested id {}", id),
            }
        }

        // An explicit error wins over a success reported for the same id.
        for (id, message) in errors {
            match items.iter_mut().find(|(requested_id, _)| *requested_id == id) {
                Some((_, slot)) => {
                    let message = message
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| UNSPECIFIED_FAILURE.to_string());
                    *slot = Some(ItemOutcome::Failed(message));
                }
                None => log::warn!("[workflow] Ignoring error for unrequested id {}", id),
            }
        }

        let items = items
            .into_iter()
            .map(|(id, slot)| {
                (
                    id,
                    slot.unwrap_or_else(|| ItemOutcome::Failed(UNREPORTED.to_string())),
                )
            })
            .collect();
        Self { items }
    }

    /// Outcome of a status change, keyed by borrowing id
    pub fn from_status_response(requested: &[i64], response: StatusUpdateResponse) -> Self {
        let successes = response.success.into_iter().map(|b| (b.id, b)).collect();
        let errors = response
            .errors
            .into_iter()
            .map(|e| (e.borrowing_id, e.message))
            .collect();
        Self::from_results(requested, successes, errors)
    }

    /// Outcome of a borrow request, keyed by book id
    pub fn from_initiate_response(requested: &[i64], response: InitiateBorrowingResponse) -> Self {
        let successes = response.success.into_iter().map(|b| (b.book.id, b)).collect();
        let errors = response
            .errors
            .into_iter()
            .map(|e| (e.book_id, e.message))
            .collect();
        Self::from_results(requested, successes, errors)
    }

    pub fn items(&self) -> &[(i64, ItemOutcome)] {
        &self.items
    }

    pub fn get(&self, id: i64) -> Option<&ItemOutcome> {
        self.items
            .iter()
            .find(|(item_id, _)| *item_id == id)
            .map(|(_, outcome)| outcome)
    }

    pub fn updated(&self) -> impl Iterator<Item = &Borrowing> {
        self.items.iter().filter_map(|(_, outcome)| match outcome {
            ItemOutcome::Updated(record) => Some(record),
            ItemOutcome::Failed(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (i64, &str)> {
        self.items.iter().filter_map(|(id, outcome)| match outcome {
            ItemOutcome::Failed(message) => Some((*id, message.as_str())),
            ItemOutcome::Updated(_) => None,
        })
    }

    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|(_, o)| o.is_updated()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `Error::PartialBatch` when any item failed
    pub fn ensure_complete(&self) -> Result<()> {
        match self.failed() {
            0 => Ok(()),
            failed => Err(Error::PartialBatch {
                succeeded: self.succeeded(),
                failed,
            }),
        }
    }
}
