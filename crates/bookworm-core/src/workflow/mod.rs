//! Borrowing workflow
//!
//! - [`actions`]: which transitions a viewer may request
//! - [`outcome`]: per-item results of a batched request
//! - [`board`]: the displayed rows, updated only from server data

pub mod actions;
pub mod board;
pub mod outcome;

pub use actions::{
    book_actions, is_permitted, resolve_actions, resolve_for, ActionItem, ActionTone, BookAction,
};
pub use board::{BoardRow, BorrowingBoard};
pub use outcome::{BatchOutcome, ItemOutcome, UNREPORTED};
