//! # bookworm-core
//!
//! Client logic for the Bookworm library API, shared by every front end.
//!
//! This crate provides:
//! - API transport and per-resource services (`transport`, `services`)
//! - Data models (`models` module)
//! - Session management (`session` module)
//! - The borrowing workflow (`workflow` module)
//! - Catalog queries, form validation and route guards
//! - Unified error handling (`error` module)

pub mod client;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod query;
pub mod services;
pub mod session;
pub mod storage;
pub mod transport;
pub mod validation;
pub mod workflow;

// Re-exports for convenience
pub use client::{DashboardSnapshot, LibraryClient, BATCH_BUSY, LOGIN_TO_BORROW};
pub use config::{ClientConfig, ConfigSource, LoadedConfig};
pub use error::{Error, Result};
pub use guard::{guard, GuardDecision, Route};
pub use query::{CatalogQuery, FilterField, SortField};
pub use session::{LogNotifier, Notification, Notifier, NotifyLevel, SessionManager};
pub use storage::{FileSessionStore, MemorySessionStore, SessionStore};
pub use validation::{ChangePasswordForm, RegisterForm};

// Re-export commonly used types from models
pub use models::{
    Author, BaseRef, Book, Borrowing, BorrowingAction, BorrowingStatus, Genre, LoginRequest,
    MinimalUser, ProfileUpdate, Publisher, Role, Session, Sex, UserProfile,
};

// Re-export commonly used types from workflow
pub use workflow::{
    book_actions, resolve_actions, resolve_for, ActionItem, ActionTone, BatchOutcome, BookAction,
    BorrowingBoard, ItemOutcome,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_version_format() {
        let v = version();
        // Should be semver format: x.y.z
        let parts: Vec<&str> = v.split('.').collect();
        assert_eq!(parts.len(), 3, "Version should be in x.y.z format");
    }
}
