//! CLI commands module
//!
//! Contains all CLI command implementations.

pub mod auth;
pub mod authors;
pub mod books;
pub mod borrowings;
pub mod config;
pub mod dashboard;
pub mod helpers;
pub mod profile;
pub mod publishers;

use anyhow::{anyhow, Result};
use bookworm_core::{LibraryClient, LoadedConfig, Route, Session};

use crate::output::OutputFormat;

/// Shared context for all commands
pub struct Context {
    pub client: LibraryClient,
    pub config: LoadedConfig,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl Context {
    /// Refuse a command whose screen needs a signed-in viewer
    pub fn gate(&self, route: Route) -> Result<()> {
        if self.client.can_open(route) {
            Ok(())
        } else {
            log::debug!("[cli] Redirecting {} to login", route);
            Err(anyhow!(
                "Please log in to use {}. Run `bookworm auth login` first.",
                route
            ))
        }
    }

    /// The signed-in viewer, after passing the gate for `route`
    pub fn viewer(&self, route: Route) -> Result<Session> {
        self.gate(route)?;
        self.client
            .session()
            .current()
            .ok_or_else(|| anyhow!("Please log in first. Run `bookworm auth login`."))
    }

    /// Admin-only commands. The API enforces this too; the check just saves
    /// a round trip.
    pub fn admin(&self, route: Route, what: &str) -> Result<Session> {
        let viewer = self.viewer(route)?;
        if !viewer.is_admin() {
            return Err(anyhow!("Only administrators can {}", what));
        }
        Ok(viewer)
    }
}
