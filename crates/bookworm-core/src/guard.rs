//! Route gating and request guards
//!
//! [`guard`] decides whether a screen needs a signed-in viewer. It is a
//! presentation gate only; the API enforces access on every request.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::models::Session;

/// Screens of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Catalog,
    BookDetail,
    Login,
    Register,
    Profile,
    EditProfile,
    ChangePassword,
    Authors,
    Publishers,
    Borrowings,
    Dashboard,
}

impl Route {
    pub fn requires_session(&self) -> bool {
        !matches!(
            self,
            Route::Home | Route::Catalog | Route::BookDetail | Route::Login | Route::Register
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Catalog => "catalog",
            Route::BookDetail => "book-detail",
            Route::Login => "login",
            Route::Register => "register",
            Route::Profile => "profile",
            Route::EditProfile => "edit-profile",
            Route::ChangePassword => "change-password",
            Route::Authors => "authors",
            Route::Publishers => "publishers",
            Route::Borrowings => "borrowings",
            Route::Dashboard => "dashboard",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
}

pub fn guard(route: Route, session: Option<&Session>) -> GuardDecision {
    if route.requires_session() && session.is_none() {
        log::debug!("[guard] {} requires a session", route);
        GuardDecision::RedirectToLogin
    } else {
        GuardDecision::Allow
    }
}

/// Busy flag for a control that must not fire twice concurrently
#[derive(Debug, Default)]
pub struct InFlight {
    busy: AtomicBool,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while another request holds the flag.
    pub fn try_begin(&self) -> Option<InFlightToken<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightToken { flag: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the flag when dropped
#[derive(Debug)]
pub struct InFlightToken<'a> {
    flag: &'a InFlight,
}

impl Drop for InFlightToken<'_> {
    fn drop(&mut self) {
        self.flag.busy.store(false, Ordering::Release);
    }
}

/// Issues tickets so that only the response to the newest request is applied
#[derive(Debug, Default)]
pub struct Generation {
    current: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request; every earlier ticket becomes stale.
    pub fn next(&self) -> Ticket {
        Ticket(self.current.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current.load(Ordering::Acquire) == ticket.0
    }
}
