//! Library client
//!
//! Wires one transport, one session store and the session manager together
//! and hands out the per-resource services. Operations that depend on who
//! is signed in live here rather than in the stateless services.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::guard::{guard, GuardDecision, InFlight, Route};
use crate::models::{Author, Book, Borrowing, BorrowingAction, ProfileUpdate, Publisher, Session, UserProfile};
use crate::query::CatalogQuery;
use crate::services::{
    AuthorService, BookService, BorrowingService, PublisherService, UserService,
};
use crate::session::{Notifier, SessionManager};
use crate::storage::{FileSessionStore, SessionStore};
use crate::transport::{ApiTransport, HttpTransport};
use crate::workflow::{BatchOutcome, BorrowingBoard};

/// Shown when a signed-out viewer tries to borrow
pub const LOGIN_TO_BORROW: &str = "Please log in to borrow books";

/// Shown when a borrowing batch is sent while another is outstanding
pub const BATCH_BUSY: &str = "Another borrowing request is still in progress";

pub struct LibraryClient {
    session: SessionManager,
    books: BookService,
    authors: AuthorService,
    publishers: PublisherService,
    borrowings: BorrowingService,
    users: UserService,
    batch: InFlight,
}

/// Everything the dashboard shows
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub recent_books: Vec<Book>,
    pub authors: Vec<Author>,
    pub publishers: Vec<Publisher>,
    pub recent_borrowings: Vec<Borrowing>,
}

impl LibraryClient {
    /// HTTP transport plus a file-backed session store at the configured
    /// path.
    pub fn new(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let session_path = config.resolved_session_path()?;
        log::debug!("[client] Session file: {}", session_path.display());

        let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(session_path));
        let transport: Arc<dyn ApiTransport> = Arc::new(HttpTransport::new(config, store.clone())?);
        Ok(Self::from_parts(transport, store, notifier))
    }

    pub fn from_parts(
        transport: Arc<dyn ApiTransport>,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session: SessionManager::new(transport.clone(), store, notifier),
            books: BookService::new(transport.clone()),
            authors: AuthorService::new(transport.clone()),
            publishers: PublisherService::new(transport.clone()),
            borrowings: BorrowingService::new(transport.clone()),
            users: UserService::new(transport),
            batch: InFlight::new(),
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn books(&self) -> &BookService {
        &self.books
    }

    pub fn authors(&self) -> &AuthorService {
        &self.authors
    }

    pub fn publishers(&self) -> &PublisherService {
        &self.publishers
    }

    pub fn borrowings(&self) -> &BorrowingService {
        &self.borrowings
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }

    /// Whether the current viewer may open `route`
    pub fn can_open(&self, route: Route) -> bool {
        let session = self.session.current();
        guard(route, session.as_ref()) == GuardDecision::Allow
    }

    /// Request to borrow books. Refused before any request when signed out.
    pub async fn borrow_books(&self, book_ids: &[i64]) -> Result<BatchOutcome> {
        self.session.require(LOGIN_TO_BORROW)?;
        let _busy = self.batch.try_begin().ok_or_else(|| Error::validation(BATCH_BUSY))?;
        self.borrowings.initiate(book_ids).await
    }

    pub async fn my_profile(&self) -> Result<UserProfile> {
        let viewer = self.viewer()?;
        self.users.get(viewer.user_id).await
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<Option<UserProfile>> {
        let viewer = self.viewer()?;
        self.users.update_profile(update, &viewer).await
    }

    /// Reload the board. `Ok(false)` when a newer reload overtook this one.
    pub async fn refresh_board(&self, board: &mut BorrowingBoard, query: &CatalogQuery) -> Result<bool> {
        let ticket = board.begin_refresh();
        let rows = self.borrowings.list(query).await?;
        Ok(board.replace_all(ticket, rows))
    }

    /// Run a batch action, apply the confirmed records to the board, then
    /// reload it from the server if anything changed.
    pub async fn act_on_board(
        &self,
        board: &mut BorrowingBoard,
        query: &CatalogQuery,
        action: BorrowingAction,
        ids: &[i64],
    ) -> Result<BatchOutcome> {
        let _busy = self.batch.try_begin().ok_or_else(|| Error::validation(BATCH_BUSY))?;
        let outcome = self.borrowings.act_on_status(action, ids).await?;
        board.apply_outcome(&outcome);

        if board.needs_refresh() {
            match self.refresh_board(board, query).await {
                Ok(_) => board.attach_errors(&outcome),
                Err(e) => log::warn!("[client] Board refresh after {} failed: {}", action, e),
            }
        }
        Ok(outcome)
    }

    pub async fn dashboard(&self) -> Result<DashboardSnapshot> {
        let recent_books = CatalogQuery::recent_books();
        let people = CatalogQuery::recent_people();
        let recent_borrowings = CatalogQuery::recent_borrowings();

        let (recent_books, authors, publishers, recent_borrowings) = tokio::try_join!(
            self.books.list(&recent_books),
            self.authors.list(&people),
            self.publishers.list(&people),
            self.borrowings.list(&recent_borrowings),
        )?;

        Ok(DashboardSnapshot {
            recent_books,
            authors,
            publishers,
            recent_borrowings,
        })
    }

    fn viewer(&self) -> Result<Session> {
        self.session.require("Please log in to view your profile")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::{BorrowingStatus, Role};
    use crate::session::{save_session, RecordingNotifier};
    use crate::storage::MemorySessionStore;
    use crate::transport::mock::{fixtures, MockTransport};
    use reqwest::Method;
    use serde_json::json;

    async fn build(transport: MockTransport, signed_in: bool) -> (LibraryClient, Arc<MockTransport>) {
        let transport = Arc::new(transport);
        let store = Arc::new(MemorySessionStore::new());
        if signed_in {
            let session = Session {
                user_id: 7,
                user_name: Some("Ada".to_string()),
                user_role: Role::Admin,
                image_url: None,
                access_token: "tok".to_string(),
            };
            save_session(store.as_ref(), &session).unwrap();
        }
        let client = LibraryClient::from_parts(
            transport.clone(),
            store,
            Arc::new(RecordingNotifier::default()),
        );
        client.session().initialize().await;
        (client, transport)
    }

    #[tokio::test]
    async fn test_borrow_refused_when_signed_out() {
        let (client, transport) = build(MockTransport::new(), false).await;
        match client.borrow_books(&[1]).await {
            Err(Error::Authentication(msg)) => assert_eq!(msg, LOGIN_TO_BORROW),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_borrow_when_signed_in() {
        let mock = MockTransport::new().reply_json(
            Method::POST,
            "/Borrowing/initiate",
            json!({"success": [fixtures::borrowing(1, "Pending")], "errors": []}),
        );
        let (client, _) = build(mock, true).await;
        let outcome = client.borrow_books(&[101]).await.unwrap();
        assert_eq!(outcome.succeeded(), 1);
    }

    #[tokio::test]
    async fn test_batch_refused_while_one_is_outstanding() {
        let (client, transport) = build(MockTransport::new(), true).await;
        let busy = client.batch.try_begin().unwrap();

        assert!(matches!(client.borrow_books(&[1]).await, Err(Error::Validation(_))));
        let mut board = BorrowingBoard::new();
        let result = client
            .act_on_board(&mut board, &CatalogQuery::borrowings(), BorrowingAction::Cancel, &[1])
            .await;
        assert!(matches!(result, Err(Error::Validation(msg)) if msg == BATCH_BUSY));
        assert_eq!(transport.request_count(), 0);

        drop(busy);
        assert!(!client.batch.is_busy());
    }

    #[tokio::test]
    async fn test_route_gate_follows_session() {
        let (client, _) = build(MockTransport::new(), false).await;
        assert!(client.can_open(Route::Catalog));
        assert!(!client.can_open(Route::Borrowings));

        let (client, _) = client_signed_in().await;
        assert!(client.can_open(Route::Borrowings));
    }

    async fn client_signed_in() -> (LibraryClient, Arc<MockTransport>) {
        build(MockTransport::new(), true).await
    }

    #[tokio::test]
    async fn test_act_on_board_refreshes_after_success() {
        let mock = MockTransport::new()
            .reply_json(
                Method::GET,
                "/Borrowing",
                json!([fixtures::borrowing(1, "Pending"), fixtures::borrowing(2, "Pending")]),
            )
            .reply_json(
                Method::GET,
                "/Borrowing",
                json!([fixtures::borrowing(1, "Approved"), fixtures::borrowing(2, "Pending")]),
            )
            .reply_json(
                Method::PUT,
                "/Borrowing/act-on-borrowing-status",
                json!({
                    "success": [fixtures::borrowing(1, "Approved")],
                    "errors": [{"borrowingId": 2, "message": "Not enough copies"}]
                }),
            );
        let (client, transport) = build(mock, true).await;
        let query = CatalogQuery::borrowings();
        let mut board = BorrowingBoard::new();

        assert!(client.refresh_board(&mut board, &query).await.unwrap());
        let outcome = client
            .act_on_board(&mut board, &query, BorrowingAction::Approve, &[1, 2])
            .await
            .unwrap();

        assert_eq!(outcome.failed(), 1);
        assert_eq!(board.row(1).unwrap().borrowing.status, BorrowingStatus::Approved);
        assert_eq!(board.row(2).unwrap().borrowing.status, BorrowingStatus::Pending);
        assert_eq!(board.row(2).unwrap().error.as_deref(), Some("Not enough copies"));
        assert!(!board.needs_refresh());
        // list, batch, list
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn test_dashboard_uses_small_pages() {
        let mock = MockTransport::new()
            .reply_json(Method::GET, "/Book", json!([fixtures::book(1, 1)]))
            .reply_json(Method::GET, "/Author", json!([]))
            .reply_json(Method::GET, "/Publisher", json!([]))
            .reply_json(Method::GET, "/Borrowing", json!([fixtures::borrowing(3, "Borrowed")]));
        let (client, transport) = build(mock, true).await;

        let snapshot = client.dashboard().await.unwrap();
        assert_eq!(snapshot.recent_books.len(), 1);
        assert_eq!(snapshot.recent_borrowings.len(), 1);

        let book_query = transport
            .requests()
            .into_iter()
            .find(|r| r.path == "/Book")
            .unwrap()
            .query;
        assert!(book_query.contains(&("pageSize".to_string(), "5".to_string())));
        assert!(book_query.contains(&("sortBy".to_string(), "createdAt".to_string())));
    }

    #[tokio::test]
    async fn test_profile_requires_session() {
        let (client, transport) = build(MockTransport::new(), false).await;
        assert!(matches!(client.my_profile().await, Err(Error::Authentication(_))));
        assert_eq!(transport.request_count(), 0);
    }
}
