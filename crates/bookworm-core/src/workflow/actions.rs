//! Which borrowing actions a viewer may take

use crate::models::{Book, Borrowing, BorrowingAction, BorrowingStatus, Role};

/// Presentation hint for an action control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTone {
    Default,
    Outline,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionItem {
    pub label: &'static str,
    pub action: BorrowingAction,
    pub tone: ActionTone,
}

impl ActionItem {
    const fn new(label: &'static str, action: BorrowingAction, tone: ActionTone) -> Self {
        Self { label, action, tone }
    }
}

const CANCEL: ActionItem = ActionItem::new("Cancel", BorrowingAction::Cancel, ActionTone::Outline);
const CONFIRM: ActionItem = ActionItem::new("Confirm Receipt", BorrowingAction::Confirm, ActionTone::Default);
const APPROVE: ActionItem = ActionItem::new("Approve", BorrowingAction::Approve, ActionTone::Default);
const REJECT: ActionItem = ActionItem::new("Reject", BorrowingAction::Reject, ActionTone::Destructive);
const RETURN: ActionItem = ActionItem::new("Mark as Returned", BorrowingAction::Return, ActionTone::Default);

/// Actions offered for a borrowing in `status` to a viewer with `role`.
///
/// Terminal states offer nothing to anyone.
pub fn resolve_actions(status: BorrowingStatus, role: Role) -> Vec<ActionItem> {
    use BorrowingStatus::*;

    match (status, role) {
        (Pending, Role::User) => vec![CANCEL],
        (Pending, Role::Admin) => vec![APPROVE, REJECT],
        (Approved, Role::User) => vec![CONFIRM],
        (Approved, Role::Admin) => vec![REJECT],
        (Borrowed, Role::Admin) => vec![RETURN],
        (Borrowed, Role::User) => Vec::new(),
        (Cancelled | Rejected | Returned, _) => Vec::new(),
    }
}

pub fn resolve_for(borrowing: &Borrowing, role: Role) -> Vec<ActionItem> {
    resolve_actions(borrowing.status, role)
}

/// Whether `action` is offered for `status` to `role`
pub fn is_permitted(status: BorrowingStatus, role: Role, action: BorrowingAction) -> bool {
    resolve_actions(status, role)
        .iter()
        .any(|item| item.action == action)
}

/// Controls on a book's detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookAction {
    Borrow,
}

impl BookAction {
    pub fn label(&self) -> &'static str {
        match self {
            BookAction::Borrow => "Borrow",
        }
    }
}

/// Borrow is offered only while copies remain, signed in or not.
pub fn book_actions(book: &Book) -> Vec<BookAction> {
    if book.is_available() {
        vec![BookAction::Borrow]
    } else {
        Vec::new()
    }
}
