use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{flexible_datetime, null_as_default, Book, MinimalUser};

/// Lifecycle state of a borrowing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BorrowingStatus {
    Pending,
    Cancelled,
    Approved,
    Rejected,
    Borrowed,
    Returned,
}

impl BorrowingStatus {
    pub const ALL: [BorrowingStatus; 6] = [
        BorrowingStatus::Pending,
        BorrowingStatus::Cancelled,
        BorrowingStatus::Approved,
        BorrowingStatus::Rejected,
        BorrowingStatus::Borrowed,
        BorrowingStatus::Returned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowingStatus::Pending => "Pending",
            BorrowingStatus::Cancelled => "Cancelled",
            BorrowingStatus::Approved => "Approved",
            BorrowingStatus::Rejected => "Rejected",
            BorrowingStatus::Borrowed => "Borrowed",
            BorrowingStatus::Returned => "Returned",
        }
    }

    /// No action leads out of a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BorrowingStatus::Cancelled | BorrowingStatus::Rejected | BorrowingStatus::Returned
        )
    }
}

impl std::fmt::Display for BorrowingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BorrowingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BorrowingStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown borrowing status: {}", s))
    }
}

/// Action a client may request on a borrowing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BorrowingAction {
    Request,
    Confirm,
    Cancel,
    Approve,
    Reject,
    Return,
}

impl BorrowingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowingAction::Request => "Request",
            BorrowingAction::Confirm => "Confirm",
            BorrowingAction::Cancel => "Cancel",
            BorrowingAction::Approve => "Approve",
            BorrowingAction::Reject => "Reject",
            BorrowingAction::Return => "Return",
        }
    }
}

impl std::fmt::Display for BorrowingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BorrowingAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "request" => Ok(BorrowingAction::Request),
            "confirm" => Ok(BorrowingAction::Confirm),
            "cancel" => Ok(BorrowingAction::Cancel),
            "approve" => Ok(BorrowingAction::Approve),
            "reject" => Ok(BorrowingAction::Reject),
            "return" => Ok(BorrowingAction::Return),
            _ => Err(format!("Unknown borrowing action: {}", s)),
        }
    }
}

/// Snapshot of a borrowing as last reported by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Borrowing {
    pub id: i64,
    #[serde(default)]
    pub time_stamp: Option<String>,
    pub status: BorrowingStatus,
    #[serde(default, with = "flexible_datetime::option")]
    pub date_out: Option<DateTime<Utc>>,
    #[serde(default, with = "flexible_datetime::option")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "bookNavigation")]
    pub book: Book,
    #[serde(rename = "userNavigation")]
    pub borrower: MinimalUser,
    #[serde(rename = "approvedByNavigation", default)]
    pub approved_by: Option<MinimalUser>,
    #[serde(rename = "returnedByNavigation", default)]
    pub returned_by: Option<MinimalUser>,
    #[serde(rename = "rejectedByNavigation", default)]
    pub rejected_by: Option<MinimalUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateBorrowingRequest {
    pub book_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateBorrowingResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: Vec<Borrowing>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<BookBorrowError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookBorrowError {
    pub book_id: i64,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub action: BorrowingAction,
    pub borrowing_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: Vec<Borrowing>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<BorrowingError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowingError {
    pub borrowing_id: i64,
    #[serde(default)]
    pub message: Option<String>,
}
