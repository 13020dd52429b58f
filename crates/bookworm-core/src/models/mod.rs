//! Data models for the Bookworm API
//!
//! Wire types mirror the remote API's JSON (camelCase). Request types that
//! go out as multipart forms live next to the service that builds them.

mod borrowing;
mod catalog;
mod user;

pub use borrowing::{
    BookBorrowError, BorrowingAction, BorrowingError, Borrowing, BorrowingStatus,
    InitiateBorrowingRequest, InitiateBorrowingResponse, StatusUpdateRequest,
    StatusUpdateResponse,
};
pub use catalog::{
    Author, AuthorCreateRequest, AuthorUpdateRequest, Book, BookCreateRequest,
    BookUpdateRequest, Genre, Publisher, PublisherCreateRequest, PublisherUpdateRequest,
};
pub use user::{
    AuthResponse, ChangePasswordRequest, LoginRequest, MinimalUser, ProfileUpdate,
    RegisterRequest, Role, Session, Sex, UserProfile,
};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// `{id, timeStamp}` pair sent as the body of DELETE calls.
///
/// `timeStamp` is the server's concurrency token; it must be echoed back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseRef {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_stamp: Option<String>,
}

impl BaseRef {
    pub fn new(id: i64, time_stamp: Option<String>) -> Self {
        Self { id, time_stamp }
    }
}

/// Parse datetime string (supports RFC3339 and the zone-less formats the API emits)
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // RFC3339 (e.g., "2026-02-04T10:30:00Z")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    log::warn!("[models] Failed to parse datetime: {}", s);
    None
}

/// Serde adapter for timestamps that may or may not carry a zone.
pub(crate) mod flexible_datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_datetime(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid datetime: {}", raw)))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match dt {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = Option::<String>::deserialize(deserializer)?;
            match raw {
                None => Ok(None),
                Some(s) if s.trim().is_empty() => Ok(None),
                Some(s) => super::super::parse_datetime(&s)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid datetime: {}", s))),
            }
        }
    }
}

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
