use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{flexible_datetime, null_as_default};
use crate::transport::Upload;

/// Book genre, as accepted by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Fiction,
    NonFiction,
    Science,
    Fantasy,
    Biography,
    History,
    Mystery,
    Romance,
    ScienceFiction,
    Thriller,
    Horror,
    Poetry,
    Children,
    Comics,
    Art,
    Cooking,
    Health,
    Travel,
    Religion,
    SelfHelp,
}

impl Genre {
    pub const ALL: [Genre; 20] = [
        Genre::Fiction,
        Genre::NonFiction,
        Genre::Science,
        Genre::Fantasy,
        Genre::Biography,
        Genre::History,
        Genre::Mystery,
        Genre::Romance,
        Genre::ScienceFiction,
        Genre::Thriller,
        Genre::Horror,
        Genre::Poetry,
        Genre::Children,
        Genre::Comics,
        Genre::Art,
        Genre::Cooking,
        Genre::Health,
        Genre::Travel,
        Genre::Religion,
        Genre::SelfHelp,
    ];

    /// Wire name (also the value used in `filterQuery`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Fiction => "Fiction",
            Genre::NonFiction => "NonFiction",
            Genre::Science => "Science",
            Genre::Fantasy => "Fantasy",
            Genre::Biography => "Biography",
            Genre::History => "History",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::ScienceFiction => "ScienceFiction",
            Genre::Thriller => "Thriller",
            Genre::Horror => "Horror",
            Genre::Poetry => "Poetry",
            Genre::Children => "Children",
            Genre::Comics => "Comics",
            Genre::Art => "Art",
            Genre::Cooking => "Cooking",
            Genre::Health => "Health",
            Genre::Travel => "Travel",
            Genre::Religion => "Religion",
            Genre::SelfHelp => "SelfHelp",
        }
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Genre {
    type Err = String;

    /// Case-insensitive; ignores `-`, `_` and spaces ("non-fiction", "Self Help").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        Genre::ALL
            .iter()
            .copied()
            .find(|g| g.as_str().to_lowercase() == wanted)
            .ok_or_else(|| format!("Unknown genre: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: i64,
    #[serde(default)]
    pub time_stamp: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorCreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorUpdateRequest {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_stamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    pub id: i64,
    #[serde(default)]
    pub time_stamp: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublisherCreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublisherUpdateRequest {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_stamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
}

/// Catalog entry
///
/// Copy counts are whatever the server last reported; the client never
/// adjusts them itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    #[serde(default)]
    pub time_stamp: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "bookGenre")]
    pub genre: Genre,
    pub credit: f64,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<Author>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub publishers: Vec<Publisher>,
    #[serde(rename = "numberOfTotalCopies")]
    pub total_copies: i64,
    #[serde(rename = "numberOfAvailableCopies")]
    pub available_copies: i64,
    #[serde(with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Comma separated author names, "-" when none are linked
    pub fn author_names(&self) -> String {
        let names: Vec<&str> = self
            .authors
            .iter()
            .filter_map(|a| a.name.as_deref())
            .collect();
        if names.is_empty() {
            "-".to_string()
        } else {
            names.join(", ")
        }
    }
}

/// New-book form, sent as multipart
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "crate::validation::copies_fit", skip_on_field_errors = false))]
pub struct BookCreateRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub genre: Option<Genre>,
    #[validate(range(min = 0.0, message = "Credit cannot be negative"))]
    pub credit: Option<f64>,
    #[validate(range(min = 0, message = "Copy counts cannot be negative"))]
    pub total_copies: i64,
    #[validate(range(min = 0, message = "Copy counts cannot be negative"))]
    pub available_copies: i64,
    pub image: Option<Upload>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdateRequest {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_stamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "bookGenre", skip_serializing_if = "Option::is_none")]
    pub genre: Option<Genre>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publishers_ids: Option<Vec<i64>>,
    #[serde(rename = "numberOfTotalCopies", skip_serializing_if = "Option::is_none")]
    pub total_copies: Option<i64>,
    #[serde(rename = "numberOfAvailableCopies", skip_serializing_if = "Option::is_none")]
    pub available_copies: Option<i64>,
}
