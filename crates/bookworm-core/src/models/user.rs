use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::flexible_datetime;
use crate::transport::Upload;

/// Viewer role as reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    User,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::User => write!(f, "User"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sex::Male => write!(f, "Male"),
            Sex::Female => write!(f, "Female"),
        }
    }
}

impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => Err(format!("Unknown sex: {}", s)),
        }
    }
}

/// Body returned by login, register and change-password
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: i64,
    #[serde(default)]
    pub user_name: Option<String>,
    pub user_role: Role,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

/// An authenticated session.
///
/// Unlike [`AuthResponse`] the token is not optional: a `Session` only
/// exists while the client holds a usable token. It serializes to the same
/// JSON shape as the auth response, which is what the `user` storage key
/// holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: i64,
    pub user_name: Option<String>,
    pub user_role: Role,
    pub image_url: Option<String>,
    pub access_token: String,
}

impl Session {
    /// Build a session from an auth response; `None` when it carries no token.
    pub fn from_response(response: AuthResponse) -> Option<Self> {
        let token = response.access_token.filter(|t| !t.trim().is_empty())?;
        Some(Self {
            user_id: response.user_id,
            user_name: response.user_name,
            user_role: response.user_role,
            image_url: response.image_url,
            access_token: token,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.user_role == Role::Admin
    }

    /// Name used in greetings
    pub fn display_name(&self) -> &str {
        self.user_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("User")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// User reference embedded in borrowings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimalUser {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
    pub user_role: Role,
}

/// Full user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    #[serde(default)]
    pub time_stamp: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub user_sex: Sex,
    #[serde(default)]
    pub credit: Option<f64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub user_role: Role,
    #[serde(with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Edit-profile form, sent as multipart
///
/// `time_stamp` is the concurrency token from the profile that was loaded
/// into the form.
#[derive(Debug, Clone, Validate)]
pub struct ProfileUpdate {
    pub id: i64,
    #[validate(required(
        message = "Profile has no concurrency token; reload it before editing"
    ))]
    pub time_stamp: Option<String>,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub sex: Sex,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    /// Admin only
    pub credit: Option<f64>,
    /// Admin only
    pub role: Option<Role>,
    pub image: Option<Upload>,
}

impl ProfileUpdate {
    /// Start an edit from the current profile, carrying its concurrency token.
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            time_stamp: profile.time_stamp.clone(),
            name: profile.name.clone().unwrap_or_default(),
            email: profile.email.clone().unwrap_or_default(),
            sex: profile.user_sex,
            bio: profile.bio.clone(),
            address: profile.address.clone(),
            phone: profile.phone.clone(),
            birth_date: profile.birth_date.clone(),
            credit: None,
            role: None,
            image: None,
        }
    }
}
