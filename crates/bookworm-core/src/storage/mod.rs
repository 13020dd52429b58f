//! Durable client storage
//!
//! A small string key/value store standing in for browser local storage.
//! The session manager writes it; the transport reads the token from it on
//! every request.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use crate::error::Result;

/// Key holding the raw access token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Key holding the serialized session user
pub const USER_KEY: &str = "user";

/// String key/value storage that survives restarts
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: SessionStore + ?Sized> SessionStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Stored access token, if any. Blank values count as absent.
pub fn read_access_token<S: SessionStore + ?Sized>(store: &S) -> Result<Option<String>> {
    Ok(store
        .get(ACCESS_TOKEN_KEY)?
        .filter(|token| !token.trim().is_empty()))
}
