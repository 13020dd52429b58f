//! Session persistence over a [`SessionStore`]
//!
//! Two keys: `accessToken` holds the raw token, `user` the serialized
//! session. The token key is authoritative for requests; the user record
//! must agree with it.

use crate::error::{Error, Result};
use crate::models::Session;
use crate::storage::{read_access_token, SessionStore, ACCESS_TOKEN_KEY, USER_KEY};

pub fn save_session<S: SessionStore + ?Sized>(store: &S, session: &Session) -> Result<()> {
    let user = serde_json::to_string(session)?;
    store.set(ACCESS_TOKEN_KEY, &session.access_token)?;
    store.set(USER_KEY, &user)?;
    Ok(())
}

/// `Ok(None)` when nothing is stored; an error for a half-written or
/// inconsistent record.
pub fn restore_session<S: SessionStore + ?Sized>(store: &S) -> Result<Option<Session>> {
    let token = read_access_token(store)?;
    let user = store.get(USER_KEY)?.filter(|u| !u.trim().is_empty());

    match (token, user) {
        (None, None) => Ok(None),
        (Some(_), None) => Err(Error::storage("stored token has no user record")),
        (None, Some(_)) => Err(Error::storage("stored user record has no token")),
        (Some(token), Some(user)) => {
            let session: Session = serde_json::from_str(&user)
                .map_err(|e| Error::storage(format!("stored user record is malformed: {}", e)))?;
            if session.access_token != token {
                return Err(Error::storage("stored user record does not match the token"));
            }
            Ok(Some(session))
        }
    }
}

/// Remove both keys. Both removals are attempted; the first error is
/// returned.
pub fn clear_session<S: SessionStore + ?Sized>(store: &S) -> Result<()> {
    let token = store.remove(ACCESS_TOKEN_KEY);
    let user = store.remove(USER_KEY);
    token.and(user)
}
