//! Services module
//!
//! One thin service per API resource. Services only build requests and
//! decode responses; the API owns every business rule.

pub mod auth;
pub mod author;
pub mod book;
pub mod borrowing;
pub mod publisher;
pub mod user;

pub use auth::AuthService;
pub use author::AuthorService;
pub use book::BookService;
pub use borrowing::BorrowingService;
pub use publisher::PublisherService;
pub use user::UserService;

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;
use crate::models::BaseRef;
use crate::query::CatalogQuery;
use crate::transport::{send_as, ApiRequest, ApiTransport};

/// CRUD verbs against one `/{Resource}` collection
#[derive(Clone)]
pub struct ResourceClient {
    transport: Arc<dyn ApiTransport>,
    resource: &'static str,
}

impl ResourceClient {
    pub fn new(transport: Arc<dyn ApiTransport>, resource: &'static str) -> Self {
        Self { transport, resource }
    }

    pub fn transport(&self) -> &dyn ApiTransport {
        self.transport.as_ref()
    }

    pub fn collection_path(&self) -> String {
        format!("/{}", self.resource)
    }

    pub fn item_path(&self, id: i64) -> String {
        format!("/{}/{}", self.resource, id)
    }

    /// `GET /{Resource}`; a `null` body reads as an empty list.
    pub async fn list<T: DeserializeOwned>(&self, query: &CatalogQuery) -> Result<Vec<T>> {
        let request = ApiRequest::get(self.collection_path()).with_query(query.to_params());
        let value = self.transport.send(request).await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, id: i64) -> Result<T> {
        send_as(self.transport(), ApiRequest::get(self.item_path(id))).await
    }

    pub async fn create<B: Serialize, T: DeserializeOwned>(&self, body: &B) -> Result<Option<T>> {
        let request = ApiRequest::post(self.collection_path()).json(body)?;
        decode_optional(self.transport.send(request).await?)
    }

    pub async fn update<B: Serialize, T: DeserializeOwned>(
        &self,
        id: i64,
        body: &B,
    ) -> Result<Option<T>> {
        let request = ApiRequest::put(self.item_path(id)).json(body)?;
        decode_optional(self.transport.send(request).await?)
    }

    /// `DELETE /{Resource}/{id}` with the `{id, timeStamp}` reference as body
    pub async fn delete(&self, reference: &BaseRef) -> Result<()> {
        let request = ApiRequest::delete(self.item_path(reference.id)).json(reference)?;
        self.transport.send(request).await?;
        Ok(())
    }
}

/// Decode a body that may legitimately be empty or a plain-text message.
pub(crate) fn decode_optional<T: DeserializeOwned>(value: serde_json::Value) -> Result<Option<T>> {
    match value {
        serde_json::Value::Null | serde_json::Value::String(_) => Ok(None),
        other => Ok(Some(serde_json::from_value(other)?)),
    }
}
