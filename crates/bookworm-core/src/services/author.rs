//! `/Author` endpoints

use std::sync::Arc;

use super::ResourceClient;
use crate::error::{Error, Result};
use crate::models::{Author, AuthorCreateRequest, AuthorUpdateRequest, BaseRef};
use crate::query::CatalogQuery;
use crate::transport::ApiTransport;

#[derive(Clone)]
pub struct AuthorService {
    resource: ResourceClient,
}

impl AuthorService {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            resource: ResourceClient::new(transport, "Author"),
        }
    }

    pub async fn list(&self, query: &CatalogQuery) -> Result<Vec<Author>> {
        self.resource.list(query).await
    }

    pub async fn get(&self, id: i64) -> Result<Author> {
        self.resource.get(id).await
    }

    pub async fn create(&self, request: &AuthorCreateRequest) -> Result<Option<Author>> {
        if request.name.trim().is_empty() {
            return Err(Error::validation("Name is required"));
        }
        self.resource.create(request).await
    }

    pub async fn update(&self, request: &AuthorUpdateRequest) -> Result<Option<Author>> {
        self.resource.update(request.id, request).await
    }

    pub async fn delete(&self, reference: &BaseRef) -> Result<()> {
        self.resource.delete(reference).await
    }
}
