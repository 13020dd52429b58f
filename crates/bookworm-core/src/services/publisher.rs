//! `/Publisher` endpoints

use std::sync::Arc;

use super::ResourceClient;
use crate::error::{Error, Result};
use crate::models::{BaseRef, Publisher, PublisherCreateRequest, PublisherUpdateRequest};
use crate::query::CatalogQuery;
use crate::transport::ApiTransport;

#[derive(Clone)]
pub struct PublisherService {
    resource: ResourceClient,
}

impl PublisherService {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            resource: ResourceClient::new(transport, "Publisher"),
        }
    }

    pub async fn list(&self, query: &CatalogQuery) -> Result<Vec<Publisher>> {
        self.resource.list(query).await
    }

    pub async fn get(&self, id: i64) -> Result<Publisher> {
        self.resource.get(id).await
    }

    pub async fn create(&self, request: &PublisherCreateRequest) -> Result<Option<Publisher>> {
        if request.name.trim().is_empty() {
            return Err(Error::validation("Name is required"));
        }
        self.resource.create(request).await
    }

    pub async fn update(&self, request: &PublisherUpdateRequest) -> Result<Option<Publisher>> {
        self.resource.update(request.id, request).await
    }

    pub async fn delete(&self, reference: &BaseRef) -> Result<()> {
        self.resource.delete(reference).await
    }
}
