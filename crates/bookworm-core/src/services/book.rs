//! `/Book` endpoints

use std::sync::Arc;

use super::{decode_optional, ResourceClient};
use crate::error::Result;
use crate::models::{BaseRef, Book, BookCreateRequest, BookUpdateRequest};
use crate::query::CatalogQuery;
use crate::transport::{ApiRequest, ApiTransport, MultipartForm};
use crate::validation::validate_book;

#[derive(Clone)]
pub struct BookService {
    resource: ResourceClient,
}

impl BookService {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            resource: ResourceClient::new(transport, "Book"),
        }
    }

    pub async fn list(&self, query: &CatalogQuery) -> Result<Vec<Book>> {
        self.resource.list(query).await
    }

    pub async fn get(&self, id: i64) -> Result<Book> {
        self.resource.get(id).await
    }

    /// Create a book from the multipart form. Validated before sending.
    pub async fn create(&self, request: BookCreateRequest) -> Result<Option<Book>> {
        validate_book(&request)?;
        log::info!("[books] Creating '{}'", request.title);

        let form = book_form(request);
        let value = self
            .resource
            .transport()
            .send(ApiRequest::post(self.resource.collection_path()).multipart(form))
            .await?;
        decode_optional(value)
    }

    pub async fn update(&self, request: &BookUpdateRequest) -> Result<Option<Book>> {
        self.resource.update(request.id, request).await
    }

    pub async fn delete(&self, reference: &BaseRef) -> Result<()> {
        log::info!("[books] Deleting book {}", reference.id);
        self.resource.delete(reference).await
    }
}

fn book_form(request: BookCreateRequest) -> MultipartForm {
    let form = MultipartForm::new()
        .text("Title", request.title)
        .text_opt("Description", request.description)
        .text_opt("BookGenre", request.genre.map(|g| g.as_str()))
        .text_opt("Credit", request.credit.map(|c| c.to_string()))
        .text("NumberOfTotalCopies", request.total_copies.to_string())
        .text("NumberOfAvailableCopies", request.available_copies.to_string());
    match request.image {
        Some(image) => form.file("Image", image),
        None => form,
    }
}
