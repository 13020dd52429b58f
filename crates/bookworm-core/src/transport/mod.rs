//! API transport
//!
//! Services describe a call as an [`ApiRequest`]; an [`ApiTransport`] sends
//! it and hands back the response body as JSON. The HTTP implementation
//! lives in [`http`]; tests use the mock in `mock`.

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

use std::path::Path;

use async_trait::async_trait;
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

pub use http::HttpTransport;

/// Sends requests to the remote API.
///
/// Implementations attach the bearer token (when one is stored) and return
/// the parsed body, `Value::Null` for an empty one. Non-success statuses
/// come back as errors from the taxonomy in [`crate::error`].
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<serde_json::Value>;
}

/// Send a request and decode the body into `T`.
pub async fn send_as<T, R>(transport: &T, request: ApiRequest) -> Result<R>
where
    T: ApiTransport + ?Sized,
    R: DeserializeOwned,
{
    let value = transport.send(request).await?;
    Ok(serde_json::from_value(value)?)
}

/// A transport-neutral description of one API call
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the versioned base URL, e.g. `/Book/3`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query(mut self, params: Vec<(String, String)>) -> Self {
        self.query = params;
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

/// Ordered multipart form fields
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    parts: Vec<(String, FormPart)>,
}

#[derive(Debug, Clone)]
pub enum FormPart {
    Text(String),
    File(Upload),
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts.push((name.to_string(), FormPart::Text(value.into())));
        self
    }

    /// Add a text field only when a value is present.
    pub fn text_opt(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.text(name, v),
            None => self,
        }
    }

    pub fn file(mut self, name: &str, upload: Upload) -> Self {
        self.parts.push((name.to_string(), FormPart::File(upload)));
        self
    }

    /// Drop every field with this name.
    pub fn remove(mut self, name: &str) -> Self {
        self.parts.retain(|(n, _)| n != name);
        self
    }

    /// First text value for a field
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(n, part)| match part {
            FormPart::Text(v) if n == name => Some(v.as_str()),
            _ => None,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|(n, _)| n == name)
    }

    pub fn parts(&self) -> &[(String, FormPart)] {
        &self.parts
    }
}

/// A file attached to a multipart form (book cover, avatar)
#[derive(Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Upload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read an image from disk, guessing its content type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = guess_image_type(path).to_string();
        Ok(Self::new(file_name, content_type, bytes))
    }
}

fn guess_image_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
