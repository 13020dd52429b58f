//! HTTP transport over reqwest

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, multipart, Client};

use super::{ApiRequest, ApiTransport, FormPart, MultipartForm, RequestBody};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::storage::{read_access_token, SessionStore};

/// The one HTTP client of the application
///
/// Reads the access token from the session store on every request, so a
/// login or logout is picked up without rebuilding the transport.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("bookworm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<serde_json::Value> {
        let url = self.url(&request.path);
        log::debug!("[transport] {} {}", request.method, url);

        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        match read_access_token(self.store.as_ref()) {
            Ok(Some(token)) => builder = builder.header(header::AUTHORIZATION, bearer(&token)),
            Ok(None) => {}
            Err(e) => log::warn!("[transport] Could not read stored token: {}", e),
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(form) => builder.multipart(to_reqwest_form(form)?),
        };

        let response = builder.send().await.map_err(|e| {
            log::error!("[transport] {} {} failed: {}", request.method, url, e);
            Error::from(e)
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            log::warn!(
                "[transport] {} {} returned HTTP {}",
                request.method,
                url,
                status
            );
            return Err(Error::from_status(status.as_u16(), &text));
        }

        Ok(normalize_body(&text))
    }
}

/// `Bearer <token>` header value
fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Empty bodies become `null`; non-JSON text is kept as a JSON string.
fn normalize_body(text: &str) -> serde_json::Value {
    if text.trim().is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
}

fn to_reqwest_form(form: MultipartForm) -> Result<multipart::Form> {
    let mut out = multipart::Form::new();
    for (name, part) in form.parts().iter().cloned() {
        out = match part {
            FormPart::Text(value) => out.text(name, value),
            FormPart::File(upload) => {
                let file_part = multipart::Part::bytes(upload.bytes)
                    .file_name(upload.file_name)
                    .mime_str(&upload.content_type)
                    .map_err(|e| Error::validation(format!("Invalid content type: {}", e)))?;
                out.part(name, file_part)
            }
        };
    }
    Ok(out)
}
