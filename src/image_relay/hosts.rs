use super::local::extension_for;
use super::models::{FetchedImage, Service};
use crate::error::{rejected, AppResult};
use async_trait::async_trait;
use reqwest::{header, multipart, Client};
use serde_json::Value;
use tracing::debug;

/// A third-party image host tried by the relay cascade
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Tag reported when this host produced the URL
    fn service(&self) -> Service;

    /// Upload the image and return its public URL.
    ///
    /// Every failure is an `UpstreamRejected` error; the cascade logs it and moves on.
    async fn attempt(&self, client: &Client, image: &FetchedImage) -> AppResult<String>;
}

/// Build the single-file part shared by both hosts
fn file_part(image: &FetchedImage, service: Service) -> AppResult<multipart::Part> {
    multipart::Part::bytes(image.bytes.to_vec())
        .file_name(format!("image.{}", extension_for(image)))
        .mime_str(image.mime())
        .map_err(|e| rejected(service, format!("Failed to build multipart form: {e}")))
}

/// JSON upload API: file field `image`, reply `{ "success": true, "data": { "link": ... } }`
pub struct HostedA {
    pub endpoint: String,
    pub client_id: Option<String>,
}

#[async_trait]
impl ImageHost for HostedA {
    fn service(&self) -> Service {
        Service::HostedA
    }

    async fn attempt(&self, client: &Client, image: &FetchedImage) -> AppResult<String> {
        let form = multipart::Form::new().part("image", file_part(image, self.service())?);

        let mut request = client
            .post(&self.endpoint)
            .header(header::ACCEPT, "application/json")
            .multipart(form);
        if let Some(client_id) = &self.client_id {
            request = request.header(header::AUTHORIZATION, format!("Client-ID {client_id}"));
        }

        let res = request
            .send()
            .await
            .map_err(|e| rejected(self.service(), e))?;

        let status = res.status();
        if !status.is_success() {
            return Err(rejected(self.service(), format!("HTTP {status}")));
        }

        let reply: Value = res
            .json()
            .await
            .map_err(|e| rejected(self.service(), format!("Malformed reply: {e}")))?;

        debug!("{} replied: {}", self.service(), reply);
        link_from_reply(&reply).map_err(|reason| rejected(self.service(), reason))
    }
}

/// Truthiness of a JSON value: true, non-zero numbers and non-empty strings
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}

/// Pull the link out of a hosting service A reply
pub fn link_from_reply(reply: &Value) -> Result<String, String> {
    if !reply.get("success").is_some_and(is_truthy) {
        return Err("Reply does not report success".to_string());
    }

    reply
        .get("data")
        .and_then(|data| data.get("link"))
        .and_then(Value::as_str)
        .filter(|link| !link.is_empty())
        .map(str::to_string)
        .ok_or_else(|| "Reply has no link".to_string())
}

/// Plain-text upload API: `reqtype=fileupload` plus file field `fileToUpload`, reply is the bare URL
pub struct HostedB {
    pub endpoint: String,
    pub url_prefix: String,
}

#[async_trait]
impl ImageHost for HostedB {
    fn service(&self) -> Service {
        Service::HostedB
    }

    async fn attempt(&self, client: &Client, image: &FetchedImage) -> AppResult<String> {
        let form = multipart::Form::new()
            .text("reqtype", "fileupload")
            .part("fileToUpload", file_part(image, self.service())?);

        let res = client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| rejected(self.service(), e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| rejected(self.service(), e))?;
        if !status.is_success() {
            return Err(rejected(self.service(), format!("HTTP {status}")));
        }

        url_from_text(&body, &self.url_prefix).map_err(|reason| rejected(self.service(), reason))
    }
}

/// Accept a hosting service B reply only if it is a URL under the expected prefix
pub fn url_from_text(body: &str, prefix: &str) -> Result<String, String> {
    let url = body.trim();
    if url.starts_with(prefix) && url.len() > prefix.len() {
        Ok(url.to_string())
    } else {
        Err(format!("Unexpected reply: {:.200}", url))
    }
}
