use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which step of the cascade produced the public URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Service {
    #[serde(rename = "hosted-a")]
    HostedA,
    #[serde(rename = "hosted-b")]
    HostedB,
    #[serde(rename = "local")]
    Local,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::HostedA => "hosted-a",
            Service::HostedB => "hosted-b",
            Service::Local => "local",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source image buffered in memory
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Bytes,
    /// `Content-Type` of the source response, if any
    pub content_type: Option<String>,
}

impl FetchedImage {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Mime type to declare when re-uploading
    pub fn mime(&self) -> &str {
        self.content_type
            .as_deref()
            .filter(|ct| ct.starts_with("image/"))
            .unwrap_or("image/jpeg")
    }
}

/// Outcome of one relay run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResult {
    pub url: String,
    pub source_url: String,
    pub size_bytes: usize,
    pub service: Service,
}

/// Body of a relay request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    pub image_url: Option<String>,
}

/// Body of a successful relay response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    pub success: bool,
    pub url: String,
    pub original_url: String,
    pub size: usize,
    pub service: Service,
}

impl From<RelayResult> for RelayResponse {
    fn from(result: RelayResult) -> Self {
        Self {
            success: true,
            url: result.url,
            original_url: result.source_url,
            size: result.size_bytes,
            service: result.service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_serializes_as_tag() {
        assert_eq!(serde_json::to_string(&Service::HostedB).unwrap(), "\"hosted-b\"");
        assert_eq!(Service::Local.to_string(), "local");
    }

    #[test]
    fn test_mime_defaults_to_jpeg() {
        let image = FetchedImage {
            bytes: Bytes::from_static(b"x"),
            content_type: Some("text/html".to_string()),
        };
        assert_eq!(image.mime(), "image/jpeg");
    }

    #[test]
    fn test_response_shape() {
        let response = RelayResponse::from(RelayResult {
            url: "/uploads/events/a.png".to_string(),
            source_url: "https://cdn.example/a.png".to_string(),
            size_bytes: 42,
            service: Service::Local,
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["originalUrl"], "https://cdn.example/a.png");
        assert_eq!(json["size"], 42);
        assert_eq!(json["service"], "local");
        assert_eq!(json["success"], true);
    }
}
