use super::models::FetchedImage;
use crate::error::{storage_error, AppResult};
use image::ImageFormat;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;
use uuid::Uuid;

/// Directory under the public dir that receives relayed images
pub const RELAY_SUBDIR: &str = "uploads/events";

/// File extension for a fetched image.
///
/// The response `Content-Type` decides (png, gif, webp, anything else jpg). Without the
/// header the bytes are sniffed.
pub fn extension_for(image: &FetchedImage) -> &'static str {
    match image.content_type.as_deref() {
        Some(content_type) => extension_for_content_type(content_type),
        None => match image::guess_format(&image.bytes) {
            Ok(ImageFormat::Png) => "png",
            Ok(ImageFormat::Gif) => "gif",
            Ok(ImageFormat::WebP) => "webp",
            _ => "jpg",
        },
    }
}

fn extension_for_content_type(content_type: &str) -> &'static str {
    if content_type.contains("png") {
        "png"
    } else if content_type.contains("gif") {
        "gif"
    } else if content_type.contains("webp") {
        "webp"
    } else {
        "jpg"
    }
}

/// Last-resort storage on the server's own public directory
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
    base_url: String,
}

impl LocalStore {
    /// Store under `public_dir/uploads/events`, served as `base_url/uploads/events/<file>`
    pub fn new(public_dir: &Path, base_url: &str) -> Self {
        Self {
            dir: public_dir.join(RELAY_SUBDIR),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the image under a fresh unique name and return its public URL
    pub async fn save(&self, image: &FetchedImage) -> AppResult<String> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            storage_error(&format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        let filename = format!("{}.{}", Uuid::new_v4(), extension_for(image));
        let path = self.dir.join(&filename);

        fs::write(&path, &image.bytes).await.map_err(|e| {
            storage_error(&format!("Failed to write {}: {}", path.display(), e))
        })?;

        info!("Saved relayed image to {}", path.display());
        Ok(format!("{}/{}/{}", self.base_url, RELAY_SUBDIR, filename))
    }
}
