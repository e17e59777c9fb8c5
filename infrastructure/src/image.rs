//! Loading image attachments from disk

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use multimind_domain::ImageAttachment;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("Failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported image type: {0} (expected png, jpg, gif, webp or bmp)")]
    UnsupportedType(String),
}

/// MIME type for an image file, from its extension.
pub fn guess_image_mime_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => return None,
    };
    Some(mime)
}

/// Read an image file and base64-encode it for attachment to a query.
pub async fn load_image(path: impl AsRef<Path>) -> Result<ImageAttachment, ImageLoadError> {
    let path = path.as_ref();
    let mime_type = guess_image_mime_type(path)
        .ok_or_else(|| ImageLoadError::UnsupportedType(path.display().to_string()))?;

    let bytes = tokio::fs::read(path).await.map_err(|source| ImageLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Loaded image {} ({} bytes, {})", path.display(), bytes.len(), mime_type);

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();

    Ok(ImageAttachment {
        mime_type: mime_type.to_string(),
        base64_data: BASE64_STANDARD.encode(&bytes),
        name,
        size_bytes: bytes.len(),
    })
}
