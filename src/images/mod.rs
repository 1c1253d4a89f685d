//! Offer images: remote URLs or inline `data:` URLs.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;

use crate::errors::AppError;

/// Largest decoded inline image accepted on an offer.
pub const MAX_INLINE_IMAGE_BYTES: usize = 1024 * 1024;

/// Where an offer's image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Url(String),
    Inline { mime: String, size: usize },
}

impl ImageSource {
    /// Classify a stored image value. Blank means "no image".
    pub fn parse(raw: &str) -> Result<Option<Self>, AppError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        let Some(rest) = raw.strip_prefix("data:") else {
            return Ok(Some(ImageSource::Url(raw.to_string())));
        };

        let (mime, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| AppError::Validation("Inline image must be base64 encoded".into()))?;
        check_mime(mime)?;

        let bytes = B64
            .decode(payload)
            .map_err(|e| AppError::Validation(format!("Inline image is not valid base64: {}", e)))?;
        check_size(bytes.len())?;

        Ok(Some(ImageSource::Inline {
            mime: mime.to_string(),
            size: bytes.len(),
        }))
    }
}

/// Encode uploaded image bytes as a `data:` URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> Result<String, AppError> {
    check_mime(mime)?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Image upload is empty".into()));
    }
    check_size(bytes.len())?;
    Ok(format!("data:{};base64,{}", mime, B64.encode(bytes)))
}

fn check_mime(mime: &str) -> Result<(), AppError> {
    if mime.starts_with("image/") && mime.len() > "image/".len() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Unsupported image type '{}'",
            mime
        )))
    }
}

fn check_size(len: usize) -> Result<(), AppError> {
    if len > MAX_INLINE_IMAGE_BYTES {
        return Err(AppError::Validation(format!(
            "Inline image is {} bytes, limit is {}",
            len, MAX_INLINE_IMAGE_BYTES
        )));
    }
    Ok(())
}
