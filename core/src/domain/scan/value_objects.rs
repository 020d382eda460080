use base64::{Engine as _, engine::general_purpose};
use sha2::{Digest, Sha256};

use crate::domain::{allergen::Allergen, common::entities::app_errors::CoreError};

/// Raw bytes of a food label photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanImage {
    data: Vec<u8>,
}

impl ScanImage {
    pub const MAX_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_bytes(data: Vec<u8>) -> Result<Self, CoreError> {
        if data.is_empty() {
            return Err(CoreError::ValidationError(
                "Missing or invalid image data".to_string(),
            ));
        }

        if data.len() > Self::MAX_SIZE {
            return Err(CoreError::ValidationError(format!(
                "Image too large. Max size is {} bytes",
                Self::MAX_SIZE
            )));
        }

        Ok(Self { data })
    }

    /// Accepts plain base64 or a `data:image/...;base64,` URL.
    pub fn from_base64(encoded: &str) -> Result<Self, CoreError> {
        let encoded = encoded.trim();
        let payload = match encoded.strip_prefix("data:") {
            Some(rest) => rest
                .split_once(',')
                .map(|(_, payload)| payload)
                .ok_or_else(|| {
                    CoreError::ValidationError("Malformed image data URL".to_string())
                })?,
            None => encoded,
        };

        let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        if payload.is_empty() {
            return Err(CoreError::ValidationError(
                "Missing or invalid image data".to_string(),
            ));
        }

        let data = general_purpose::STANDARD
            .decode(payload.as_bytes())
            .map_err(|e| CoreError::ValidationError(format!("Image is not valid base64: {}", e)))?;

        Self::from_bytes(data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.data)
    }

    /// Hex SHA-256 of the image, used to correlate logs without logging the photo.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.data))
    }

    /// Sniffs the container format from magic bytes, defaulting to JPEG.
    pub fn mime_type(&self) -> &'static str {
        match self.data.as_slice() {
            [0x89, b'P', b'N', b'G', ..] => "image/png",
            [b'G', b'I', b'F', b'8', ..] => "image/gif",
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
            _ => "image/jpeg",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzeScanInput {
    pub image: ScanImage,
    pub allergens: Vec<Allergen>,
}
