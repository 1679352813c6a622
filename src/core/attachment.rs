//! # Pending Attachment
//!
//! An image selected by the user but not yet submitted. Holds the raw bytes
//! for transmission plus a data URL rendering for preview and for echoing
//! into the submitted message.

use std::fmt;
use std::io;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use log::debug;

use crate::inference::{ImageEcho, ImagePayload};

/// Extensions accepted by `/attach`, with the MIME type sent for each.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
];

#[derive(Debug)]
pub enum AttachmentError {
    Io(io::Error),
    /// The file extension is not a supported image type.
    UnsupportedType(String),
}

impl fmt::Display for AttachmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentError::Io(e) => write!(f, "could not read image: {e}"),
            AttachmentError::UnsupportedType(name) => {
                write!(f, "not a supported image type: {name}")
            }
        }
    }
}

impl std::error::Error for AttachmentError {}

/// Returns the MIME type for a supported image path, matched case-insensitively.
pub fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

/// Renders bytes as a `data:` URL.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// Assigned by the session when the attachment becomes pending.
    pub id: u64,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    pub data_url: String,
}

impl Attachment {
    pub fn from_bytes(file_name: String, mime: &str, bytes: Vec<u8>) -> Self {
        Self {
            id: 0,
            data_url: data_url(mime, &bytes),
            file_name,
            mime: mime.to_string(),
            bytes,
        }
    }

    /// Reads a user-selected file and renders its data URL.
    pub async fn load(path: &Path) -> Result<Self, AttachmentError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mime = mime_for(path).ok_or_else(|| AttachmentError::UnsupportedType(file_name.clone()))?;
        let bytes = tokio::fs::read(path).await.map_err(AttachmentError::Io)?;
        debug!("Loaded attachment {} ({}, {} bytes)", file_name, mime, bytes.len());

        Ok(Self::from_bytes(file_name, mime, bytes))
    }

    /// Frozen copy of the bytes handed to the backend.
    pub fn payload(&self) -> ImagePayload {
        ImagePayload {
            file_name: self.file_name.clone(),
            mime: self.mime.clone(),
            bytes: self.bytes.clone(),
        }
    }

    /// Copy of the preview echoed into the user's message.
    pub fn echo(&self) -> ImageEcho {
        ImageEcho {
            file_name: self.file_name.clone(),
            data_url: self.data_url.clone(),
        }
    }

    /// Human-readable size, e.g. `"12.3 KB"`.
    pub fn size_label(&self) -> String {
        let len = self.bytes.len();
        if len < 1024 {
            format!("{len} B")
        } else if len < 1024 * 1024 {
            format!("{:.1} KB", len as f64 / 1024.0)
        } else {
            format!("{:.1} MB", len as f64 / (1024.0 * 1024.0))
        }
    }
}
