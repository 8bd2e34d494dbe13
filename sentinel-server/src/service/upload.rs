//! Upload Service
//!
//! Turns uploaded files into snapshots.

use sentinel_core::data_url::sniff_image_mime;
use sentinel_core::domain::snapshot::Snapshot;

use crate::service::session::SessionError;

/// A file received from an upload form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    fn display_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or("<unnamed>")
    }
}

/// Convert uploaded files into snapshots
///
/// Empty parts (a form submitted without a file) are skipped. Anything that is
/// not recognisably an image rejects the whole batch.
pub fn into_snapshots(files: Vec<UploadedFile>) -> Result<Vec<Snapshot>, SessionError> {
    files
        .into_iter()
        .filter(|f| !f.bytes.is_empty())
        .map(|file| {
            let mime_type = image_mime_type(&file).ok_or_else(|| {
                SessionError::ValidationError(format!(
                    "File '{}' is not a supported image",
                    file.display_name()
                ))
            })?;
            Ok(Snapshot::from_image(&file.bytes, &mime_type, file.file_name))
        })
        .collect()
}

/// Magic bytes win; a declared `image/*` type is trusted otherwise
fn image_mime_type(file: &UploadedFile) -> Option<String> {
    if let Some(mime) = sniff_image_mime(&file.bytes) {
        return Some(mime.to_string());
    }

    file.content_type
        .as_deref()
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
        .filter(|ct| ct.starts_with("image/"))
}
