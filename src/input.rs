//! Input loading: read a local PDF into an [`InputFile`].
//!
//! We validate the PDF magic bytes (`%PDF`) before returning so the user
//! finds out about a mis-selected JPEG here rather than from an opaque
//! service error after an upload.

use crate::error::CtpsError;
use crate::request::InputFile;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// Read a local PDF, validating existence, permissions and magic bytes.
pub async fn read_input(path: impl AsRef<Path>) -> Result<InputFile, CtpsError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| map_io_error(path, e))?;
    to_input_file(path, bytes)
}

/// Blocking variant of [`read_input`].
pub fn read_input_sync(path: impl AsRef<Path>) -> Result<InputFile, CtpsError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| map_io_error(path, e))?;
    to_input_file(path, bytes)
}

fn map_io_error(path: &Path, e: std::io::Error) -> CtpsError {
    let path = path.to_path_buf();
    match e.kind() {
        ErrorKind::NotFound => CtpsError::FileNotFound { path },
        ErrorKind::PermissionDenied => CtpsError::PermissionDenied { path },
        _ => CtpsError::Internal(format!("Failed to read '{}': {}", path.display(), e)),
    }
}

fn to_input_file(path: &Path, bytes: Vec<u8>) -> Result<InputFile, CtpsError> {
    let path: PathBuf = path.to_path_buf();

    if bytes.is_empty() {
        return Err(CtpsError::EmptyFile { path });
    }
    if bytes.len() < PDF_MAGIC.len() || &bytes[..4] != PDF_MAGIC {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(CtpsError::NotAPdf { path, magic });
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());

    let file = InputFile::pdf(file_name, bytes);
    info!("Loaded {} ({} bytes)", path.display(), file.len());
    if file.fits_target() {
        debug!("{} is already under the 5MB target", path.display());
    } else {
        warn!(
            "{} is {:.2} MB; the service must shrink it to 5MB",
            path.display(),
            file.len() as f64 / 1_048_576.0
        );
    }
    Ok(file)
}
