//! Shader source loading
//!
//! GL wants null-terminated source buffers, so reads land in a
//! [`CString`] rather than a `String`.

use std::ffi::CString;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Source file read failures.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The file could not be opened or read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file contains an interior NUL byte and cannot back a C string.
    #[error("{} contains an interior NUL byte", .path.display())]
    InteriorNul {
        /// Path that was requested.
        path: PathBuf,
    },
}

/// Read a whole source file into a null-terminated buffer.
///
/// The returned buffer holds the file's N bytes followed by the
/// terminator. A zero-byte file is unusual enough to log but is not an
/// error; a missing or unreadable file is, with nothing allocated.
pub fn read_source_file(path: &Path) -> Result<CString, SourceError> {
    let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if bytes.is_empty() {
        log::info!("no data read from {}", path.display());
    } else {
        log::debug!("read {} bytes from {}", bytes.len(), path.display());
    }

    CString::new(bytes).map_err(|_| SourceError::InteriorNul {
        path: path.to_path_buf(),
    })
}
