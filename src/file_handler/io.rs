//! File I/O operations with encoding detection and atomic writes
//!
//! Provides safe file reading and writing with:
//! - UTF-8 and UTF-16 encoding detection
//! - Atomic writes so readers never observe a partially written file
//! - File size limits

use crate::config::MAX_FILE_SIZE;
use crate::error::{FileError, FileResult};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Detected encoding of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileEncoding {
    /// UTF-8 without BOM
    #[default]
    Utf8,
    /// UTF-8 with BOM
    Utf8Bom,
    /// UTF-16 Little Endian with BOM
    Utf16Le,
    /// UTF-16 Big Endian with BOM
    Utf16Be,
    /// Unknown/binary (lossy UTF-8 conversion used)
    Unknown,
}

/// Result of reading a file
#[derive(Debug, Clone)]
pub struct FileReadResult {
    /// The file content as a string
    pub content: String,
    /// Detected encoding
    pub encoding: FileEncoding,
    /// Whether lossy conversion was used
    pub lossy: bool,
}

/// Detect file encoding from raw bytes
fn detect_encoding(bytes: &[u8]) -> FileEncoding {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return FileEncoding::Utf8Bom;
    }
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return FileEncoding::Utf16Le;
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return FileEncoding::Utf16Be;
    }

    if std::str::from_utf8(bytes).is_ok() {
        FileEncoding::Utf8
    } else {
        FileEncoding::Unknown
    }
}

/// Decode bytes to string based on detected encoding
fn decode_content(bytes: &[u8], encoding: FileEncoding) -> (String, bool) {
    match encoding {
        FileEncoding::Utf8 => decode_utf8(bytes),
        FileEncoding::Utf8Bom => decode_utf8(&bytes[3..]),
        FileEncoding::Utf16Le => decode_utf16(&bytes[2..], u16::from_le_bytes),
        FileEncoding::Utf16Be => decode_utf16(&bytes[2..], u16::from_be_bytes),
        FileEncoding::Unknown => (String::from_utf8_lossy(bytes).to_string(), true),
    }
}

fn decode_utf8(bytes: &[u8]) -> (String, bool) {
    match std::str::from_utf8(bytes) {
        Ok(s) => (s.to_string(), false),
        Err(_) => (String::from_utf8_lossy(bytes).to_string(), true),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> (String, bool) {
    let mut lossy = false;
    let units = bytes.chunks_exact(2).map(|chunk| unit([chunk[0], chunk[1]]));

    let result: String = char::decode_utf16(units)
        .map(|r| {
            r.unwrap_or_else(|_| {
                lossy = true;
                '\u{FFFD}'
            })
        })
        .collect();

    (result, lossy)
}

/// Read a file synchronously with encoding detection
pub fn read_file_sync(path: impl AsRef<Path>) -> FileResult<FileReadResult> {
    let path = path.as_ref();
    let path_buf = path.to_path_buf();

    if !path.exists() {
        return Err(FileError::NotFound(path_buf));
    }

    let metadata = std::fs::metadata(path).map_err(|e| FileError::ReadError {
        path: path_buf.clone(),
        source: e,
    })?;

    let size_bytes = metadata.len();
    if size_bytes > MAX_FILE_SIZE {
        return Err(FileError::FileTooLarge {
            path: path_buf,
            size: size_bytes,
            max_size: MAX_FILE_SIZE,
        });
    }

    let bytes = std::fs::read(path).map_err(|e| FileError::ReadError {
        path: path_buf.clone(),
        source: e,
    })?;

    let encoding = detect_encoding(&bytes);
    let (content, lossy) = decode_content(&bytes, encoding);

    Ok(FileReadResult {
        content,
        encoding,
        lossy,
    })
}

/// Sibling temp path for an atomic write
///
/// Each writer gets its own temp file so concurrent writers of the same
/// target never share partially written data.
fn temp_path_for(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string());

    parent.join(format!(".{}.{}.tmp", filename, uuid::Uuid::new_v4().simple()))
}

/// Write content to a file using atomic write
///
/// The file is either fully replaced or unchanged.
pub async fn write_file_atomic(path: impl AsRef<Path>, content: &str) -> FileResult<()> {
    let path = path.as_ref();
    let path_buf = path.to_path_buf();
    let temp_path = temp_path_for(path);

    let write_result = async {
        let mut file = tokio::fs::File::create(&temp_path).await?;
        tokio::io::AsyncWriteExt::write_all(&mut file, content.as_bytes()).await?;
        tokio::io::AsyncWriteExt::flush(&mut file).await?;
        file.sync_all().await?;
        Ok::<(), std::io::Error>(())
    }
    .await;

    if let Err(e) = write_result {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(FileError::AtomicWriteError {
            path: path_buf,
            source: e,
        });
    }

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(FileError::RenameError {
            path: path_buf,
            source: e,
        });
    }

    Ok(())
}

/// Write content to a file synchronously using atomic write
pub fn write_file_atomic_sync(path: impl AsRef<Path>, content: &str) -> FileResult<()> {
    let path = path.as_ref();
    let path_buf = path.to_path_buf();
    let temp_path = temp_path_for(path);

    let write_result = (|| {
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        file.sync_all()?;
        Ok::<(), std::io::Error>(())
    })();

    if let Err(e) = write_result {
        let _ = std::fs::remove_file(&temp_path);
        return Err(FileError::AtomicWriteError {
            path: path_buf,
            source: e,
        });
    }

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(FileError::RenameError {
            path: path_buf,
            source: e,
        });
    }

    Ok(())
}

/// Ensure a directory exists, creating intermediate directories
pub fn ensure_dir(path: impl AsRef<Path>) -> FileResult<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        std::fs::create_dir_all(path).map_err(|e| FileError::DirectoryError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}
