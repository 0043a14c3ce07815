//! Temporary upload store
//!
//! Uploaded bytes are persisted to a uniquely named temp file so an inspector
//! can read them from disk. The file lives exactly as long as its
//! [`TempUpload`] guard.

use std::path::Path;

use tempfile::NamedTempFile;

/// A persisted upload, deleted when dropped.
#[derive(Debug)]
pub struct TempUpload {
    file: NamedTempFile,
    len: u64,
}

impl TempUpload {
    /// Write `data` to a new temp file in `dir` (or the system temp dir).
    ///
    /// The original extension is kept so inspectors that sniff by name see
    /// the same hint the client sent. Nothing else from the client filename
    /// reaches the filesystem.
    pub async fn persist(data: &[u8], filename: &str, dir: Option<&Path>) -> std::io::Result<Self> {
        let suffix = extension_suffix(filename);
        let mut builder = tempfile::Builder::new();
        builder.prefix("upload_").suffix(&suffix);

        let file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        tokio::fs::write(file.path(), data).await?;
        let len = tokio::fs::metadata(file.path()).await?.len();

        Ok(Self { file, len })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Byte length of the file on disk
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// `.ext` for a filename with a short alphanumeric extension, else empty.
fn extension_suffix(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 16)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

/// The final path component of a client-supplied filename.
pub fn display_filename(filename: &str) -> String {
    let normalized = filename.replace('\\', "/");
    let base = Path::new(&normalized)
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string);

    match base {
        Some(name) if !name.trim().is_empty() => name,
        _ => "upload".to_string(),
    }
}
