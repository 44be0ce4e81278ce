//! Inbound file handles.

use std::future::Future;
use std::io;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::io::AsyncRead;

/// A submitted file: metadata plus an "open, read fully, close" body.
///
/// The reader returned by [`open`](Self::open) is the open handle; dropping
/// it closes the handle.
pub trait FileSource: Send + Sync {
    /// Reader over the file body.
    type Reader: AsyncRead + Unpin + Send;

    /// Filename as declared by the client.
    fn filename(&self) -> &str;

    /// Size as declared by the transport, not re-measured.
    fn declared_size(&self) -> u64;

    /// Open the file body for reading.
    fn open(&self) -> impl Future<Output = io::Result<Self::Reader>> + Send;
}

/// File whose body is already in memory (e.g. a multipart field).
#[derive(Debug, Clone)]
pub struct MemoryFile {
    filename: String,
    declared_size: u64,
    data: Bytes,
}

impl MemoryFile {
    /// Create a memory file; the declared size is the body length.
    #[must_use]
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            filename: filename.into(),
            declared_size: data.len() as u64,
            data,
        }
    }

    /// Override the declared size with transport metadata.
    #[must_use]
    pub fn with_declared_size(mut self, declared_size: u64) -> Self {
        self.declared_size = declared_size;
        self
    }
}

impl FileSource for MemoryFile {
    type Reader = Cursor<Bytes>;

    fn filename(&self) -> &str {
        &self.filename
    }

    fn declared_size(&self) -> u64 {
        self.declared_size
    }

    async fn open(&self) -> io::Result<Cursor<Bytes>> {
        Ok(Cursor::new(self.data.clone()))
    }
}

/// File spooled to disk by the transport.
#[derive(Debug, Clone)]
pub struct DiskFile {
    path: PathBuf,
    filename: String,
    declared_size: u64,
}

impl DiskFile {
    /// Create a disk file with explicit metadata.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, filename: impl Into<String>, declared_size: u64) -> Self {
        Self {
            path: path.into(),
            filename: filename.into(),
            declared_size,
        }
    }

    /// Create a disk file taking the filename and size from the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the file metadata cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(path, filename, metadata.len()))
    }

    /// Location on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileSource for DiskFile {
    type Reader = tokio::fs::File;

    fn filename(&self) -> &str {
        &self.filename
    }

    fn declared_size(&self) -> u64 {
        self.declared_size
    }

    async fn open(&self) -> io::Result<tokio::fs::File> {
        tokio::fs::File::open(&self.path).await
    }
}
