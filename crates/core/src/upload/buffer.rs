//! Read a file source fully into memory.

use std::io;

use bytes::Bytes;
use tokio::io::AsyncReadExt;

use super::error::UploadError;
use super::source::FileSource;

/// Upper bound on up-front allocation, whatever size is declared.
const MAX_PREALLOCATION: u64 = 16 * 1024 * 1024;

/// Open `source`, read it to the end and close it.
///
/// Reading stops one byte past the declared size, so memory stays bounded
/// by what the policy validated. The handle is owned by this function, so it
/// is closed on every exit path, including when the returned future is
/// dropped mid-read. The result is re-readable: clones of [`Bytes`] share
/// the buffer and each starts at offset zero.
///
/// # Errors
///
/// Returns [`UploadError::Io`] if the source cannot be opened or read, or
/// holds more bytes than it declared.
pub async fn buffer<F: FileSource>(source: &F) -> Result<Bytes, UploadError> {
    let declared = source.declared_size();
    let mut reader = source.open().await?.take(declared.saturating_add(1));

    let capacity = declared.min(MAX_PREALLOCATION);
    let mut data = Vec::with_capacity(usize::try_from(capacity).unwrap_or_default());
    reader.read_to_end(&mut data).await?;

    if data.len() as u64 > declared {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("file is larger than its declared size of {declared} bytes"),
        )
        .into());
    }

    Ok(Bytes::from(data))
}
