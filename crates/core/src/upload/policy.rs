//! Upload policy: size ceiling and extension allow-set.

use std::collections::BTreeSet;

use assetdrop_shared::UploadConfig;

use super::error::PolicyError;
use super::filename::extension;

/// Size and extension rules a file must satisfy before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    max_file_size: u64,
    allowed_extensions: BTreeSet<String>,
}

impl UploadPolicy {
    /// Default max file size: 5 MiB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;
    /// Default allowed extensions.
    pub const DEFAULT_EXTENSIONS: [&'static str; 4] = [".jpg", ".jpeg", ".png", ".svg"];

    /// Create a policy. Extensions are normalized to lower-case with a
    /// leading dot; blank entries are ignored.
    #[must_use]
    pub fn new<I, S>(max_file_size: u64, allowed_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            max_file_size,
            allowed_extensions: allowed_extensions
                .into_iter()
                .filter_map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
        }
    }

    /// Build the policy described by the upload configuration.
    #[must_use]
    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.max_file_size, &config.allowed_extensions)
    }

    /// Maximum accepted size in bytes.
    #[must_use]
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Allowed extensions, normalized.
    pub fn allowed_extensions(&self) -> impl Iterator<Item = &str> {
        self.allowed_extensions.iter().map(String::as_str)
    }

    /// Check if a (dot-prefixed) extension is allowed, ignoring case.
    #[must_use]
    pub fn allows_extension(&self, ext: &str) -> bool {
        self.allowed_extensions.contains(&ext.to_lowercase())
    }

    /// Validate a candidate file's declared size and filename.
    ///
    /// Size is checked first. Pure: no I/O, no side effects.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::FileTooLarge`] or
    /// [`PolicyError::UnsupportedFileType`].
    pub fn validate(&self, declared_size: u64, filename: &str) -> Result<(), PolicyError> {
        if declared_size > self.max_file_size {
            return Err(PolicyError::file_too_large(
                declared_size,
                self.max_file_size,
            ));
        }

        match extension(filename).map(str::to_lowercase) {
            Some(ext) if self.allowed_extensions.contains(&ext) => Ok(()),
            other => Err(PolicyError::unsupported(other)),
        }
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_FILE_SIZE, Self::DEFAULT_EXTENSIONS)
    }
}

fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim().trim_start_matches('.');
    if ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_lowercase()))
}
