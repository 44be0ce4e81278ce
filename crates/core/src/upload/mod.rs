//! Validated upload pipeline.
//!
//! This module provides:
//! - Size and extension policy checks
//! - Buffering of the submitted file into memory
//! - Deadline-bounded hand-off to a remote asset store
//! - Filename helpers for deriving object identifiers

mod buffer;
mod error;
mod filename;
mod policy;
mod service;
mod source;

#[cfg(test)]
mod policy_props;

pub use buffer::buffer;
pub use error::{PolicyError, UploadError};
pub use filename::{extension, strip_extension};
pub use policy::UploadPolicy;
pub use service::Uploader;
pub use source::{DiskFile, FileSource, MemoryFile};
