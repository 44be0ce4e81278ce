//! Core upload logic for Assetdrop.
//!
//! This crate contains the upload pipeline with ZERO web framework
//! dependencies. Policy checks, buffering, deadlines and the remote asset
//! store contract live here.
//!
//! # Modules
//!
//! - `upload` - Policy validation, buffering and upload orchestration
//! - `storage` - Remote asset store contract, Cloudinary and OpenDAL adapters
//! - `deadline` - Cancellable deadlines for bounded remote work

pub mod deadline;
pub mod storage;
pub mod upload;

pub use deadline::{Deadline, Interrupted};
