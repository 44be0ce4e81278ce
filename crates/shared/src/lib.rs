//! Shared errors and configuration for Assetdrop.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;

pub use config::{
    AppConfig, CloudinaryConfig, ObjectStoreConfig, ObjectStoreProvider, ServerConfig,
    StoreBackendKind, StoreConfig, UploadConfig,
};
pub use error::{AppError, AppResult};
