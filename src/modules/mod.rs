//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for external services such as object storage.

pub mod storage;
