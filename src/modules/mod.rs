//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for external services such as media storage.

pub mod storage;
