//! Storage abstractions for service layer
//!
//! Contains the file-backed mirror used to persist small maps as JSON.

pub mod json_map_store;
