//! Service layer for the todo store.
//! - `storage` mirrors a whole map to a single JSON file.
//! - `todos` owns the in-memory record set and pairs every mutation with a save.
//! - Errors are collected in `errors::ServiceError`.

pub mod errors;
pub mod storage;
pub mod todos;
