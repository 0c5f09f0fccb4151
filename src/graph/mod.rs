//! Graph layer: the store adapter, its SQLite and in-memory backends, and
//! bounded traversal.

pub mod adapter;
pub mod cancel;
pub mod memory;
pub mod store;
pub mod traversal;
