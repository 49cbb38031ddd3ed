//! Latest report lookup for costwatch
//!
//! Finds the most recently modified report object under a key prefix and
//! returns it as a structured JSON response with permissive CORS headers.

pub mod handler;
pub mod store;

pub use handler::{LatestReportHandler, LookupConfig, LookupResponse};
pub use store::{FsObjectStore, MemoryObjectStore, ObjectStore, ObjectSummary};
