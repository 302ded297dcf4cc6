//! Service Module
//!
//! Business logic layer for the orchestrator.
//! Services coordinate the record store and the downstream adapters; the
//! store is the only place job state lives.

pub mod catalog;
pub mod completion;
pub mod deployment;
pub mod output;
pub mod query;
pub mod submission;
pub mod upload;

// Re-export for convenience
pub use catalog as catalog_service;
pub use completion as completion_service;
pub use deployment as deployment_service;
pub use output as output_service;
pub use query as query_service;
pub use submission as submission_service;
pub use upload as upload_service;
