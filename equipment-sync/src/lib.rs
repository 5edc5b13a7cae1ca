//! # Equipment Sync
//!
//! One-shot synchronization of active equipment records from MySQL into the
//! equipment search index.
//!
//! ## Architecture
//!
//! The job follows an extract-transform-load flow, run once to completion:
//!
//! 1. **Gate**: Waits for MySQL and the search service to come up
//! 2. **Provisioning**: Creates the index with its mapping unless it exists
//! 3. **Source**: Reads every active equipment row from MySQL
//! 4. **Processor**: Transforms rows into search documents
//! 5. **Loader**: Writes the documents with a bulk request
//! 6. **Orchestrator**: Runs the steps in order and reports the outcome
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`gate`]: Dependency readiness gate
//! - [`source`]: MySQL extractor
//! - [`processor`]: Transforms records into documents
//! - [`loader`]: Bulk loads documents into the search index
//! - [`orchestrator`]: Coordinates a sync run
//! - [`errors`]: Error types for the sync

pub mod config;
pub mod errors;
pub mod gate;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod source;

pub use config::{Dependencies, SyncConfig};
pub use errors::SyncError;
pub use orchestrator::{Orchestrator, SyncReport};
