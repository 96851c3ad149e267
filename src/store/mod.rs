//! Persistence service client.
//!
//! This module provides:
//! * [`VersionStore`] — async trait implemented by all store backends.
//! * [`HttpVersionStore`] — JSON-over-HTTP client for the real service.
//! * [`Chapter`] / [`VersionRecord`] / [`SaveTag`] — the wire model.
//! * [`StoreError`] — error variants for store operations.
//!
//! The service itself (REST endpoints for stories, chapters, versions,
//! foundations) is an external collaborator; only the contract shape the
//! editing session consumes lives here.

pub mod client;
pub mod model;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{HttpVersionStore, StoreError, VersionStore};
pub use model::{Chapter, SaveTag, VersionRecord};

// test-only re-export so editor tests can use the recording double without
// the full `store::client::MockVersionStore` path.
#[cfg(test)]
pub use client::MockVersionStore;
