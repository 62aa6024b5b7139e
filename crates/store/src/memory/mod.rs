//! In-process adapters.
//!
//! Used by the test suites and by the API when no `DATABASE_URL` / S3 bucket
//! is configured. State lives for the lifetime of the value; nothing is
//! persisted.

mod documents;
mod identity;
mod objects;

pub use documents::MemoryDocumentStore;
pub use identity::MemoryIdentityStore;
pub use objects::MemoryObjectStorage;
