//! Document store implementations
//!
//! `store` defines the `DocumentStore` seam. `postgres` keeps every collection in
//! one JSONB table; `memory` keeps them in process.

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;
pub use store::{json_contains, DocumentStore};
