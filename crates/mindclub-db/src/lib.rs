//! Mindclub DB Library
//!
//! Persistence for entity documents, accounts and enrollments.

pub mod db;

pub use db::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
