//! Mindclub Storage Library
//!
//! Media store abstraction and its backends: ImageKit for production and the
//! local filesystem for development and tests.
//!
//! # Storage key format
//!
//! Backends that choose their own keys use `{folder}/{file_name}`, with the folder
//! stripped of leading and trailing slashes. Keys must not contain `..` or a
//! leading `/`. Key building lives in the `keys` module.

pub mod factory;
pub(crate) mod keys;
pub mod imagekit;
pub mod local;
pub mod traits;

pub use factory::create_media_store;
pub use imagekit::ImageKitStorage;
pub use local::LocalStorage;
pub use mindclub_core::MediaBackend;
pub use traits::{FileDetails, MediaStore, StorageError, StorageResult, StoredFile};
