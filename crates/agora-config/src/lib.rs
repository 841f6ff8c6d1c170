//! Configuration substrate for the Agora node store.
//!
//! The stores persist small relational facts (known content, friend lists,
//! bookmarks, following times) into a flat, slash-delimited key/value
//! namespace shared with unrelated preference storage. This crate defines
//! that namespace and the encoding used on top of it.
//!
//! # Modules
//!
//! - [`error`] — Error types for backend access
//! - [`traits`] — The [`ConfigBackend`] trait defining the storage interface
//! - [`memory`] — In-memory [`InMemoryConfig`] backend
//! - [`codec`] — [`IdListCodec`], null-terminated id arrays
//! - [`layout`] — [`KeyLayout`], the key prefixes used by every store

pub mod codec;
pub mod error;
pub mod layout;
pub mod memory;
pub mod traits;

pub use codec::IdListCodec;
pub use error::{ConfigError, ConfigResult};
pub use layout::KeyLayout;
pub use memory::InMemoryConfig;
pub use traits::ConfigBackend;
