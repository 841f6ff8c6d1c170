//! High-level API for the Agora node store.
//!
//! [`Database`] is the composition root: it constructs every store once
//! over a shared configuration backend and hands out references, so
//! collaborators receive their stores explicitly instead of reaching for
//! global state.

pub mod database;
pub mod error;

pub use database::Database;
pub use error::{SdkError, SdkResult};

pub use agora_config::{ConfigBackend, InMemoryConfig, KeyLayout};
pub use agora_social::{BookmarkStore, FriendGraphStore};
pub use agora_store::{
    IdPolicy, OwnerResolver, Post, PostBuilder, PostDatabase, PostReply, ReplyBuilder, TimePolicy,
};
pub use agora_types::{IdentityId, PostId, ReplyId, Timestamp};
