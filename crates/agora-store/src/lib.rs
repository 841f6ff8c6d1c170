//! Indexed post and reply store for the Agora node.
//!
//! This crate holds the working set of posts and replies a node has seen.
//! Both live in one [`PostDatabase`] guarded by a single reader/writer lock,
//! so a post and the replies that reference it are always observed in a
//! consistent state.
//!
//! # Architecture
//!
//! - **Entities** ([`Post`], [`PostReply`]) are immutable values produced by
//!   [`PostBuilder`] and [`ReplyBuilder`]. The only mutable attribute is the
//!   known flag, which the store sets on every snapshot it hands out.
//! - **Indices** map ids to entities, owners to their content, recipients
//!   to directed posts and posts to their replies. Every mutation updates
//!   all of them under the write lock.
//! - **Known sets** record which content has been surfaced to the user and
//!   are persisted through an [`IdListCodec`](agora_config::IdListCodec)
//!   on [`PostDatabase::save`].
//!
//! Query results are snapshot copies; mutating them never affects the store.

pub mod builder;
pub mod database;
pub mod entity;
pub mod error;
mod index;
pub mod resolver;

pub use builder::{IdPolicy, PostBuilder, ReplyBuilder, TimePolicy};
pub use database::{PostDatabase, PostStore, ReplyStore};
pub use entity::{Entity, Post, PostReply};
pub use error::{BuildError, StoreError, StoreResult};
pub use resolver::OwnerResolver;
