//! Foundation types for the Agora node store.
//!
//! Every other Agora crate depends on `agora-types`. The ids here are
//! opaque strings assigned by the overlay network; the store never looks
//! inside them.
//!
//! # Key Types
//!
//! - [`IdentityId`] — Identity of a local or remote participant
//! - [`PostId`] — Globally unique post identifier
//! - [`ReplyId`] — Globally unique reply identifier
//! - [`Timestamp`] — Wall-clock milliseconds since the UNIX epoch

pub mod error;
pub mod id;
pub mod time;

pub use error::TypeError;
pub use id::{IdentityId, PostId, ReplyId};
pub use time::Timestamp;
