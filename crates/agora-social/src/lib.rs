//! Friend graph and bookmark stores for the Agora node.
//!
//! Both stores keep their live state in memory and write small id lists
//! through to the configuration backend via
//! [`IdListCodec`](agora_config::IdListCodec).
//!
//! Each store follows the same mutate-then-persist sequence:
//!
//! 1. take the store's persist mutex,
//! 2. mutate under the state write lock and snapshot the affected list,
//! 3. release the state lock,
//! 4. write the snapshot to the backend, then release the persist mutex.
//!
//! The backend is therefore never called with a state lock held, and two
//! concurrent mutations cannot persist their snapshots out of order.

pub mod bookmarks;
pub mod friends;
pub mod hydrate;

pub use bookmarks::BookmarkStore;
pub use friends::FriendGraphStore;
pub use hydrate::HydrationCache;
