//! Durable set of bookmarked posts.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use agora_config::IdListCodec;
use agora_store::{Post, PostDatabase};
use agora_types::PostId;

/// Bookmarked post ids, resolved against the [`PostDatabase`] on read.
///
/// Both bookmarking and unbookmarking write the full list through to the
/// backend when membership changes; [`stop`](Self::stop) writes it once
/// more.
pub struct BookmarkStore {
    codec: IdListCodec,
    prefix: String,
    posts: Arc<PostDatabase>,
    persist: Mutex<()>,
    bookmarks: RwLock<HashSet<PostId>>,
}

impl BookmarkStore {
    /// Create a store that persists under `prefix` (see
    /// [`KeyLayout::bookmarks`](agora_config::KeyLayout::bookmarks)).
    pub fn new(codec: IdListCodec, prefix: impl Into<String>, posts: Arc<PostDatabase>) -> Self {
        Self {
            codec,
            prefix: prefix.into(),
            posts,
            persist: Mutex::new(()),
            bookmarks: RwLock::new(HashSet::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashSet<PostId>> {
        self.bookmarks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashSet<PostId>> {
        self.bookmarks.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the in-memory set with the persisted one.
    pub fn start(&self) {
        let loaded: HashSet<PostId> = self.codec.load_ids(&self.prefix);
        info!(bookmarks = loaded.len(), "bookmarks loaded");
        *self.write() = loaded;
    }

    /// Persist the current set.
    pub fn stop(&self) {
        let _persist = self.persist.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot: Vec<PostId> = self.read().iter().cloned().collect();
        self.codec.save_ids(&self.prefix, &snapshot);
        info!(bookmarks = snapshot.len(), "bookmarks saved");
    }

    /// Returns `false` if the post was already bookmarked.
    pub fn bookmark_post(&self, post: &Post) -> bool {
        self.update(post.id(), true)
    }

    /// Returns `false` if the post was not bookmarked.
    pub fn unbookmark_post(&self, post: &Post) -> bool {
        self.update(post.id(), false)
    }

    fn update(&self, id: &PostId, bookmarked: bool) -> bool {
        let _persist = self.persist.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot: Vec<PostId> = {
            let mut bookmarks = self.write();
            let changed = if bookmarked {
                bookmarks.insert(id.clone())
            } else {
                bookmarks.remove(id)
            };
            if !changed {
                return false;
            }
            bookmarks.iter().cloned().collect()
        };
        debug!(%id, bookmarked, "bookmark changed");
        self.codec.save_ids(&self.prefix, &snapshot);
        true
    }

    pub fn is_post_bookmarked(&self, post: &Post) -> bool {
        self.read().contains(post.id())
    }

    /// Bookmarked posts present in the post database, newest first.
    /// Bookmarks of posts the database does not hold are skipped.
    pub fn get_bookmarked_posts(&self) -> Vec<Post> {
        let ids: Vec<PostId> = self.read().iter().cloned().collect();
        let store = self.posts.posts();
        let mut posts: Vec<Post> = ids.iter().filter_map(|id| store.get(id)).collect();
        posts.sort_by_key(|p| (Reverse(p.time()), p.id().clone()));
        posts
    }
}

impl std::fmt::Debug for BookmarkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookmarkStore")
            .field("prefix", &self.prefix)
            .field("bookmarks", &self.read().len())
            .finish()
    }
}
