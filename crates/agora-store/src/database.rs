//! The post/reply database and its two store views.
//!
//! [`PostDatabase`] owns one `RwLock` over both index sets. [`PostStore`]
//! and [`ReplyStore`] are cheap borrowed views that take the lock per
//! operation: reads take the read lock, every mutation takes the write lock
//! for its whole duration so readers never observe a partial update.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use agora_config::{IdListCodec, KeyLayout};
use agora_types::{IdentityId, PostId, ReplyId};

use crate::entity::{Entity, Post, PostReply};
use crate::error::{StoreError, StoreResult};
use crate::index::EntityIndex;

#[derive(Default)]
struct DatabaseState {
    posts: EntityIndex<Post>,
    replies: EntityIndex<PostReply>,
}

/// In-memory store of posts and replies.
pub struct PostDatabase {
    layout: KeyLayout,
    state: RwLock<DatabaseState>,
}

impl PostDatabase {
    pub fn new(layout: KeyLayout) -> Self {
        Self {
            layout,
            state: RwLock::new(DatabaseState::default()),
        }
    }

    pub fn posts(&self) -> PostStore<'_> {
        PostStore { db: self }
    }

    pub fn replies(&self) -> ReplyStore<'_> {
        ReplyStore { db: self }
    }

    fn read(&self) -> RwLockReadGuard<'_, DatabaseState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DatabaseState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hydrate the known sets from the configuration backend, replacing
    /// whatever is in memory.
    pub fn start(&self, codec: &IdListCodec) {
        let known_posts: HashSet<PostId> = codec.load_ids(&self.layout.known_posts);
        let known_replies: HashSet<ReplyId> = codec.load_ids(&self.layout.known_replies);
        info!(
            known_posts = known_posts.len(),
            known_replies = known_replies.len(),
            "post database started"
        );

        let mut state = self.write();
        state.posts.replace_known(known_posts);
        state.replies.replace_known(known_replies);
    }

    /// Replace every post and reply of `owner` in one step.
    ///
    /// Both collections are checked before anything changes, and both
    /// indices are rewritten under a single write lock.
    pub fn replace_owner(
        &self,
        owner: &IdentityId,
        posts: impl IntoIterator<Item = Post>,
        replies: impl IntoIterator<Item = PostReply>,
    ) -> StoreResult<()> {
        let posts: Vec<Post> = posts.into_iter().collect();
        let replies: Vec<PostReply> = replies.into_iter().collect();
        check_owner(owner, &posts)?;
        check_owner(owner, &replies)?;

        let mut state = self.write();
        let removed_posts = state.posts.remove_owner(owner);
        let removed_replies = state.replies.remove_owner(owner);
        let (stored_posts, stored_replies) = (posts.len(), replies.len());
        for post in posts {
            state.posts.insert(post);
        }
        for reply in replies {
            state.replies.insert(reply);
        }
        drop(state);
        debug!(
            %owner,
            removed_posts,
            removed_replies,
            stored_posts,
            stored_replies,
            "replaced owner content"
        );
        Ok(())
    }

    /// Persist the known sets. The lock is released before the backend is
    /// called.
    pub fn save(&self, codec: &IdListCodec) {
        let (known_posts, known_replies) = {
            let state = self.read();
            (state.posts.known_ids(), state.replies.known_ids())
        };
        codec.save_ids(&self.layout.known_posts, &known_posts);
        codec.save_ids(&self.layout.known_replies, &known_replies);
        debug!(
            known_posts = known_posts.len(),
            known_replies = known_replies.len(),
            "known sets saved"
        );
    }
}

impl Default for PostDatabase {
    fn default() -> Self {
        Self::new(KeyLayout::default())
    }
}

impl std::fmt::Debug for PostDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("PostDatabase")
            .field("posts", &state.posts.len())
            .field("replies", &state.replies.len())
            .finish()
    }
}

pub(crate) fn check_owner<E: Entity>(owner: &IdentityId, entities: &[E]) -> StoreResult<()> {
    match entities.iter().find(|e| e.owner_id() != owner) {
        None => Ok(()),
        Some(e) => Err(StoreError::OwnershipViolation {
            owner: owner.clone(),
            id: e.id().as_ref().to_string(),
            actual: e.owner_id().clone(),
        }),
    }
}

/// Newest first, ties broken by id.
fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(|a, b| (Reverse(a.time()), a.id()).cmp(&(Reverse(b.time()), b.id())));
    posts
}

/// Oldest first, ties broken by id.
fn oldest_first(mut replies: Vec<PostReply>) -> Vec<PostReply> {
    replies.sort_by(|a, b| (a.time(), a.id()).cmp(&(b.time(), b.id())));
    replies
}

/// Post operations of a [`PostDatabase`].
#[derive(Clone, Copy)]
pub struct PostStore<'a> {
    db: &'a PostDatabase,
}

impl PostStore<'_> {
    pub fn get(&self, id: &PostId) -> Option<Post> {
        self.db.read().posts.get(id)
    }

    /// All posts written by `owner`, newest first.
    pub fn get_by_owner(&self, owner: &IdentityId) -> Vec<Post> {
        newest_first(self.db.read().posts.by_owner(owner))
    }

    /// All posts directed at `recipient`, newest first.
    pub fn get_by_recipient(&self, recipient: &IdentityId) -> Vec<Post> {
        newest_first(self.db.read().posts.by_key(recipient))
    }

    /// Insert or replace a post.
    pub fn store(&self, post: Post) {
        debug!(id = %post.id(), owner = %post.owner_id(), "storing post");
        self.db.write().posts.insert(post);
    }

    /// Remove a post from every index. Replies to it are not touched.
    pub fn remove(&self, post: &Post) {
        let removed = self.db.write().posts.remove(post.id()).is_some();
        debug!(id = %post.id(), removed, "removing post");
    }

    /// Replace every post of `owner` with `posts`.
    ///
    /// Fails without touching the store if any post belongs to someone else.
    pub fn store_all(
        &self,
        owner: &IdentityId,
        posts: impl IntoIterator<Item = Post>,
    ) -> StoreResult<()> {
        let posts: Vec<Post> = posts.into_iter().collect();
        check_owner(owner, &posts)?;

        let mut state = self.db.write();
        let removed = state.posts.remove_owner(owner);
        let stored = posts.len();
        for post in posts {
            state.posts.insert(post);
        }
        drop(state);
        debug!(%owner, removed, stored, "replaced posts");
        Ok(())
    }

    /// Remove every post of `owner`.
    pub fn remove_all(&self, owner: &IdentityId) {
        let removed = self.db.write().posts.remove_owner(owner);
        debug!(%owner, removed, "removed posts");
    }

    /// Set or clear the known flag of `post`. No other index is affected.
    pub fn mark_known(&self, post: &Post, known: bool) {
        self.db.write().posts.set_known(post.id(), known);
    }

    pub fn is_known(&self, id: &PostId) -> bool {
        self.db.read().posts.is_known(id)
    }

    pub fn len(&self) -> usize {
        self.db.read().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reply operations of a [`PostDatabase`].
#[derive(Clone, Copy)]
pub struct ReplyStore<'a> {
    db: &'a PostDatabase,
}

impl ReplyStore<'_> {
    pub fn get(&self, id: &ReplyId) -> Option<PostReply> {
        self.db.read().replies.get(id)
    }

    /// All replies written by `owner`, oldest first.
    pub fn get_by_owner(&self, owner: &IdentityId) -> Vec<PostReply> {
        oldest_first(self.db.read().replies.by_owner(owner))
    }

    /// All replies to `post`, oldest first.
    pub fn get_by_post(&self, post: &PostId) -> Vec<PostReply> {
        oldest_first(self.db.read().replies.by_key(post))
    }

    pub fn store(&self, reply: PostReply) {
        debug!(id = %reply.id(), post = %reply.post_id(), "storing reply");
        self.db.write().replies.insert(reply);
    }

    pub fn remove(&self, reply: &PostReply) {
        let removed = self.db.write().replies.remove(reply.id()).is_some();
        debug!(id = %reply.id(), removed, "removing reply");
    }

    /// Replace every reply of `owner` with `replies`.
    ///
    /// Fails without touching the store if any reply belongs to someone else.
    pub fn store_all(
        &self,
        owner: &IdentityId,
        replies: impl IntoIterator<Item = PostReply>,
    ) -> StoreResult<()> {
        let replies: Vec<PostReply> = replies.into_iter().collect();
        check_owner(owner, &replies)?;

        let mut state = self.db.write();
        let removed = state.replies.remove_owner(owner);
        let stored = replies.len();
        for reply in replies {
            state.replies.insert(reply);
        }
        drop(state);
        debug!(%owner, removed, stored, "replaced replies");
        Ok(())
    }

    pub fn remove_all(&self, owner: &IdentityId) {
        let removed = self.db.write().replies.remove_owner(owner);
        debug!(%owner, removed, "removed replies");
    }

    pub fn mark_known(&self, reply: &PostReply, known: bool) {
        self.db.write().replies.set_known(reply.id(), known);
    }

    pub fn is_known(&self, id: &ReplyId) -> bool {
        self.db.read().replies.is_known(id)
    }

    pub fn len(&self) -> usize {
        self.db.read().replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
