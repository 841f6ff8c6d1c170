use std::sync::Arc;

use tracing::info;

use agora_config::{ConfigBackend, IdListCodec, KeyLayout};
use agora_social::{BookmarkStore, FriendGraphStore};
use agora_store::{Post, PostBuilder, PostDatabase, PostReply, ReplyBuilder};
use agora_types::IdentityId;

use crate::error::SdkResult;

/// Every store of a node, wired to one configuration backend.
pub struct Database {
    codec: IdListCodec,
    posts: Arc<PostDatabase>,
    friends: FriendGraphStore,
    bookmarks: BookmarkStore,
}

impl Database {
    pub fn new(backend: Arc<dyn ConfigBackend>, layout: KeyLayout) -> Self {
        let codec = IdListCodec::new(backend);
        let posts = Arc::new(PostDatabase::new(layout.clone()));
        let bookmarks = BookmarkStore::new(codec.clone(), layout.bookmarks.clone(), posts.clone());
        let friends = FriendGraphStore::new(codec.clone(), layout);
        Self {
            codec,
            posts,
            friends,
            bookmarks,
        }
    }

    /// Build a database whose key layout is read from a TOML document.
    pub fn with_layout_toml(backend: Arc<dyn ConfigBackend>, layout: &str) -> SdkResult<Self> {
        let layout = KeyLayout::from_toml_str(layout)?;
        Ok(Self::new(backend, layout))
    }

    pub fn posts(&self) -> &Arc<PostDatabase> {
        &self.posts
    }

    pub fn friends(&self) -> &FriendGraphStore {
        &self.friends
    }

    pub fn bookmarks(&self) -> &BookmarkStore {
        &self.bookmarks
    }

    /// Hydrate known sets and bookmarks. Friend lists hydrate lazily.
    pub fn start(&self) {
        self.posts.start(&self.codec);
        self.bookmarks.start();
        info!("database started");
    }

    /// Persist known sets and bookmarks.
    pub fn save(&self) {
        self.posts.save(&self.codec);
        self.bookmarks.stop();
    }

    pub fn stop(&self) {
        self.save();
        info!("database stopped");
    }

    /// Build a new post authored now with a random id, and store it.
    pub fn create_post(
        &self,
        owner: &IdentityId,
        recipient: Option<&IdentityId>,
        text: &str,
    ) -> SdkResult<Post> {
        let mut builder = PostBuilder::new(owner.clone())
            .random_id()
            .current_time()
            .text(text);
        if let Some(recipient) = recipient {
            builder = builder.to(recipient.clone());
        }
        let post = builder.build()?;
        self.posts.posts().store(post.clone());
        Ok(post)
    }

    /// Build a new reply to `post` authored now with a random id, and
    /// store it.
    pub fn create_reply(&self, owner: &IdentityId, post: &Post, text: &str) -> SdkResult<PostReply> {
        let reply = ReplyBuilder::new(owner.clone())
            .to(post.id().clone())
            .random_id()
            .current_time()
            .text(text)
            .build()?;
        self.posts.replies().store(reply.clone());
        Ok(reply)
    }

    /// Remove a post, then its replies and any bookmark of it.
    ///
    /// These are separate operations on separate stores; a reader may
    /// observe the post gone while its replies remain.
    pub fn delete_post(&self, post: &Post) {
        self.posts.posts().remove(post);
        for reply in self.posts.replies().get_by_post(post.id()) {
            self.posts.replies().remove(&reply);
        }
        self.bookmarks.unbookmark_post(post);
    }

    /// Replace everything `owner` has published. Nothing changes unless
    /// every post and reply belongs to `owner`.
    pub fn replace_content(
        &self,
        owner: &IdentityId,
        posts: Vec<Post>,
        replies: Vec<PostReply>,
    ) -> SdkResult<()> {
        self.posts.replace_owner(owner, posts, replies)?;
        Ok(())
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("posts", &self.posts)
            .field("friends", &self.friends)
            .field("bookmarks", &self.bookmarks)
            .finish()
    }
}
