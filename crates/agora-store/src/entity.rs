//! Post and reply value objects.
//!
//! Entities are created by the builders in [`crate::builder`] and are
//! immutable afterwards, except for the known flag which only the store
//! sets.

use std::hash::Hash;

use serde::Serialize;

use agora_types::{IdentityId, PostId, ReplyId, Timestamp};

use crate::resolver::OwnerResolver;

/// Common view of anything the database indexes.
pub trait Entity: Clone + Send + Sync {
    /// Primary key.
    type Id: Clone + Eq + Hash + Ord + AsRef<str> + From<String> + Send + Sync;
    /// Key of the secondary index (recipient for posts, parent post for
    /// replies).
    type IndexKey: Clone + Eq + Hash + Send + Sync;

    fn id(&self) -> &Self::Id;
    fn owner_id(&self) -> &IdentityId;
    fn index_key(&self) -> Option<&Self::IndexKey>;
    fn time(&self) -> Timestamp;
    fn is_known(&self) -> bool;
}

/// Store-side access to the known flag.
pub(crate) trait KnownFlag {
    fn set_known(&mut self, known: bool);
}

/// A post, optionally directed at a recipient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Post {
    id: PostId,
    owner: IdentityId,
    recipient: Option<IdentityId>,
    time: Timestamp,
    text: String,
    #[serde(skip)]
    known: bool,
}

impl Post {
    pub(crate) fn new(
        id: PostId,
        owner: IdentityId,
        recipient: Option<IdentityId>,
        time: Timestamp,
        text: String,
    ) -> Self {
        Self {
            id,
            owner,
            recipient,
            time,
            text,
            known: false,
        }
    }

    pub fn id(&self) -> &PostId {
        &self.id
    }

    pub fn owner_id(&self) -> &IdentityId {
        &self.owner
    }

    pub fn recipient_id(&self) -> Option<&IdentityId> {
        self.recipient.as_ref()
    }

    pub fn time(&self) -> Timestamp {
        self.time
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the post has already been surfaced to the user.
    pub fn is_known(&self) -> bool {
        self.known
    }

    /// Resolve the full owner record.
    pub fn owner<R: OwnerResolver>(&self, resolver: &R) -> Option<R::Owner> {
        resolver.resolve_owner(&self.owner)
    }

    /// Resolve the full recipient record, if the post is directed.
    pub fn recipient<R: OwnerResolver>(&self, resolver: &R) -> Option<R::Owner> {
        self.recipient
            .as_ref()
            .and_then(|recipient| resolver.resolve_owner(recipient))
    }
}

impl Entity for Post {
    type Id = PostId;
    type IndexKey = IdentityId;

    fn id(&self) -> &PostId {
        Post::id(self)
    }

    fn owner_id(&self) -> &IdentityId {
        Post::owner_id(self)
    }

    fn index_key(&self) -> Option<&IdentityId> {
        self.recipient_id()
    }

    fn time(&self) -> Timestamp {
        self.time
    }

    fn is_known(&self) -> bool {
        self.known
    }
}

impl KnownFlag for Post {
    fn set_known(&mut self, known: bool) {
        self.known = known;
    }
}

/// A reply to a post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PostReply {
    id: ReplyId,
    owner: IdentityId,
    post_id: PostId,
    time: Timestamp,
    text: String,
    #[serde(skip)]
    known: bool,
}

impl PostReply {
    pub(crate) fn new(
        id: ReplyId,
        owner: IdentityId,
        post_id: PostId,
        time: Timestamp,
        text: String,
    ) -> Self {
        Self {
            id,
            owner,
            post_id,
            time,
            text,
            known: false,
        }
    }

    pub fn id(&self) -> &ReplyId {
        &self.id
    }

    pub fn owner_id(&self) -> &IdentityId {
        &self.owner
    }

    /// The post this reply answers.
    pub fn post_id(&self) -> &PostId {
        &self.post_id
    }

    pub fn time(&self) -> Timestamp {
        self.time
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_known(&self) -> bool {
        self.known
    }

    pub fn owner<R: OwnerResolver>(&self, resolver: &R) -> Option<R::Owner> {
        resolver.resolve_owner(&self.owner)
    }
}

impl Entity for PostReply {
    type Id = ReplyId;
    type IndexKey = PostId;

    fn id(&self) -> &ReplyId {
        PostReply::id(self)
    }

    fn owner_id(&self) -> &IdentityId {
        PostReply::owner_id(self)
    }

    fn index_key(&self) -> Option<&PostId> {
        Some(&self.post_id)
    }

    fn time(&self) -> Timestamp {
        self.time
    }

    fn is_known(&self) -> bool {
        self.known
    }
}

impl KnownFlag for PostReply {
    fn set_known(&mut self, known: bool) {
        self.known = known;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Clone, Debug, PartialEq)]
    struct Profile {
        name: &'static str,
    }

    fn directory() -> HashMap<IdentityId, Profile> {
        HashMap::from([
            (IdentityId::from("s1"), Profile { name: "alice" }),
            (IdentityId::from("s2"), Profile { name: "bob" }),
        ])
    }

    #[test]
    fn owner_is_resolved_lazily() {
        let post = Post::new(
            PostId::from("p1"),
            IdentityId::from("s1"),
            Some(IdentityId::from("s2")),
            Timestamp::from_millis(1000),
            "hi".into(),
        );
        let dir = directory();
        assert_eq!(post.owner(&dir).unwrap().name, "alice");
        assert_eq!(post.recipient(&dir).unwrap().name, "bob");
    }

    #[test]
    fn unknown_owner_resolves_to_none() {
        let reply = PostReply::new(
            ReplyId::from("r1"),
            IdentityId::from("stranger"),
            PostId::from("p1"),
            Timestamp::from_millis(1),
            "?".into(),
        );
        assert!(reply.owner(&directory()).is_none());
        assert_eq!(Entity::index_key(&reply), Some(&PostId::from("p1")));
    }

    #[test]
    fn known_flag_starts_cleared() {
        let mut post = Post::new(
            PostId::from("p1"),
            IdentityId::from("s1"),
            None,
            Timestamp::from_millis(1),
            "x".into(),
        );
        assert!(!post.is_known());
        post.set_known(true);
        assert!(post.is_known());
    }
}
