//! Validating builders for posts and replies.
//!
//! A builder needs exactly one id policy and exactly one time policy.
//! Selecting a second policy of the same kind is recorded as a conflict and
//! reported by `build()`, rather than one choice silently overriding the
//! other.
//!
//! ```
//! use agora_store::{IdPolicy, PostBuilder, TimePolicy};
//! use agora_types::Timestamp;
//!
//! let post = PostBuilder::new("s1")
//!     .id(IdPolicy::Explicit("p1".into()))
//!     .time(TimePolicy::Explicit(Timestamp::from_millis(1000)))
//!     .text("hi")
//!     .build()
//!     .unwrap();
//! assert_eq!(post.id().as_str(), "p1");
//! ```

use agora_types::{IdentityId, PostId, ReplyId, Timestamp};

use crate::entity::{Post, PostReply};
use crate::error::BuildError;

/// How the id of a new entity is chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdPolicy {
    /// Generate a fresh random id.
    Random,
    /// Use the given id, e.g. one received from the network.
    Explicit(String),
}

/// How the timestamp of a new entity is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimePolicy {
    /// Use the wall-clock time at build.
    Now,
    Explicit(Timestamp),
}

#[derive(Clone, Debug)]
enum Choice<T> {
    Unset,
    Set(T),
    Conflict,
}

impl<T> Choice<T> {
    fn select(self, value: T) -> Self {
        match self {
            Choice::Unset => Choice::Set(value),
            Choice::Set(_) | Choice::Conflict => Choice::Conflict,
        }
    }
}

fn resolve_id<I>(choice: Choice<IdPolicy>, random: fn() -> I) -> Result<I, BuildError>
where
    I: From<String>,
{
    match choice {
        Choice::Unset => Err(BuildError::MissingIdPolicy),
        Choice::Conflict => Err(BuildError::ConflictingIdPolicy),
        Choice::Set(IdPolicy::Random) => Ok(random()),
        Choice::Set(IdPolicy::Explicit(id)) if id.is_empty() => Err(BuildError::EmptyId),
        Choice::Set(IdPolicy::Explicit(id)) => Ok(I::from(id)),
    }
}

fn resolve_time(choice: Choice<TimePolicy>) -> Result<Timestamp, BuildError> {
    match choice {
        Choice::Unset => Err(BuildError::MissingTimePolicy),
        Choice::Conflict => Err(BuildError::ConflictingTimePolicy),
        Choice::Set(TimePolicy::Now) => Ok(Timestamp::now()),
        Choice::Set(TimePolicy::Explicit(time)) if time.is_zero() => Err(BuildError::ZeroTime),
        Choice::Set(TimePolicy::Explicit(time)) => Ok(time),
    }
}

/// Builder for [`Post`].
#[derive(Clone, Debug)]
pub struct PostBuilder {
    owner: IdentityId,
    recipient: Option<IdentityId>,
    id: Choice<IdPolicy>,
    time: Choice<TimePolicy>,
    text: Option<String>,
}

impl PostBuilder {
    pub fn new(owner: impl Into<IdentityId>) -> Self {
        Self {
            owner: owner.into(),
            recipient: None,
            id: Choice::Unset,
            time: Choice::Unset,
            text: None,
        }
    }

    /// Direct the post at `recipient`. A post directed at its own owner is
    /// built as an undirected post.
    pub fn to(mut self, recipient: impl Into<IdentityId>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    pub fn id(mut self, policy: IdPolicy) -> Self {
        self.id = self.id.select(policy);
        self
    }

    pub fn random_id(self) -> Self {
        self.id(IdPolicy::Random)
    }

    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.id(IdPolicy::Explicit(id.into()))
    }

    pub fn time(mut self, policy: TimePolicy) -> Self {
        self.time = self.time.select(policy);
        self
    }

    pub fn current_time(self) -> Self {
        self.time(TimePolicy::Now)
    }

    pub fn with_time(self, time: Timestamp) -> Self {
        self.time(TimePolicy::Explicit(time))
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn build(self) -> Result<Post, BuildError> {
        let id = resolve_id(self.id, PostId::random)?;
        let time = resolve_time(self.time)?;
        let text = self.text.ok_or(BuildError::MissingText)?;
        let recipient = self.recipient.filter(|r| *r != self.owner);
        Ok(Post::new(id, self.owner, recipient, time, text))
    }
}

/// Builder for [`PostReply`].
#[derive(Clone, Debug)]
pub struct ReplyBuilder {
    owner: IdentityId,
    post: Option<PostId>,
    id: Choice<IdPolicy>,
    time: Choice<TimePolicy>,
    text: Option<String>,
}

impl ReplyBuilder {
    pub fn new(owner: impl Into<IdentityId>) -> Self {
        Self {
            owner: owner.into(),
            post: None,
            id: Choice::Unset,
            time: Choice::Unset,
            text: None,
        }
    }

    /// The post being replied to. Required.
    pub fn to(mut self, post: impl Into<PostId>) -> Self {
        self.post = Some(post.into());
        self
    }

    pub fn id(mut self, policy: IdPolicy) -> Self {
        self.id = self.id.select(policy);
        self
    }

    pub fn random_id(self) -> Self {
        self.id(IdPolicy::Random)
    }

    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.id(IdPolicy::Explicit(id.into()))
    }

    pub fn time(mut self, policy: TimePolicy) -> Self {
        self.time = self.time.select(policy);
        self
    }

    pub fn current_time(self) -> Self {
        self.time(TimePolicy::Now)
    }

    pub fn with_time(self, time: Timestamp) -> Self {
        self.time(TimePolicy::Explicit(time))
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn build(self) -> Result<PostReply, BuildError> {
        let id = resolve_id(self.id, ReplyId::random)?;
        let time = resolve_time(self.time)?;
        let text = self.text.ok_or(BuildError::MissingText)?;
        let post = self.post.ok_or(BuildError::MissingPost)?;
        Ok(PostReply::new(id, self.owner, post, time, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_post() {
        let post = PostBuilder::new("s1")
            .to("s2")
            .with_id("p2")
            .with_time(Timestamp::from_millis(2000))
            .text("yo")
            .build()
            .unwrap();
        assert_eq!(post.id().as_str(), "p2");
        assert_eq!(post.owner_id().as_str(), "s1");
        assert_eq!(post.recipient_id().map(|r| r.as_str()), Some("s2"));
        assert_eq!(post.time(), Timestamp::from_millis(2000));
        assert_eq!(post.text(), "yo");
        assert!(!post.is_known());
    }

    #[test]
    fn random_id_and_current_time() {
        let before = Timestamp::now();
        let post = PostBuilder::new("s1")
            .random_id()
            .current_time()
            .text("hello")
            .build()
            .unwrap();
        assert!(!post.id().as_str().is_empty());
        assert!(post.time() >= before);
    }

    #[test]
    fn recipient_equal_to_owner_is_dropped() {
        let post = PostBuilder::new("s1")
            .to("s1")
            .random_id()
            .current_time()
            .text("note to self")
            .build()
            .unwrap();
        assert!(post.recipient_id().is_none());
    }

    #[test]
    fn missing_policies_fail() {
        let err = PostBuilder::new("s1").current_time().text("x").build().unwrap_err();
        assert_eq!(err, BuildError::MissingIdPolicy);

        let err = PostBuilder::new("s1").random_id().text("x").build().unwrap_err();
        assert_eq!(err, BuildError::MissingTimePolicy);

        let err = PostBuilder::new("s1").random_id().current_time().build().unwrap_err();
        assert_eq!(err, BuildError::MissingText);
    }

    #[test]
    fn both_options_of_a_pair_fail() {
        let err = PostBuilder::new("s1")
            .random_id()
            .with_id("p1")
            .current_time()
            .text("x")
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::ConflictingIdPolicy);

        let err = ReplyBuilder::new("s1")
            .to("p1")
            .random_id()
            .current_time()
            .with_time(Timestamp::from_millis(5))
            .text("x")
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::ConflictingTimePolicy);
    }

    #[test]
    fn repeating_a_policy_is_reported_as_conflict() {
        let err = PostBuilder::new("s1")
            .random_id()
            .random_id()
            .current_time()
            .text("x")
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::ConflictingIdPolicy);
        assert_eq!(err.to_string(), "more than one id policy selected");

        let err = ReplyBuilder::new("s1")
            .to("p1")
            .random_id()
            .current_time()
            .current_time()
            .text("x")
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "more than one time policy selected");
    }

    #[test]
    fn explicit_values_are_checked() {
        let err = PostBuilder::new("s1")
            .with_id("")
            .current_time()
            .text("x")
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::EmptyId);

        let err = PostBuilder::new("s1")
            .random_id()
            .with_time(Timestamp::from_millis(0))
            .text("x")
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::ZeroTime);
    }

    #[test]
    fn reply_requires_post() {
        let err = ReplyBuilder::new("s1")
            .random_id()
            .current_time()
            .text("x")
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::MissingPost);

        let reply = ReplyBuilder::new("s2")
            .to("p1")
            .with_id("r1")
            .with_time(Timestamp::from_millis(3000))
            .text("re: hi")
            .build()
            .unwrap();
        assert_eq!(reply.post_id().as_str(), "p1");
        assert_eq!(reply.owner_id().as_str(), "s2");
    }
}
