use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier without validation.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Wrap a raw identifier, rejecting the empty string.
            pub fn parse(id: impl Into<String>) -> Result<Self, TypeError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(TypeError::EmptyId);
                }
                Ok(Self(id))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(
    /// Identity of a participant in the overlay, local or remote.
    IdentityId
);

opaque_id!(
    /// Globally unique identifier of a post.
    PostId
);

opaque_id!(
    /// Globally unique identifier of a reply.
    ReplyId
);

impl PostId {
    /// Generate a fresh random post id.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl ReplyId {
    /// Generate a fresh random reply id.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(PostId::parse(""), Err(TypeError::EmptyId));
        assert_eq!(IdentityId::parse("sone-1").unwrap().as_str(), "sone-1");
    }

    #[test]
    fn random_ids_are_unique() {
        let ids: HashSet<PostId> = (0..64).map(|_| PostId::random()).collect();
        assert_eq!(ids.len(), 64);
        assert_ne!(ReplyId::random(), ReplyId::random());
    }

    #[test]
    fn lookup_by_str() {
        let mut set = HashSet::new();
        set.insert(IdentityId::from("alice"));
        assert!(set.contains("alice"));
    }

    #[test]
    fn debug_and_display() {
        let id = ReplyId::from("r1");
        assert_eq!(format!("{id:?}"), "ReplyId(r1)");
        assert_eq!(id.to_string(), "r1");
    }
}
