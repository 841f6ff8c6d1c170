use serde::{Deserialize, Serialize};

use agora_types::IdentityId;

use crate::error::{ConfigError, ConfigResult};

/// Key prefixes under which the stores persist their facts.
///
/// Every field has a default, so a partial TOML document only overrides
/// what it names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyLayout {
    /// Id list of bookmarked posts.
    pub bookmarks: String,
    /// Id list of posts already surfaced to the user.
    pub known_posts: String,
    /// Id list of replies already surfaced to the user.
    pub known_replies: String,
    /// Root of per-identity friend lists: `<friends>/<local>/Friends`.
    pub friends: String,
    /// Root of first-followed times: `<following_times>/<friend>/Time`.
    pub following_times: String,
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self {
            bookmarks: "Bookmarks/Post".into(),
            known_posts: "KnownPosts".into(),
            known_replies: "KnownReplies".into(),
            friends: "Identities".into(),
            following_times: "FollowingTimes".into(),
        }
    }
}

impl KeyLayout {
    /// Parse a layout from a TOML document.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        toml::from_str(s).map_err(|e| ConfigError::Layout(e.to_string()))
    }

    /// Prefix of the friend list of `local`.
    pub fn friends_of(&self, local: &IdentityId) -> String {
        format!("{}/{local}/Friends", self.friends)
    }

    /// Key of the first-followed time of `friend`.
    pub fn following_time_of(&self, friend: &IdentityId) -> String {
        format!("{}/{friend}/Time", self.following_times)
    }
}
