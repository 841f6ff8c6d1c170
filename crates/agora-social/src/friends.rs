//! Per-identity friend lists with lazy hydration.
//!
//! Friend lists are loaded per local identity on first access rather than
//! eagerly: a node holds few local identities and most queries concern the
//! active ones. Whether anyone still follows an identity is answered by
//! scanning the lists loaded so far.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use agora_config::{IdListCodec, KeyLayout};
use agora_types::{IdentityId, Timestamp};

use crate::hydrate::HydrationCache;

/// The "follows" relation from local identities to any identity.
pub struct FriendGraphStore {
    codec: IdListCodec,
    layout: KeyLayout,
    hydration: HydrationCache<IdentityId>,
    persist: Mutex<()>,
    friends: RwLock<HashMap<IdentityId, HashSet<IdentityId>>>,
}

impl FriendGraphStore {
    pub fn new(codec: IdListCodec, layout: KeyLayout) -> Self {
        Self {
            codec,
            layout,
            hydration: HydrationCache::new(),
            persist: Mutex::new(()),
            friends: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<IdentityId, HashSet<IdentityId>>> {
        self.friends.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<IdentityId, HashSet<IdentityId>>> {
        self.friends.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make sure the friend list of `local` is in memory.
    fn hydrate(&self, local: &IdentityId) {
        if self.read().contains_key(local) {
            return;
        }
        self.hydration.hydrate(local, || {
            debug!(%local, "hydrating friend list");
            let loaded: HashSet<IdentityId> = self.codec.load_ids(&self.layout.friends_of(local));
            self.write().entry(local.clone()).or_insert(loaded);
        });
    }

    /// All identities `local` follows.
    pub fn get_friends(&self, local: &IdentityId) -> HashSet<IdentityId> {
        self.hydrate(local);
        self.read().get(local).cloned().unwrap_or_default()
    }

    pub fn is_friend(&self, local: &IdentityId, friend: &IdentityId) -> bool {
        self.hydrate(local);
        self.read()
            .get(local)
            .is_some_and(|friends| friends.contains(friend))
    }

    /// Make `local` follow `friend`.
    ///
    /// Returns `false` if it already did. A newly followed identity without
    /// a recorded following time gets the current time.
    pub fn add_friend(&self, local: &IdentityId, friend: &IdentityId) -> bool {
        self.hydrate(local);
        let _persist = self.persist.lock().unwrap_or_else(PoisonError::into_inner);

        let snapshot = {
            let mut friends = self.write();
            let bucket = friends.entry(local.clone()).or_default();
            if !bucket.insert(friend.clone()) {
                return false;
            }
            bucket.clone()
        };
        debug!(%local, %friend, "friend added");

        self.codec.save_ids(&self.layout.friends_of(local), &snapshot);
        if self.get_following_time(friend).is_none() {
            self.set_following_time(friend, Some(Timestamp::now()));
        }
        true
    }

    /// Make `local` stop following `friend`.
    ///
    /// Returns `false` if it did not follow. Once no loaded local identity
    /// follows `friend`, its following time is cleared.
    ///
    /// Only friend lists already hydrated are scanned. A local identity
    /// whose list has not been loaded yet may still follow `friend` in the
    /// backend, and the following time is cleared regardless; hydrate every
    /// local identity first (e.g. with [`get_friends`](Self::get_friends))
    /// if that matters.
    pub fn remove_friend(&self, local: &IdentityId, friend: &IdentityId) -> bool {
        self.hydrate(local);
        let _persist = self.persist.lock().unwrap_or_else(PoisonError::into_inner);

        let (snapshot, still_followed) = {
            let mut friends = self.write();
            let Some(bucket) = friends.get_mut(local) else {
                return false;
            };
            if !bucket.remove(friend) {
                return false;
            }
            let snapshot = bucket.clone();
            let still_followed = friends.values().any(|bucket| bucket.contains(friend));
            (snapshot, still_followed)
        };
        debug!(%local, %friend, still_followed, "friend removed");

        self.codec.save_ids(&self.layout.friends_of(local), &snapshot);
        if !still_followed {
            self.set_following_time(friend, None);
        }
        true
    }

    /// When `friend` was first followed by any local identity.
    pub fn get_following_time(&self, friend: &IdentityId) -> Option<Timestamp> {
        let key = self.layout.following_time_of(friend);
        match self.codec.backend().get_u64(&key) {
            Ok(millis) => millis.map(Timestamp::from_millis),
            Err(e) => {
                warn!(%key, error = %e, "unreadable following time");
                None
            }
        }
    }

    fn set_following_time(&self, friend: &IdentityId, time: Option<Timestamp>) {
        let key = self.layout.following_time_of(friend);
        if let Err(e) = self
            .codec
            .backend()
            .set_u64(&key, time.map(|t| t.as_millis()))
        {
            warn!(%key, error = %e, "failed to save following time");
        }
    }
}

impl std::fmt::Debug for FriendGraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FriendGraphStore")
            .field("loaded_identities", &self.read().len())
            .finish()
    }
}
