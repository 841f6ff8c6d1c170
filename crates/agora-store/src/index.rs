//! The denormalized index set behind one entity type.
//!
//! [`EntityIndex`] is plain data; the owning [`PostDatabase`] wraps it in
//! its lock. Buckets hold ids, never entities, so an entity appears at most
//! once per bucket and the primary map stays the single source of values.
//!
//! [`PostDatabase`]: crate::database::PostDatabase

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use agora_types::IdentityId;

use crate::entity::{Entity, KnownFlag};

pub(crate) struct EntityIndex<E: Entity> {
    by_id: HashMap<E::Id, E>,
    by_owner: HashMap<IdentityId, HashSet<E::Id>>,
    by_key: HashMap<E::IndexKey, HashSet<E::Id>>,
    known: HashSet<E::Id>,
}

impl<E: Entity> Default for EntityIndex<E> {
    fn default() -> Self {
        Self {
            by_id: HashMap::new(),
            by_owner: HashMap::new(),
            by_key: HashMap::new(),
            known: HashSet::new(),
        }
    }
}

fn link<K, I>(buckets: &mut HashMap<K, HashSet<I>>, key: &K, id: &I)
where
    K: Clone + Eq + Hash,
    I: Clone + Eq + Hash,
{
    buckets.entry(key.clone()).or_default().insert(id.clone());
}

fn unlink<K, I>(buckets: &mut HashMap<K, HashSet<I>>, key: &K, id: &I)
where
    K: Eq + Hash,
    I: Eq + Hash,
{
    if let Some(bucket) = buckets.get_mut(key) {
        bucket.remove(id);
        if bucket.is_empty() {
            buckets.remove(key);
        }
    }
}

impl<E: Entity + KnownFlag> EntityIndex<E> {
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    fn snapshot(&self, entity: &E) -> E {
        let mut copy = entity.clone();
        copy.set_known(self.known.contains(entity.id()));
        copy
    }

    fn collect<'a>(&'a self, ids: Option<&'a HashSet<E::Id>>) -> Vec<E> {
        ids.into_iter()
            .flatten()
            .filter_map(|id| self.by_id.get(id))
            .map(|entity| self.snapshot(entity))
            .collect()
    }

    pub fn get(&self, id: &E::Id) -> Option<E> {
        self.by_id.get(id).map(|entity| self.snapshot(entity))
    }

    pub fn by_owner(&self, owner: &IdentityId) -> Vec<E> {
        self.collect(self.by_owner.get(owner))
    }

    pub fn by_key(&self, key: &E::IndexKey) -> Vec<E> {
        self.collect(self.by_key.get(key))
    }

    /// Insert or replace `entity`, moving its index entries if the owner or
    /// secondary key changed.
    pub fn insert(&mut self, entity: E) {
        let id = entity.id().clone();
        self.remove(&id);
        link(&mut self.by_owner, entity.owner_id(), &id);
        if let Some(key) = entity.index_key() {
            link(&mut self.by_key, key, &id);
        }
        self.by_id.insert(id, entity);
    }

    /// Remove the entity stored under `id` from every index. The known set
    /// is left alone.
    pub fn remove(&mut self, id: &E::Id) -> Option<E> {
        let previous = self.by_id.remove(id)?;
        unlink(&mut self.by_owner, previous.owner_id(), id);
        if let Some(key) = previous.index_key() {
            unlink(&mut self.by_key, key, id);
        }
        Some(previous)
    }

    /// Remove every entity owned by `owner`, returning how many went.
    pub fn remove_owner(&mut self, owner: &IdentityId) -> usize {
        let Some(ids) = self.by_owner.remove(owner) else {
            return 0;
        };
        for id in &ids {
            if let Some(previous) = self.by_id.remove(id) {
                if let Some(key) = previous.index_key() {
                    unlink(&mut self.by_key, key, id);
                }
            }
        }
        ids.len()
    }

    pub fn set_known(&mut self, id: &E::Id, known: bool) -> bool {
        if known {
            self.known.insert(id.clone())
        } else {
            self.known.remove(id)
        }
    }

    pub fn is_known(&self, id: &E::Id) -> bool {
        self.known.contains(id)
    }

    pub fn known_ids(&self) -> Vec<E::Id> {
        self.known.iter().cloned().collect()
    }

    pub fn replace_known(&mut self, ids: HashSet<E::Id>) {
        self.known = ids;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::PostBuilder;
    use crate::entity::Post;
    use agora_types::{PostId, Timestamp};

    fn post(id: &str, owner: &str, recipient: Option<&str>) -> Post {
        let mut builder = PostBuilder::new(owner)
            .with_id(id)
            .with_time(Timestamp::from_millis(1000))
            .text("t");
        if let Some(r) = recipient {
            builder = builder.to(r);
        }
        builder.build().unwrap()
    }

    #[test]
    fn reinsert_moves_secondary_entry() {
        let mut index = EntityIndex::<Post>::default();
        index.insert(post("p1", "s1", Some("s2")));
        index.insert(post("p1", "s1", Some("s3")));

        assert!(index.by_key(&IdentityId::from("s2")).is_empty());
        assert_eq!(index.by_key(&IdentityId::from("s3")).len(), 1);
        assert_eq!(index.by_owner(&IdentityId::from("s1")).len(), 1);
        assert!(!index.by_key.contains_key("s2"));
    }

    #[test]
    fn remove_owner_clears_all_buckets() {
        let mut index = EntityIndex::<Post>::default();
        index.insert(post("p1", "s1", Some("s2")));
        index.insert(post("p2", "s1", None));
        index.insert(post("p3", "s9", Some("s2")));

        assert_eq!(index.remove_owner(&IdentityId::from("s1")), 2);
        assert_eq!(index.len(), 1);
        assert_eq!(index.by_key(&IdentityId::from("s2")).len(), 1);
        assert_eq!(index.remove_owner(&IdentityId::from("s1")), 0);
    }

    #[test]
    fn known_flag_is_merged_into_snapshots() {
        let mut index = EntityIndex::<Post>::default();
        index.insert(post("p1", "s1", None));
        assert!(index.set_known(&PostId::from("p1"), true));
        assert!(!index.set_known(&PostId::from("p1"), true));

        assert!(index.get(&PostId::from("p1")).unwrap().is_known());
        index.remove(&PostId::from("p1"));
        assert!(index.is_known(&PostId::from("p1")));
    }
}
