use std::collections::HashMap;

use agora_types::IdentityId;

/// Resolves an identity id to the full owner record kept by identity
/// management.
///
/// Entities only store owner ids; the owner accessor calls the resolver at
/// the time it is invoked, so the store never depends on identity
/// internals.
pub trait OwnerResolver: Send + Sync {
    type Owner;

    /// Returns `None` if the identity is unknown to this node.
    fn resolve_owner(&self, id: &IdentityId) -> Option<Self::Owner>;
}

impl<O> OwnerResolver for HashMap<IdentityId, O>
where
    O: Clone + Send + Sync,
{
    type Owner = O;

    fn resolve_owner(&self, id: &IdentityId) -> Option<O> {
        self.get(id).cloned()
    }
}
