use agora_types::IdentityId;

/// Errors produced by store mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A bulk replace named an owner that does not own every entity.
    #[error("{id} is owned by {actual}, not {owner}")]
    OwnershipViolation {
        owner: IdentityId,
        id: String,
        actual: IdentityId,
    },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced when a builder is asked to build an invalid entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("no id policy selected")]
    MissingIdPolicy,

    #[error("more than one id policy selected")]
    ConflictingIdPolicy,

    #[error("explicit id must not be empty")]
    EmptyId,

    #[error("no time policy selected")]
    MissingTimePolicy,

    #[error("more than one time policy selected")]
    ConflictingTimePolicy,

    #[error("explicit time must not be zero")]
    ZeroTime,

    #[error("text is required")]
    MissingText,

    #[error("reply does not name its post")]
    MissingPost,
}
