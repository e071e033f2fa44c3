#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    #[error("key count error {0}")]
    KeyCount(&'static str),

    #[error("child count error {0}")]
    ChildCount(&'static str),

    #[error("key ordering error {0}")]
    KeyOrdering(&'static str),

    #[error("subtree maximum error {0}")]
    SubtreeMaximum(&'static str),

    #[error("parent link error {0}")]
    ParentLink(&'static str),

    #[error("leaf depth error {0}")]
    LeafDepth(&'static str),

    #[error("arena error {0}")]
    Arena(&'static str),
}
