/// Identifier for a branch in a [`crate::tree::BranchTree`].
///
/// This is an index into the tree's branch arena, and is only meaningful
/// within the lifetime of a given `BranchTree` instance. Ids are handed out
/// in creation order, so the root is always `0` and a child's id is always
/// greater than its parent's.
pub type BranchId = usize;
