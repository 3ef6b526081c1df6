//! # An ordered-key collection kept balanced with AVL rotations
//!
//! `balanced-tree` provides [`AvlTree`], an ordered collection of keys backed
//! by an [AVL tree](https://en.wikipedia.org/wiki/AVL_tree).  Every mutation
//! restores the height-balance invariant before it returns, so lookups,
//! insertions, and removals are all logarithmic in the number of stored keys.
//!
//! Keys that compare equal may be stored more than once: an insert of a key
//! that is already present adds a second entry rather than replacing the
//! first.  Callers that want set semantics can test with
//! [`AvlTree::contains`] before inserting.

mod avl;
pub use avl::AvlTree;
pub use avl::Iter;
