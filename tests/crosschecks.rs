use balanced_tree::AvlTree;
use proptest::prelude::*;

mod common;
use common::*;

// Applies a script of operations to an AvlTree and to a sorted Vec that
// keeps duplicates, checking after every step that the two agree and that
// the tree's invariants hold.
fn crosscheck<K>(ops: Vec<Op<K>>)
where
    K: Clone + Ord + std::fmt::Debug,
{
    let mut tree = AvlTree::new();
    let mut sorted: Vec<K> = Vec::new();

    for op in ops {
        match op {
            Op::Insert(k) => {
                let at = sorted.partition_point(|m| *m <= k);
                sorted.insert(at, k.clone());
                tree.insert(k);
            }

            Op::Remove(k) => {
                let removed = tree.take(&k);
                match sorted.iter().position(|m| *m == k) {
                    Some(at) => {
                        sorted.remove(at);
                        assert_eq!(removed, Some(k));
                    }
                    None => assert_eq!(removed, None),
                }
            }
        }

        tree.check().unwrap();
        assert_eq!(tree.len(), sorted.len());
        assert!(tree.iter().eq(sorted.iter()));
    }
}

proptest! {
    #[test]
    fn crosscheck_small_ints(ops in small_int_ops()) {
        crosscheck(ops);
    }

    #[test]
    fn crosscheck_dup_heavy(ops in dup_heavy_ops()) {
        crosscheck(ops);
    }

    #[test]
    fn insert_all_then_remove_all(keys in short_strings()) {
        let mut tree = AvlTree::new();
        for k in keys.iter() {
            tree.insert(k.clone());
        }
        tree.check().unwrap();
        assert_eq!(tree.len(), keys.len());

        // every inserted key is found...
        for k in keys.iter() {
            assert!(tree.contains(k.as_str()));
        }

        // ...and removing one entry per insert drains the tree
        for (done, k) in keys.iter().enumerate() {
            assert_eq!(tree.take(k.as_str()), Some(k.clone()));
            tree.check().unwrap();
            assert_eq!(tree.len(), keys.len() - done - 1);
        }
        assert!(tree.is_empty());
    }
}
