#![warn(missing_docs)]
use std::borrow::Borrow;
use std::cmp::Ordering::*;
use std::fmt::{Debug, Formatter};
use std::iter::FusedIterator;
use std::mem::replace;

type OptNode<K> = Option<Box<Node<K>>>;
struct IsShorter(bool);
struct IsTaller(bool);

#[cfg(test)]
macro_rules! chk_tree {
    ( $x:expr ) => {{
        let t = $x;
        t.check().unwrap();
        t
    }};
}

#[cfg(not(test))]
macro_rules! chk_tree {
    ( $x:expr ) => {{
        $x
    }};
}

struct Node<K> {
    key: K,
    left_ht: i8,
    right_ht: i8,
    left: OptNode<K>,
    right: OptNode<K>,
}

impl<K> Node<K> {
    fn new(key: K) -> Self {
        Node {
            key,
            left_ht: 0,
            right_ht: 0,
            left: None,
            right: None,
        }
    }

    // Returns the "balance factor" of the node
    fn bal(&self) -> i8 {
        self.right_ht - self.left_ht
    }

    // Is the given node balanced, that is -1 <= self.bal() <= 1 ?
    fn is_bal(&self) -> bool {
        // single-branch range inclusion check; requires unsigned wrap around
        ((self.bal() + 1) as u8) <= 2
    }

    fn height(&self) -> i8 {
        self.left_ht.max(self.right_ht) + 1
    }

    fn for_each<F>(&self, g: &mut F)
    where
        F: FnMut(&K),
    {
        if let Some(n) = self.left.as_ref() {
            n.for_each(g);
        }

        g(&self.key);

        if let Some(n) = self.right.as_ref() {
            n.for_each(g);
        }
    }
}

impl<K: Clone> Clone for Node<K> {
    fn clone(&self) -> Self {
        Node {
            key: self.key.clone(),
            left_ht: self.left_ht,
            right_ht: self.right_ht,
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }
}

impl<K: Debug> Debug for Node<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("(ht: {} {:?} ", self.height(), self.key))?;

        match &self.left {
            None => f.write_str(".")?,
            Some(lf) => lf.fmt(f)?,
        }

        f.write_str(" ")?;

        match &self.right {
            None => f.write_str(".")?,
            Some(rt) => rt.fmt(f)?,
        }

        f.write_str(")")
    }
}

// Validates the subtree rooted at n: ordering within the admissible key
// range, balance at every node, and cached heights that match recomputed
// ones.  Returns the recomputed height and node count.
//
// Keys that compare equal sit down right spines, so the range is half-open:
// lo is admissible, hi is not.
fn check_node<K: Ord>(
    n: &Node<K>,
    lo: Option<&K>,
    hi: Option<&K>,
) -> Result<(i8, usize), &'static str> {
    if lo.map_or(false, |k| &n.key < k) {
        return Err("key is below the admissible range of its position");
    }

    if hi.map_or(false, |k| &n.key >= k) {
        return Err("key is not below its left-side ancestor");
    }

    let (lf_ht, lf_cnt) = match n.left.as_deref() {
        None => (0, 0),
        Some(lf) => check_node(lf, lo, Some(&n.key))?,
    };

    let (rt_ht, rt_cnt) = match n.right.as_deref() {
        None => (0, 0),
        Some(rt) => check_node(rt, Some(&n.key), hi)?,
    };

    if lf_ht != n.left_ht {
        return Err("cached left height is stale");
    }

    if rt_ht != n.right_ht {
        return Err("cached right height is stale");
    }

    if !n.is_bal() {
        return Err("node is unbalanced");
    }

    Ok((n.height(), lf_cnt + rt_cnt + 1))
}

fn rot_lf<K>(root: &mut OptNode<K>) -> IsShorter {
    // We want the following transformation:
    //    a(x, b(y, z)))   =>   b(a(x, y), z)
    // x and z retain the same parents.

    let mut a = root.take().unwrap();
    let mut b = a.right.take().unwrap();

    // if b is balanced, the rotation will make a shorter tree
    let b_was_bal = b.bal() == 0;

    // move y from b to a
    a.right_ht = b.left_ht;
    a.right = b.left.take();

    // make a be b's left child
    b.left_ht = a.height();
    b.left = Some(a);

    // install b as the new root
    *root = Some(b);

    IsShorter(!b_was_bal)
}

fn rot_rt_lf<K>(root: &mut OptNode<K>) -> IsShorter {
    // We want the following transformation:
    //    a(x, b(c(y, z), w))   =>   c(a(x, y), b(z, w))
    // x and w retain the same parents.

    let mut a = root.take().unwrap();
    let mut b = a.right.take().unwrap();
    let mut c = b.left.take().unwrap();

    // With the unlinks we've done, we have
    //   a(x, None)
    //   b(None, w)
    //   c(y, z)

    // move c's children to a and b
    a.right_ht = c.left_ht;
    a.right = c.left.take();

    b.left_ht = c.right_ht;
    b.left = c.right.take();

    // move a and b into c
    c.left_ht = a.height();
    c.left = Some(a);

    c.right_ht = b.height();
    c.right = Some(b);

    // install c as the new root
    *root = Some(c);

    // this rebalance always makes the tree shorter
    IsShorter(true)
}

fn rot_rt<K>(root: &mut OptNode<K>) -> IsShorter {
    // We want the following transformation:
    //    a(b(x, y), z)   =>   b(x, a(y, z))
    // x and z retain the same parents.

    let mut a = root.take().unwrap();
    let mut b = a.left.take().unwrap();

    let b_was_bal = b.bal() == 0;

    // We have
    //   a(None, z)
    //   b(x, y)

    // move y from b to a
    a.left_ht = b.right_ht;
    a.left = b.right.take();

    // move a into b
    b.right_ht = a.height();
    b.right = Some(a);

    // install b as the new root
    *root = Some(b);

    IsShorter(!b_was_bal)
}

fn rot_lf_rt<K>(root: &mut OptNode<K>) -> IsShorter {
    // We want the following transformation:
    //    a(b(x,c(y,z)),w)   =>   c(b(x,y),a(z,w))
    // x and w retain the same parents.

    let mut a = root.take().unwrap();
    let mut b = a.left.take().unwrap();
    let mut c = b.right.take().unwrap();

    // We have:
    //   a(None, w)
    //   b(x, None)
    //   c(y, z)

    b.right_ht = c.left_ht;
    b.right = c.left.take(); // => b(x, y), c(None, z)

    a.left_ht = c.right_ht;
    a.left = c.right.take(); // => a(z, w), c(None, None)

    c.left_ht = b.height();
    c.left = Some(b); // => c(b(x, y), None)

    c.right_ht = a.height();
    c.right = Some(a); // => c(b(x, y), a(z, w))

    *root = Some(c);

    IsShorter(true)
}

// rebalance by "shifting height" from left to right
fn rebal_lf_to_rt<K>(root: &mut OptNode<K>) -> IsShorter {
    let n = root.as_ref().unwrap();

    if n.left.as_ref().unwrap().bal() <= 0 {
        rot_rt(root)
    } else {
        rot_lf_rt(root)
    }
}

// rebalance by "shifting height" from right to left
fn rebal_rt_to_lf<K>(root: &mut OptNode<K>) -> IsShorter {
    let n = root.as_ref().unwrap();

    if n.right.as_ref().unwrap().bal() >= 0 {
        rot_lf(root)
    } else {
        rot_rt_lf(root)
    }
}

// Inserts key into the tree rooted at root and returns whether the updated
// node is taller as a result of the insertion.
fn ins<K: Ord>(root: &mut OptNode<K>, key: K) -> IsTaller {
    let n = match root.as_mut() {
        None => {
            *root = Some(Box::new(Node::new(key)));
            return IsTaller(true); // *** EARLY RETURN ***
        }

        Some(n) => n,
    };

    if key < n.key {
        let is_taller = ins(&mut n.left, key);
        n.left_ht += is_taller.0 as i8;
        if is_taller.0 && n.bal() < -1 {
            rebal_lf_to_rt(root);
            IsTaller(false)
        } else {
            IsTaller(is_taller.0 && n.bal() < 0)
        }
    } else {
        // keys that compare equal descend to the right
        let is_taller = ins(&mut n.right, key);
        n.right_ht += is_taller.0 as i8;
        if is_taller.0 && n.bal() > 1 {
            rebal_rt_to_lf(root);
            IsTaller(false)
        } else {
            IsTaller(is_taller.0 && n.bal() > 0)
        }
    }
}

// helper function for remove that removes the leftmost node and returns both
// its key and whether or not the removal made the tree shorter.
fn rm_leftmost<K: Ord>(root: &mut OptNode<K>) -> (Option<K>, IsShorter) {
    let n = match root.as_mut() {
        None => return (None, IsShorter(false)), // *** EARLY RETURN ***
        Some(n) => n,
    };

    if n.left.is_some() {
        let (k, is_shorter) = rm_leftmost(&mut n.left);
        n.left_ht -= is_shorter.0 as i8;
        if is_shorter.0 && n.bal() > 1 {
            (k, rebal_rt_to_lf(root))
        } else {
            (k, IsShorter(is_shorter.0 && n.bal() == 0))
        }
    } else {
        let old_n = *root.take().unwrap();
        *root = old_n.right;
        (Some(old_n.key), IsShorter(true))
    }
}

// removes one key matching k from the tree and returns it along with whether
// the tree at root is shorter as a result of the removal.
fn rm<K, Q>(root: &mut OptNode<K>, k: &Q) -> (Option<K>, IsShorter)
where
    K: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    let n = match root.as_mut() {
        None => return (None, IsShorter(false)), // *** EARLY RETURN ***
        Some(n) => n,
    };

    match k.cmp(n.key.borrow()) {
        Less => {
            let (removed, is_shorter) = rm(&mut n.left, k);
            n.left_ht -= is_shorter.0 as i8;
            if is_shorter.0 && n.bal() > 1 {
                (removed, rebal_rt_to_lf(root))
            } else {
                (removed, IsShorter(is_shorter.0 && n.bal() == 0))
            }
        }

        Greater => {
            let (removed, is_shorter) = rm(&mut n.right, k);
            n.right_ht -= is_shorter.0 as i8;
            if is_shorter.0 && n.bal() < -1 {
                (removed, rebal_lf_to_rt(root))
            } else {
                (removed, IsShorter(is_shorter.0 && n.bal() == 0))
            }
        }

        Equal => match (&n.left, &n.right) {
            (None, None) => {
                let old_n = *root.take().unwrap();
                (Some(old_n.key), IsShorter(true))
            }

            (None, Some(_)) => {
                let old_n = *root.take().unwrap();
                *root = old_n.right;
                (Some(old_n.key), IsShorter(true))
            }

            (Some(_), None) => {
                let old_n = *root.take().unwrap();
                *root = old_n.left;
                (Some(old_n.key), IsShorter(true))
            }

            _ => {
                // both children are populated; overwrite our key with the
                // in-order successor's and remove the successor instead
                let (succ, is_shorter) = rm_leftmost(&mut n.right);
                let old_key = replace(&mut n.key, succ.unwrap());

                n.right_ht -= is_shorter.0 as i8;
                if is_shorter.0 && n.bal() < -1 {
                    // we were taller on left and lost height on right
                    (Some(old_key), rebal_lf_to_rt(root))
                } else {
                    (Some(old_key), IsShorter(is_shorter.0 && n.bal() == 0))
                }
            }
        },
    }
}

/// An ordered collection of keys, sorted by key.
///
/// Internally, the collection is an [AVL
/// tree](https://en.wikipedia.org/wiki/AVL_tree): a binary search tree that
/// rebalances itself after every mutation so that the heights of any node's
/// subtrees differ by at most one.  The rebalancing bounds the tree height,
/// which keeps lookups, insertions, and removals logarithmic in the number of
/// stored keys.
///
/// Keys that compare equal are kept as distinct entries: inserting a key that
/// is already present stores a second copy rather than replacing the first
/// (equal keys descend to the right during placement).  Callers that want set
/// semantics can test with [`contains`](#method.contains) before inserting.
///
/// Every node exclusively owns its subtrees.  There is no structural sharing
/// and no parent links, so dropping the tree (or a removed subtree) is a
/// plain recursive drop.
#[derive(Clone)]
pub struct AvlTree<K> {
    len: usize,
    root: OptNode<K>,
}

impl<K> AvlTree<K> {
    /// Creates a new, empty tree.
    ///
    /// # Examples
    /// ```
    /// use balanced_tree::AvlTree;
    /// let t: AvlTree<usize> = AvlTree::new();
    /// assert!(t.is_empty());
    /// ```
    pub fn new() -> Self {
        AvlTree { len: 0, root: None }
    }

    /// Drops all keys from the tree.
    pub fn clear(&mut self) {
        self.len = 0;
        self.root = None;
    }

    /// Verifies the tree's internal invariants: the search-tree ordering (a
    /// node's left subtree holds strictly lesser keys, its right subtree
    /// holds greater or equal keys), the balance of every node, the cached
    /// subtree heights, and the stored length.
    ///
    /// The unit and property tests call this after mutations; it is public
    /// so integration tests and debugging sessions can do the same.
    pub fn check(&self) -> Result<(), &'static str>
    where
        K: Ord,
    {
        let node_cnt = match self.root.as_deref() {
            None => 0,
            Some(n) => check_node(n, None, None)?.1,
        };

        if node_cnt != self.len {
            return Err("stored len does not match the node count");
        }

        Ok(())
    }

    /// Tests if the tree contains a key equal to the given one.
    ///
    /// # Examples
    /// ```
    /// use balanced_tree::AvlTree;
    ///
    /// let t = AvlTree::from(["LIBRARY", "STEM"]);
    /// assert!(t.contains("LIBRARY"));
    /// assert!(!t.contains("GYM"));
    /// ```
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns the least key in the tree.
    pub fn first(&self) -> Option<&K> {
        let mut prev = &None;
        let mut curr = &self.root;
        while let Some(n) = curr.as_ref() {
            prev = curr;
            curr = &n.left;
        }
        prev.as_ref().map(|n| &n.key)
    }

    /// Applies f to each key in the tree in sorted order.
    ///
    /// This visits the same keys as [`iter`](#method.iter) but avoids the
    /// iterator's bookkeeping.
    ///
    /// # Examples
    /// ```
    /// use balanced_tree::AvlTree;
    ///
    /// let t = AvlTree::from([1, 2, 3]);
    /// let mut sum = 0;
    /// t.for_each(|k| sum += *k);
    /// assert_eq!(sum, 6);
    /// ```
    pub fn for_each<F: FnMut(&K)>(&self, mut f: F) {
        if let Some(n) = self.root.as_ref() {
            n.for_each(&mut f);
        }
    }

    /// Returns a reference to a stored key that compares equal to the given
    /// one, or `None` if there is no such key.
    ///
    /// The lookup takes any borrowed form of the key type, so a tree of
    /// `String` keys can be searched with a `&str`.
    ///
    /// # Examples
    /// ```
    /// use balanced_tree::AvlTree;
    ///
    /// let t = AvlTree::from([String::from("NICC"), String::from("CKCC")]);
    /// assert_eq!(t.get("NICC"), Some(&String::from("NICC")));
    /// assert_eq!(t.get("NISSET COFFEE"), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let mut curr = &self.root;
        while let Some(n) = curr {
            match key.cmp(n.key.borrow()) {
                Less => curr = &n.left,
                Equal => return Some(&n.key),
                Greater => curr = &n.right,
            }
        }

        None
    }

    /// Inserts a key into the tree.
    ///
    /// Every insert stores a new entry; a key that compares equal to an
    /// already-present key is placed in that key's right subtree rather than
    /// replacing it.  The insert rebalances the tree bottom-up, so the
    /// balance invariant holds again by the time the call returns.
    ///
    /// # Examples
    /// ```
    /// use balanced_tree::AvlTree;
    ///
    /// let mut t = AvlTree::new();
    /// t.insert(7);
    /// t.insert(7);
    /// assert_eq!(t.len(), 2);
    /// ```
    pub fn insert(&mut self, key: K)
    where
        K: Ord,
    {
        ins(&mut self.root, key);
        self.len += 1;
        chk_tree!(&*self);
    }

    /// Returns true if the tree contains no keys, false otherwise.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Creates an iterator over the keys, sorted ascending.
    ///
    /// The iterator is lazy; it tracks its progress with a stack of the
    /// not-yet-visited ancestors.  Calling `iter` again restarts the
    /// traversal from the least key.
    ///
    /// # Examples
    /// ```
    /// use balanced_tree::AvlTree;
    ///
    /// let t = AvlTree::from([2, 0, 1]);
    /// assert!(t.iter().eq([0, 1, 2].iter()));
    /// ```
    pub fn iter(&self) -> Iter<K> {
        let mut work = Vec::new();
        let mut curr = self.root.as_deref();
        while let Some(n) = curr {
            work.push(n);
            curr = n.left.as_deref();
        }

        Iter {
            work,
            len: self.len,
        }
    }

    /// Returns the greatest key in the tree.
    ///
    /// # Examples
    /// ```
    /// use balanced_tree::AvlTree;
    ///
    /// let t = AvlTree::from([2, 1, 3]);
    /// assert_eq!(t.first(), Some(&1));
    /// assert_eq!(t.last(), Some(&3));
    /// ```
    pub fn last(&self) -> Option<&K> {
        let mut prev = &None;
        let mut curr = &self.root;
        while let Some(n) = curr.as_ref() {
            prev = curr;
            curr = &n.right;
        }
        prev.as_ref().map(|n| &n.key)
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Removes one key equal to the given one, returning true if such a key
    /// was present and false otherwise.
    ///
    /// Removing an absent key is not an error; the tree is left untouched.
    ///
    /// # Examples
    /// ```
    /// use balanced_tree::AvlTree;
    ///
    /// let mut t = AvlTree::from([1, 2]);
    /// assert!(t.remove(&2));
    /// assert!(!t.remove(&2));
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.take(key).is_some()
    }

    /// Removes and returns a stored key that compares equal to the given
    /// one, or returns `None` (leaving the tree untouched) if there is none.
    ///
    /// # Examples
    /// ```
    /// use balanced_tree::AvlTree;
    ///
    /// let mut t = AvlTree::from(["a", "b"]);
    /// assert_eq!(t.take("b"), Some("b"));
    /// assert_eq!(t.take("b"), None);
    /// ```
    pub fn take<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        if let (opt_k @ Some(_), _) = rm(&mut self.root, key) {
            self.len -= 1;
            chk_tree!(&*self);
            opt_k
        } else {
            None
        }
    }
}

impl<K: Debug> Debug for AvlTree<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.root {
            None => f.write_str("AvlTree(EMPTY)"),
            Some(n) => {
                // use Node's Debug formatter
                f.write_fmt(format_args!("AvlTree(#{}, {:?})", self.len, n))
            }
        }
    }
}

impl<K> Default for AvlTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq> PartialEq for AvlTree<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().zip(other.iter()).all(|(x, y)| x == y)
    }
}

impl<K: Eq> Eq for AvlTree<K> {}

impl<K: Ord> Extend<K> for AvlTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for k in iter {
            self.insert(k);
        }
    }
}

impl<K: Ord> FromIterator<K> for AvlTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut t = AvlTree::new();
        t.extend(iter);
        t
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for AvlTree<K> {
    fn from(keys: [K; N]) -> Self {
        AvlTree::from_iter(keys)
    }
}

impl<'a, K> IntoIterator for &'a AvlTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

/// An in-order iterator over a tree's keys, created by [`AvlTree::iter`].
pub struct Iter<'a, K> {
    work: Vec<&'a Node<K>>,
    len: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.work.pop().map(|n| {
            self.len -= 1;
            let mut curr = n.right.as_deref();
            while let Some(m) = curr {
                self.work.push(m);
                curr = m.left.as_deref();
            }
            &n.key
        })
    }
}

impl<'a, K> ExactSizeIterator for Iter<'a, K> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<'a, K> FusedIterator for Iter<'a, K> {}
