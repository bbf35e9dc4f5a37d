//! An ordered set based on an (a,b)-tree.

use core::borrow::Borrow;
use core::fmt;

use crate::error::Result;
use crate::params::Params;
use crate::raw::RawABTree;

/// An ordered set based on an (a,b)-tree.
///
/// Every node except the top one holds between `a` and `b` keys (see [`Params`] for the exact
/// bounds), which keeps the height logarithmic in the number of keys whatever the insertion order.
/// Keys are stored on every layer of the tree, so a lookup may finish above the leaf layer.
///
/// It is a logic error for a key to be modified in such a way that the key's ordering relative
/// to any other key, as determined by the [`Ord`] trait, changes while it is in the set. This is
/// normally only possible through [`Cell`], [`RefCell`], global state, I/O, or unsafe code.
/// The behavior resulting from such a logic error is not specified, but will be encapsulated to the
/// `ABTreeSet` that observed the logic error and not result in undefined behavior.
///
/// The set is not synchronised; share it across threads behind a single lock, since one insert or
/// remove may restructure every layer up to the top node.
///
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
///
/// # Examples
///
/// ```
/// use abtree::ABTreeSet;
///
/// let mut books = ABTreeSet::new(2, 4);
///
/// // Add some books.
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
/// books.insert("The Great Gatsby");
///
/// // Check for a specific one.
/// if !books.contains("The Winds of Winter") {
///     println!("We have {} books, but The Winds of Winter ain't one.",
///              books.len());
/// }
///
/// // Remove a book.
/// books.remove("The Odyssey");
/// assert_eq!(books.len(), 3);
/// ```
///
/// A `ABTreeSet` with a known list of items can be initialized from an array, using the default
/// 2-4 parameters:
///
/// ```
/// use abtree::ABTreeSet;
///
/// let set = ABTreeSet::from([1, 2, 3]);
/// assert!(set.contains(&2));
/// ```
#[derive(Clone)]
pub struct ABTreeSet<T> {
    raw: RawABTree<T>,
}

impl<T> ABTreeSet<T> {
    /// Makes a new, empty `ABTreeSet` whose nodes hold between `a` and `b` keys.
    ///
    /// # Panics
    ///
    /// Panics if `a < 2` or `b < 2a - 1`. Use [`ABTreeSet::try_new`] to handle invalid
    /// parameters without panicking.
    ///
    /// # Examples
    ///
    /// ```
    /// use abtree::ABTreeSet;
    ///
    /// let mut set: ABTreeSet<i32> = ABTreeSet::new(4, 100);
    /// assert!(set.is_empty());
    /// ```
    #[must_use]
    pub fn new(a: usize, b: usize) -> Self {
        match Self::try_new(a, b) {
            Ok(set) => set,
            Err(err) => panic!("`ABTreeSet::new()` - {err}"),
        }
    }

    /// Makes a new, empty `ABTreeSet`, rejecting invalid parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MinFillTooSmall`](crate::Error::MinFillTooSmall) if `a < 2` and
    /// [`Error::MaxFillTooSmall`](crate::Error::MaxFillTooSmall) if `b < 2a - 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use abtree::{ABTreeSet, Error};
    ///
    /// assert!(ABTreeSet::<i32>::try_new(2, 3).is_ok());
    /// assert!(matches!(ABTreeSet::<i32>::try_new(3, 4), Err(Error::MaxFillTooSmall { .. })));
    /// ```
    pub fn try_new(a: usize, b: usize) -> Result<Self> {
        Params::new(a, b).map(Self::with_params)
    }

    /// Makes a new, empty `ABTreeSet` from already validated parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use abtree::{ABTreeSet, Params};
    ///
    /// let params = Params::new(8, 16).unwrap();
    /// let set: ABTreeSet<u64> = ABTreeSet::with_params(params);
    /// assert_eq!(set.params(), params);
    /// ```
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        ABTreeSet {
            raw: RawABTree::new(params),
        }
    }

    /// Returns the branching parameters of the set.
    #[must_use]
    pub fn params(&self) -> Params {
        self.raw.params()
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use abtree::ABTreeSet;
    ///
    /// let mut v = ABTreeSet::new(2, 4);
    /// assert_eq!(v.len(), 0);
    /// v.insert(1);
    /// assert_eq!(v.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of node layers in the tree; an empty set has height 1.
    ///
    /// This is an extension and is not part of the standard `BTreeSet` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use abtree::ABTreeSet;
    ///
    /// let mut set: ABTreeSet<i32> = ABTreeSet::new(2, 4);
    /// assert_eq!(set.height(), 1);
    /// set.extend(0..5);
    /// assert_eq!(set.height(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Clears the set, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use abtree::ABTreeSet;
    ///
    /// let mut v = ABTreeSet::new(2, 4);
    /// v.insert(1);
    /// v.clear();
    /// assert!(v.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns a reference to the first element in the set, if any.
    /// This element is always the minimum of all elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use abtree::ABTreeSet;
    ///
    /// let mut set = ABTreeSet::new(2, 4);
    /// assert_eq!(set.first(), None);
    /// set.insert(1);
    /// assert_eq!(set.first(), Some(&1));
    /// set.insert(2);
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first()
    }

    /// Returns a reference to the last element in the set, if any.
    /// This element is always the maximum of all elements in the set.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last()
    }

    /// Removes the first element from the set and returns it, if any.
    /// The first element is always the minimum element in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use abtree::ABTreeSet;
    ///
    /// let mut set = ABTreeSet::new(2, 4);
    /// set.insert(1);
    /// while let Some(n) = set.pop_first() {
    ///     assert_eq!(n, 1);
    /// }
    /// assert!(set.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_first(&mut self) -> Option<T> {
        self.raw.pop_first()
    }

    /// Removes the last element from the set and returns it, if any.
    /// The last element is always the maximum element in the set.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_last(&mut self) -> Option<T> {
        self.raw.pop_last()
    }
}

impl<T: Ord> ABTreeSet<T> {
    /// Returns `true` if the set contains an element equal to the value.
    ///
    /// The value may be any borrowed form of the set's element type,
    /// but the ordering on the borrowed form *must* match the
    /// ordering on the element type.
    ///
    /// # Examples
    ///
    /// ```
    /// use abtree::ABTreeSet;
    ///
    /// let set = ABTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.contains(&1), true);
    /// assert_eq!(set.contains(&4), false);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(value).is_some()
    }

    /// Returns a reference to the element in the set, if any, that is equal to the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use abtree::ABTreeSet;
    ///
    /// let set = ABTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.get(&2), Some(&2));
    /// assert_eq!(set.get(&4), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(value)
    }

    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. That is:
    ///
    /// - If the set did not previously contain an equal value, `true` is returned.
    /// - If the set already contained an equal value, `false` is returned, and the entry is not
    ///   updated. The set's structure and length are left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use abtree::ABTreeSet;
    ///
    /// let mut set = ABTreeSet::new(2, 4);
    ///
    /// assert_eq!(set.insert(2), true);
    /// assert_eq!(set.insert(2), false);
    /// assert_eq!(set.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T) -> bool {
        self.raw.insert(value)
    }

    /// If the set contains an element equal to the value, removes it from the set and drops it.
    /// Returns whether such an element was present; a missing value leaves the set untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use abtree::ABTreeSet;
    ///
    /// let mut set = ABTreeSet::new(2, 4);
    ///
    /// set.insert(2);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.take(value).is_some()
    }

    /// Removes and returns the element in the set, if any, that is equal to the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use abtree::ABTreeSet;
    ///
    /// let mut set = ABTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.take(&2), Some(2));
    /// assert_eq!(set.take(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.take(value)
    }

    /// Walks the whole tree and checks its structural invariants.
    ///
    /// This is an extension and is not part of the standard `BTreeSet` API. A set only fails
    /// validation after a logic error such as a key whose ordering changed while stored; it must
    /// not be used further once that happens.
    ///
    /// # Errors
    ///
    /// Returns the first violation found: a node outside of its key-count bounds, keys out of
    /// order or outside of their separators, leaves at uneven depth, a broken parent link, a
    /// length mismatch, or unreachable nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use abtree::ABTreeSet;
    ///
    /// let set: ABTreeSet<_> = (0..1000).collect();
    /// assert_eq!(set.validate(), Ok(()));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn validate(&self) -> Result<()> {
        self.raw.validate()
    }
}

impl<T> Default for ABTreeSet<T> {
    /// Creates an empty `ABTreeSet` with the default 2-4 parameters.
    fn default() -> ABTreeSet<T> {
        ABTreeSet::with_params(Params::default())
    }
}

impl<T> fmt::Debug for ABTreeSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self.params();
        f.debug_struct("ABTreeSet")
            .field("a", &params.min_fill())
            .field("b", &params.max_fill())
            .field("len", &self.len())
            .field("height", &self.height())
            .finish()
    }
}

impl<T: Ord> FromIterator<T> for ABTreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> ABTreeSet<T> {
        let mut set = ABTreeSet::default();
        set.extend(iter);
        set
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for ABTreeSet<T> {
    /// Converts a `[T; N]` into an `ABTreeSet<T>` with the default parameters.
    ///
    /// ```
    /// use abtree::ABTreeSet;
    ///
    /// let set1 = ABTreeSet::from([1, 2, 3, 4]);
    /// let set2: ABTreeSet<_> = [1, 2, 3, 4].into();
    /// assert_eq!(set1.len(), set2.len());
    /// ```
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T: Ord> Extend<T> for ABTreeSet<T> {
    #[inline]
    fn extend<Iter: IntoIterator<Item = T>>(&mut self, iter: Iter) {
        iter.into_iter().for_each(move |elem| {
            self.insert(elem);
        });
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for ABTreeSet<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    #[should_panic(expected = "`ABTreeSet::new()` - minimum fill `a` must be at least 2, got 1")]
    fn new_panics_on_invalid_params() {
        let _: ABTreeSet<i32> = ABTreeSet::new(1, 4);
    }

    #[test]
    fn debug_shows_shape() {
        let set: ABTreeSet<i32> = (0..5).collect();
        assert_eq!(format!("{set:?}"), "ABTreeSet { a: 2, b: 4, len: 5, height: 2 }");
    }

    #[test]
    fn extend_by_reference() {
        let mut set: ABTreeSet<i32> = ABTreeSet::new(3, 6);
        set.extend(&[3, 1, 2, 3]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.first(), Some(&1));
        assert_eq!(set.last(), Some(&3));
    }

    #[test]
    fn clone_is_independent() {
        let mut a: ABTreeSet<i32> = (0..100).collect();
        let b = a.clone();
        for k in 0..50 {
            a.remove(&k);
        }
        assert_eq!(a.len(), 50);
        assert_eq!(b.len(), 100);
        assert!(b.contains(&0));
        assert_eq!(a.validate(), Ok(()));
        assert_eq!(b.validate(), Ok(()));
    }
}
