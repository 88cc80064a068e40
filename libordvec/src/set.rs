// Copyright 2018-2019 Joe Neeman.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// See the LICENSE-APACHE or LICENSE-MIT files at the top-level directory
// of this distribution.

use std::{borrow::Borrow, fmt, ops::Range};

use crate::{Compare, Error, Natural, Sequence, engine::Engine};

/// A set that keeps its elements sorted in a contiguous sequence.
///
/// Compared to a `BTreeSet`, lookups and iteration are fast and cache-friendly, while inserting
/// and removing single elements is `O(n)` (everything after the affected position has to move).
/// Bulk insertion with [`FlatSet::insert_iter`] is `O(n + k log k)` and should be preferred when
/// adding many elements at once.
///
/// The order is given by the comparator `C` (see [`Compare`]), and two elements are "the same"
/// if neither is less than the other. The storage is `S`, which defaults to a `Vec`. Positions
/// returned by the various methods are indices into [`FlatSet::as_slice`]; they are invalidated
/// by anything that inserts or removes elements.
pub struct FlatSet<T, C = Natural, S = Vec<T>> {
    engine: Engine<T, S, C, true>,
}

impl<T: Ord> FlatSet<T> {
    /// Creates an empty set, ordered by `Ord`.
    pub fn new() -> FlatSet<T> {
        FlatSet::with_comparator(Natural)
    }

    /// Creates an empty set with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> FlatSet<T> {
        FlatSet::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<T: Ord, S: Sequence<T>> FlatSet<T, Natural, S> {
    /// Creates a set from a sequence, which is sorted and deduplicated. Of each group of
    /// equal elements, the first one is kept.
    pub fn from_base(seq: S) -> Self {
        FlatSet::from_base_with(seq, Natural)
    }

    /// Creates a set from a sequence that is already sorted and has no duplicates. This only
    /// checks, and so is `O(n)`.
    pub fn from_sorted_base(seq: S) -> Result<Self, Error> {
        FlatSet::from_sorted_base_with(seq, Natural)
    }
}

impl<T, C, S: Sequence<T>> FlatSet<T, C, S> {
    /// Creates an empty set with a custom comparator.
    pub fn with_comparator(comp: C) -> Self {
        FlatSet {
            engine: Engine::new(comp),
        }
    }

    /// Creates an empty set with a custom comparator and room for `capacity` elements.
    pub fn with_capacity_and_comparator(capacity: usize, comp: C) -> Self {
        FlatSet {
            engine: Engine::with_capacity(capacity, comp),
        }
    }

    /// The underlying sequence.
    pub fn base(&self) -> &S {
        self.engine.base()
    }

    /// Takes the underlying sequence (which is sorted).
    pub fn into_base(self) -> S {
        self.engine.into_base()
    }

    /// The elements, in order.
    pub fn as_slice(&self) -> &[T] {
        self.engine.as_slice()
    }

    /// Iterates over the elements in order. Use `.rev()` for the reverse order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// The smallest element.
    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// The largest element.
    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.engine.len()
    }

    /// Is the set empty?
    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    /// The largest number of elements the underlying sequence could hold.
    pub fn max_size(&self) -> usize {
        self.engine.max_size()
    }

    /// How many elements fit without reallocating.
    pub fn capacity(&self) -> usize {
        self.engine.capacity()
    }

    /// Makes room for `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        self.engine.reserve(additional);
    }

    /// Makes room for `additional` more elements, reporting failure instead of aborting.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.engine.try_reserve(additional)
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        self.engine.clear();
    }

    /// Removes and returns the element at position `index`.
    ///
    /// Panics if `index` is out of bounds.
    pub fn erase_at(&mut self, index: usize) -> T {
        self.engine.erase_at(index)
    }

    /// Removes the elements at the positions in `range` (for example, a range returned by
    /// [`FlatSet::equal_range`]).
    pub fn erase_range(&mut self, range: Range<usize>) {
        self.engine.erase_range(range);
    }

    /// Keeps only the elements for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.engine.retain(|elem| keep(elem));
    }

    /// Exchanges contents and comparators with another set. This is `O(1)`.
    pub fn swap(&mut self, other: &mut Self) {
        self.engine.swap(&mut other.engine);
    }

    /// The comparator.
    pub fn key_comp(&self) -> &C {
        self.engine.comp()
    }

    /// The comparator (for a set, elements are keys).
    pub fn value_comp(&self) -> &C {
        self.engine.comp()
    }
}

impl<T, C: Compare<T>, S: Sequence<T>> FlatSet<T, C, S> {
    /// Creates a set with a custom comparator from a sequence, which is sorted and
    /// deduplicated.
    pub fn from_base_with(seq: S, comp: C) -> Self {
        FlatSet {
            engine: Engine::from_base(seq, comp),
        }
    }

    /// Creates a set with a custom comparator from a sequence that is already sorted and
    /// deduplicated.
    pub fn from_sorted_base_with(seq: S, comp: C) -> Result<Self, Error> {
        Ok(FlatSet {
            engine: Engine::from_sorted_base(seq, comp)?,
        })
    }

    /// Replaces the contents with `seq`, which is sorted and deduplicated.
    pub fn assign_base(&mut self, seq: S) {
        self.engine.assign_base(seq);
    }

    /// Exchanges the contents with a raw sequence, and then sorts and deduplicates the new
    /// contents.
    ///
    /// This is meant for building up a sequence by some other means and then splicing it in.
    /// Unlike [`FlatSet::swap`], it is `O(n log n)`.
    pub fn swap_base(&mut self, other: &mut S) {
        self.engine.swap_base(other);
    }

    /// Inserts `value` unless an equivalent element is already present.
    ///
    /// Returns the position of the new element (or of the existing one), and whether the
    /// insertion actually happened.
    pub fn insert(&mut self, value: T) -> (usize, bool) {
        self.engine.insert(value)
    }

    /// Inserts `value`, starting the search for its position at `hint`.
    ///
    /// If `value` belongs close to `hint`, this is faster than [`FlatSet::insert`]: it takes
    /// `O(log d)` comparisons, where `d` is the distance from the hint to the right position.
    /// Any hint gives the right answer, though. Returns the position of the new element (or of
    /// the existing equivalent one).
    pub fn insert_hint(&mut self, hint: usize, value: T) -> usize {
        self.engine.insert_hint(hint, value).0
    }

    /// Inserts all the elements of `iter`.
    ///
    /// This appends everything, sorts the new part, merges it with the old part and then
    /// removes duplicates; when a new element duplicates an old one, the old one stays.
    ///
    /// If the iterator panics, the set is restored to how it was before. If the comparator
    /// panics, the set keeps all the old and new elements but is left unsorted and possibly with
    /// duplicates; it shouldn't be used for lookups after that.
    pub fn insert_iter<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.engine.insert_iter(iter);
    }

    /// Like [`FlatSet::insert_iter`], but first reserves room for the iterator's lower size
    /// bound. If that fails, nothing is changed.
    pub fn try_insert_iter<I>(&mut self, iter: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = T>,
    {
        self.engine.try_insert_iter(iter)
    }

    /// Removes the element equivalent to `key`, returning how many elements were removed (that
    /// is, 0 or 1).
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        self.engine.erase(key)
    }

    /// The position of the element equivalent to `key`.
    pub fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        self.engine.find(key)
    }

    /// The element equivalent to `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        self.find(key).map(|i| &self.as_slice()[i])
    }

    /// Is there an element equivalent to `key`?
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        self.find(key).is_some()
    }

    /// The number of elements equivalent to `key` (0 or 1).
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        self.engine.count(key)
    }

    /// The positions of the elements equivalent to `key`. This is empty if there aren't any,
    /// and otherwise has length 1.
    pub fn equal_range<Q>(&self, key: &Q) -> Range<usize>
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        self.engine.equal_range(key)
    }

    /// The position of the first element that is not less than `key`.
    pub fn lower_bound<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        self.engine.lower_bound(key)
    }

    /// The position of the first element that is greater than `key`.
    pub fn upper_bound<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        self.engine.upper_bound(key)
    }
}

impl_sequence_traits!(FlatSet<T, C, S>, T);

impl<T: fmt::Debug, C, S: Sequence<T>> fmt::Debug for FlatSet<T, C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C: Compare<T> + Default, S: Sequence<T>> FromIterator<T> for FlatSet<T, C, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        FlatSet::from_base_with(iter.into_iter().collect(), C::default())
    }
}

impl<T, C: Compare<T>, S: Sequence<T>> Extend<T> for FlatSet<T, C, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_iter(iter);
    }
}

impl<'a, T, C, S: Sequence<T>> IntoIterator for &'a FlatSet<T, C, S> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reversed;
    use proptest::prelude::*;

    #[test]
    fn integers() {
        let mut set = FlatSet::new();
        for x in [5, 3, 8, 3] {
            set.insert(x);
        }
        assert_eq!(set.as_slice(), &[3, 5, 8]);
        assert_eq!(set.count(&3), 1);
        assert!(!set.contains(&9));
        assert_eq!(set.find(&9), None);
        assert_eq!(set.find(&5), Some(1));
    }

    #[test]
    fn insert_reports_existing() {
        let mut set: FlatSet<i32> = [1, 4, 9].into_iter().collect();
        assert_eq!(set.insert(4), (1, false));
        assert_eq!(set.insert(5), (2, true));
        assert_eq!(set.insert_hint(0, 9), 3);
        assert_eq!(set.insert_hint(0, 10), 4);
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn bounds() {
        let set = FlatSet::from_base(vec![10, 20, 30]);
        assert_eq!(set.lower_bound(&20), 1);
        assert_eq!(set.upper_bound(&20), 2);
        assert_eq!(set.equal_range(&20), 1..2);
        assert_eq!(set.equal_range(&25), 2..2);
        assert_eq!(set.lower_bound(&35), 3);
        assert_eq!(set.first(), Some(&10));
        assert_eq!(set.last(), Some(&30));
        assert_eq!(set.iter().rev().cloned().collect::<Vec<_>>(), vec![30, 20, 10]);
    }

    #[test]
    fn borrowed_lookup() {
        let set: FlatSet<String> = ["b", "a", "c"].iter().map(|s| s.to_string()).collect();
        assert!(set.contains("a"));
        assert_eq!(set.get("c").map(String::as_str), Some("c"));
        assert_eq!(set.find("d"), None);
    }

    #[test]
    fn erase() {
        let mut set = FlatSet::from_base(vec![1, 2, 3, 4, 5]);
        assert_eq!(set.erase(&3), 1);
        assert_eq!(set.erase(&3), 0);
        assert_eq!(set.erase_at(0), 1);
        let range = set.lower_bound(&4)..set.len();
        set.erase_range(range);
        assert_eq!(set.as_slice(), &[2]);
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn retain() {
        let mut set: FlatSet<u32> = (0..10).collect();
        set.retain(|x| x % 3 == 0);
        assert_eq!(set.as_slice(), &[0, 3, 6, 9]);
    }

    #[test]
    fn reversed_order() {
        let mut set: FlatSet<i32, _> = FlatSet::with_comparator(Reversed(Natural));
        set.insert_iter(vec![1, 5, 3, 5]);
        assert_eq!(set.as_slice(), &[5, 3, 1]);
        assert_eq!(set.lower_bound(&3), 1);
        assert!(set.contains(&1));
    }

    #[test]
    fn closure_comparator() {
        // Case-insensitive strings: the first spelling wins.
        let mut set: FlatSet<String, _> = FlatSet::with_comparator(|a: &String, b: &String| {
            a.to_lowercase() < b.to_lowercase()
        });
        set.insert("Hello".to_owned());
        set.insert_iter(vec!["hello".to_owned(), "abc".to_owned(), "ABC".to_owned()]);
        assert_eq!(set.as_slice(), &["abc".to_owned(), "Hello".to_owned()]);
    }

    #[test]
    fn swap_with_base() {
        let mut set = FlatSet::from_base(vec![1, 2]);
        let mut other = vec![3, 1, 3];
        set.swap_base(&mut other);
        assert_eq!(other, vec![1, 2]);
        assert_eq!(set.as_slice(), &[1, 3]);

        set.assign_base(vec![7, 7, 6]);
        assert_eq!(set.into_base(), vec![6, 7]);
    }

    #[test]
    fn sorted_base() {
        assert!(FlatSet::from_sorted_base(vec![1, 2, 3]).is_ok());
        assert!(matches!(
            FlatSet::from_sorted_base(vec![1, 1]),
            Err(Error::Unsorted { index: 1 })
        ));
    }

    #[test]
    fn comparisons() {
        let a = FlatSet::from_base(vec![1, 2, 3]);
        let b = FlatSet::from_base(vec![3, 2, 1, 1]);
        let c = FlatSet::from_base(vec![1, 2, 4]);
        assert_eq!(a, b);
        assert!(a < c);
        assert!(c >= b);
        assert_ne!(a, c);
        assert_eq!(format!("{:?}", a), "{1, 2, 3}");
    }

    proptest! {
        #[test]
        fn invariant_holds(ops in proptest::collection::vec((0..3u8, 0..20i32, 0..30usize), 0..60)) {
            let mut set = FlatSet::new();
            let mut model = std::collections::BTreeSet::new();
            for (op, x, hint) in ops {
                match op {
                    0 => {
                        prop_assert_eq!(set.insert(x).1, model.insert(x));
                    }
                    1 => {
                        set.insert_hint(hint, x);
                        model.insert(x);
                    }
                    _ => {
                        prop_assert_eq!(set.erase(&x), model.remove(&x) as usize);
                    }
                }
                prop_assert!(set.as_slice().windows(2).all(|w| w[0] < w[1]));
            }
            prop_assert_eq!(set.iter().cloned().collect::<Vec<_>>(), model.into_iter().collect::<Vec<_>>());
        }

        #[test]
        fn insert_then_find(values in proptest::collection::vec(0..100i32, 1..40)) {
            let mut set = FlatSet::new();
            for &v in &values {
                set.insert(v);
                let found = set.find(&v);
                prop_assert!(found.is_some());
                prop_assert_eq!(set.as_slice()[found.unwrap()], v);
            }
        }

        #[test]
        fn swap_twice(a in proptest::collection::vec(0..10i32, 0..10), b in proptest::collection::vec(0..10i32, 0..10)) {
            let mut x = FlatSet::from_base(a);
            let mut y = FlatSet::from_base(b);
            let (x0, y0) = (x.clone(), y.clone());
            x.swap(&mut y);
            prop_assert_eq!(&x, &y0);
            x.swap(&mut y);
            prop_assert_eq!(&x, &x0);
            prop_assert_eq!(&y, &y0);
        }
    }
}
