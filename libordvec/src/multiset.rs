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

/// A multiset that keeps its elements sorted in a contiguous sequence.
///
/// This is like [`FlatSet`](crate::FlatSet), except that equivalent elements may appear more
/// than once. They are always next to one another. A single insertion puts the new element at
/// the lower bound, in front of all of its equivalents; a bulk insertion puts the new elements
/// after the old ones. Don't rely on the order among equivalents beyond that.
pub struct FlatMultiSet<T, C = Natural, S = Vec<T>> {
    engine: Engine<T, S, C, false>,
}

impl<T: Ord> FlatMultiSet<T> {
    /// Creates an empty multiset, ordered by `Ord`.
    pub fn new() -> FlatMultiSet<T> {
        FlatMultiSet::with_comparator(Natural)
    }

    /// Creates an empty multiset with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> FlatMultiSet<T> {
        FlatMultiSet::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<T: Ord, S: Sequence<T>> FlatMultiSet<T, Natural, S> {
    /// Creates a multiset from a sequence, which is then sorted.
    pub fn from_base(seq: S) -> Self {
        FlatMultiSet::from_base_with(seq, Natural)
    }

    /// Creates a multiset from a sequence that is already sorted.
    pub fn from_sorted_base(seq: S) -> Result<Self, Error> {
        FlatMultiSet::from_sorted_base_with(seq, Natural)
    }
}

impl<T, C, S: Sequence<T>> FlatMultiSet<T, C, S> {
    /// Creates an empty multiset with a custom comparator.
    pub fn with_comparator(comp: C) -> Self {
        FlatMultiSet {
            engine: Engine::new(comp),
        }
    }

    /// Creates an empty multiset with a custom comparator and room for `capacity` elements.
    pub fn with_capacity_and_comparator(capacity: usize, comp: C) -> Self {
        FlatMultiSet {
            engine: Engine::with_capacity(capacity, comp),
        }
    }

    /// The underlying sequence.
    pub fn base(&self) -> &S {
        self.engine.base()
    }

    /// Takes the underlying sequence, which is sorted.
    pub fn into_base(self) -> S {
        self.engine.into_base()
    }

    /// The elements, in order.
    pub fn as_slice(&self) -> &[T] {
        self.engine.as_slice()
    }

    /// Iterates over the elements in order.
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

    /// The number of elements, counting repeats.
    pub fn len(&self) -> usize {
        self.engine.len()
    }

    /// Is the multiset empty?
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

    /// Removes and returns the element at position `index`, leaving its equivalents alone.
    pub fn erase_at(&mut self, index: usize) -> T {
        self.engine.erase_at(index)
    }

    /// Removes the elements at the positions in `range`.
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

    /// Exchanges contents and comparators with another multiset.
    pub fn swap(&mut self, other: &mut Self) {
        self.engine.swap(&mut other.engine);
    }

    /// The comparator.
    pub fn key_comp(&self) -> &C {
        self.engine.comp()
    }

    /// The comparator (the same as [`FlatMultiSet::key_comp`]).
    pub fn value_comp(&self) -> &C {
        self.engine.comp()
    }
}

impl<T, C: Compare<T>, S: Sequence<T>> FlatMultiSet<T, C, S> {
    /// Creates a multiset with a custom comparator from a sequence, which is sorted stably.
    pub fn from_base_with(seq: S, comp: C) -> Self {
        FlatMultiSet {
            engine: Engine::from_base(seq, comp),
        }
    }

    /// Creates a multiset with a custom comparator from a sequence that is already sorted.
    pub fn from_sorted_base_with(seq: S, comp: C) -> Result<Self, Error> {
        Ok(FlatMultiSet {
            engine: Engine::from_sorted_base(seq, comp)?,
        })
    }

    /// Replaces the contents with `seq`, which is then sorted.
    pub fn assign_base(&mut self, seq: S) {
        self.engine.assign_base(seq);
    }

    /// Exchanges the contents with a raw sequence and sorts the new contents. Not `O(1)`.
    pub fn swap_base(&mut self, other: &mut S) {
        self.engine.swap_base(other);
    }

    /// Inserts `value` in front of all the elements equivalent to it, returning its position.
    pub fn insert(&mut self, value: T) -> usize {
        self.engine.insert(value).0
    }

    /// Inserts `value` in front of all the elements equivalent to it, starting the search at
    /// `hint`.
    pub fn insert_hint(&mut self, hint: usize, value: T) -> usize {
        self.engine.insert_hint(hint, value).0
    }

    /// Inserts all the elements of `iter`. See [`FlatSet::insert_iter`](crate::FlatSet::insert_iter)
    /// for what happens if something panics.
    pub fn insert_iter<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.engine.insert_iter(iter);
    }

    /// Like [`FlatMultiSet::insert_iter`], but first reserves room for the iterator's lower size
    /// bound.
    pub fn try_insert_iter<I>(&mut self, iter: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = T>,
    {
        self.engine.try_insert_iter(iter)
    }

    /// Removes all the elements equivalent to `key`, returning how many there were.
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        self.engine.erase(key)
    }

    /// The position of the first element equivalent to `key`.
    pub fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        self.engine.find(key)
    }

    /// Is there at least one element equivalent to `key`?
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        self.find(key).is_some()
    }

    /// The number of elements equivalent to `key`.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        self.engine.count(key)
    }

    /// The positions of all the elements equivalent to `key`.
    pub fn equal_range<Q>(&self, key: &Q) -> Range<usize>
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        self.engine.equal_range(key)
    }

    /// All the elements equivalent to `key`.
    pub fn get_all<Q>(&self, key: &Q) -> &[T]
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        &self.as_slice()[self.equal_range(key)]
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

impl_sequence_traits!(FlatMultiSet<T, C, S>, T);

impl<T: fmt::Debug, C, S: Sequence<T>> fmt::Debug for FlatMultiSet<T, C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, C: Compare<T> + Default, S: Sequence<T>> FromIterator<T> for FlatMultiSet<T, C, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        FlatMultiSet::from_base_with(iter.into_iter().collect(), C::default())
    }
}

impl<T, C: Compare<T>, S: Sequence<T>> Extend<T> for FlatMultiSet<T, C, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_iter(iter);
    }
}

impl<'a, T, C, S: Sequence<T>> IntoIterator for &'a FlatMultiSet<T, C, S> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
