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

use crate::{
    Compare, Error, Natural, Sequence, ValueCompare,
    engine::Engine,
    map::{Iter, IterMut},
};

/// A map from keys to any number of values, kept sorted by key in a contiguous sequence.
///
/// This is a [`FlatMap`](crate::FlatMap) that allows repeated keys. Entries with the same key
/// are next to one another. [`FlatMultiMap::insert`] puts a new entry in front of the existing
/// entries with its key, while [`FlatMultiMap::insert_iter`] puts the new entries after them.
pub struct FlatMultiMap<K, V, C = Natural, S = Vec<(K, V)>> {
    engine: Engine<(K, V), S, ValueCompare<C>, false>,
}

impl<K: Ord, V> FlatMultiMap<K, V> {
    /// Creates an empty multimap, ordered by `Ord` on the keys.
    pub fn new() -> FlatMultiMap<K, V> {
        FlatMultiMap::with_comparator(Natural)
    }

    /// Creates an empty multimap with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> FlatMultiMap<K, V> {
        FlatMultiMap::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K: Ord, V, S: Sequence<(K, V)>> FlatMultiMap<K, V, Natural, S> {
    /// Creates a multimap from a sequence of entries, which is sorted (stably) by key.
    pub fn from_base(seq: S) -> Self {
        FlatMultiMap::from_base_with(seq, Natural)
    }

    /// Creates a multimap from a sequence of entries that is already sorted by key.
    pub fn from_sorted_base(seq: S) -> Result<Self, Error> {
        FlatMultiMap::from_sorted_base_with(seq, Natural)
    }
}

impl<K, V, C, S: Sequence<(K, V)>> FlatMultiMap<K, V, C, S> {
    /// Creates an empty multimap ordered by a custom key comparator.
    pub fn with_comparator(comp: C) -> Self {
        FlatMultiMap {
            engine: Engine::new(ValueCompare::new(comp)),
        }
    }

    /// Creates an empty multimap ordered by a custom key comparator, with room for `capacity`
    /// entries.
    pub fn with_capacity_and_comparator(capacity: usize, comp: C) -> Self {
        FlatMultiMap {
            engine: Engine::with_capacity(capacity, ValueCompare::new(comp)),
        }
    }

    /// The underlying sequence of entries.
    pub fn base(&self) -> &S {
        self.engine.base()
    }

    /// Takes the underlying sequence of entries.
    pub fn into_base(self) -> S {
        self.engine.into_base()
    }

    /// The entries, in order.
    pub fn as_slice(&self) -> &[(K, V)] {
        self.engine.as_slice()
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.as_slice().iter(),
        }
    }

    /// Iterates over the entries in order, with mutable access to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.engine.as_mut_slice().iter_mut(),
        }
    }

    /// The keys, in order, with repeats.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.as_slice().iter().map(|(k, _)| k)
    }

    /// The values, in order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.as_slice().iter().map(|(_, v)| v)
    }

    /// The values, in order and mutably.
    pub fn values_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut V> + ExactSizeIterator {
        self.engine.as_mut_slice().iter_mut().map(|(_, v)| v)
    }

    /// The first entry.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.as_slice().first().map(|(k, v)| (k, v))
    }

    /// The last entry.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.as_slice().last().map(|(k, v)| (k, v))
    }

    /// The number of entries (not the number of distinct keys).
    pub fn len(&self) -> usize {
        self.engine.len()
    }

    /// Is the multimap empty?
    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    /// The largest number of entries the underlying sequence could hold.
    pub fn max_size(&self) -> usize {
        self.engine.max_size()
    }

    /// How many entries fit without reallocating.
    pub fn capacity(&self) -> usize {
        self.engine.capacity()
    }

    /// Makes room for `additional` more entries.
    pub fn reserve(&mut self, additional: usize) {
        self.engine.reserve(additional);
    }

    /// Makes room for `additional` more entries, reporting failure instead of aborting.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.engine.try_reserve(additional)
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        self.engine.clear();
    }

    /// Removes and returns the entry at position `index`.
    pub fn erase_at(&mut self, index: usize) -> (K, V) {
        self.engine.erase_at(index)
    }

    /// Removes the entries at the positions in `range`.
    pub fn erase_range(&mut self, range: Range<usize>) {
        self.engine.erase_range(range);
    }

    /// Keeps only the entries for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.engine.retain(|(k, v)| keep(k, v));
    }

    /// Exchanges contents and comparators with another multimap.
    pub fn swap(&mut self, other: &mut Self) {
        self.engine.swap(&mut other.engine);
    }

    /// The key comparator.
    pub fn key_comp(&self) -> &C {
        self.engine.comp().key_compare()
    }

    /// The entry comparator.
    pub fn value_comp(&self) -> &ValueCompare<C> {
        self.engine.comp()
    }
}

impl<K, V, C: Compare<K>, S: Sequence<(K, V)>> FlatMultiMap<K, V, C, S> {
    /// Creates a multimap with a custom key comparator from a sequence of entries.
    pub fn from_base_with(seq: S, comp: C) -> Self {
        FlatMultiMap {
            engine: Engine::from_base(seq, ValueCompare::new(comp)),
        }
    }

    /// Creates a multimap with a custom key comparator from a sequence of entries that is already
    /// sorted by key.
    pub fn from_sorted_base_with(seq: S, comp: C) -> Result<Self, Error> {
        Ok(FlatMultiMap {
            engine: Engine::from_sorted_base(seq, ValueCompare::new(comp))?,
        })
    }

    /// Replaces the contents with `seq`, which is then sorted by key.
    pub fn assign_base(&mut self, seq: S) {
        self.engine.assign_base(seq);
    }

    /// Exchanges the contents with a raw sequence of entries, and then sorts the new contents.
    pub fn swap_base(&mut self, other: &mut S) {
        self.engine.swap_base(other);
    }

    /// Inserts an entry in front of all the entries with the same key. Returns its position.
    pub fn insert(&mut self, entry: (K, V)) -> usize {
        self.engine.insert(entry).0
    }

    /// Inserts an entry in front of all the entries with the same key, starting the search at
    /// `hint`.
    pub fn insert_hint(&mut self, hint: usize, entry: (K, V)) -> usize {
        self.engine.insert_hint(hint, entry).0
    }

    /// Inserts all the entries of `iter`. The new entries go after existing entries with the
    /// same key.
    pub fn insert_iter<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.engine.insert_iter(iter);
    }

    /// Like [`FlatMultiMap::insert_iter`], but first reserves room for the iterator's lower size
    /// bound.
    pub fn try_insert_iter<I>(&mut self, iter: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.engine.try_insert_iter(iter)
    }

    /// Removes all the entries for `key`, returning how many there were.
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        let range = self.equal_range(key);
        let count = range.len();
        if count > 0 {
            self.engine.erase_range(range);
        }
        count
    }

    /// The position of the first entry for `key`.
    pub fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        let comp = self.engine.comp();
        self.engine
            .find_by(|e| comp.entry_key(e, key), |e| comp.key_entry(key, e))
    }

    /// All the entries for `key`.
    pub fn get_all<Q>(&self, key: &Q) -> &[(K, V)]
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        &self.as_slice()[self.equal_range(key)]
    }

    /// Is there at least one entry for `key`?
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.find(key).is_some()
    }

    /// Is there at least one entry for `key`? The same as `contains_key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.contains_key(key)
    }

    /// The number of entries for `key`.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.equal_range(key).len()
    }

    /// The positions of the entries for `key`.
    pub fn equal_range<Q>(&self, key: &Q) -> Range<usize>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        let comp = self.engine.comp();
        self.engine
            .equal_range_by(|e| comp.entry_key(e, key), |e| comp.key_entry(key, e))
    }

    /// The position of the first entry whose key is not less than `key`.
    pub fn lower_bound<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        let comp = self.engine.comp();
        self.engine.lower_bound_by(|e| comp.entry_key(e, key))
    }

    /// The position of the first entry whose key is greater than `key`.
    pub fn upper_bound<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        let comp = self.engine.comp();
        self.engine.upper_bound_by(|e| comp.key_entry(key, e))
    }
}

impl_sequence_traits!(FlatMultiMap<K, V, C, S>, (K, V));

impl<K, V, C, S> fmt::Debug for FlatMultiMap<K, V, C, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
    S: Sequence<(K, V)>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C, S> FromIterator<(K, V)> for FlatMultiMap<K, V, C, S>
where
    C: Compare<K> + Default,
    S: Sequence<(K, V)>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FlatMultiMap::from_base_with(iter.into_iter().collect(), C::default())
    }
}

impl<K, V, C: Compare<K>, S: Sequence<(K, V)>> Extend<(K, V)> for FlatMultiMap<K, V, C, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.insert_iter(iter);
    }
}

impl<'a, K, V, C, S: Sequence<(K, V)>> IntoIterator for &'a FlatMultiMap<K, V, C, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C, S: Sequence<(K, V)>> IntoIterator for &'a mut FlatMultiMap<K, V, C, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
