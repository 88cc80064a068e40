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

use std::{borrow::Borrow, fmt, iter::FusedIterator, ops::Index, ops::Range};

use crate::{Compare, Error, Natural, Sequence, ValueCompare, engine::Engine};

/// A map that keeps its entries sorted by key in a contiguous sequence.
///
/// The entries are `(K, V)` pairs, stored in a sequence `S` and ordered by the keys according to
/// the comparator `C`. There is at most one entry per key (where, as always, keys are the same if
/// neither is less than the other).
///
/// Unlike `BTreeMap::insert`, [`FlatMap::insert`] never overwrites: it behaves like a set
/// insertion on the entries. Use [`FlatMap::get_mut`] or [`FlatMap::get_or_insert_default`] to
/// change a value in place.
pub struct FlatMap<K, V, C = Natural, S = Vec<(K, V)>> {
    engine: Engine<(K, V), S, ValueCompare<C>, true>,
}

impl<K: Ord, V> FlatMap<K, V> {
    /// Creates an empty map, ordered by `Ord` on the keys.
    pub fn new() -> FlatMap<K, V> {
        FlatMap::with_comparator(Natural)
    }

    /// Creates an empty map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> FlatMap<K, V> {
        FlatMap::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K: Ord, V, S: Sequence<(K, V)>> FlatMap<K, V, Natural, S> {
    /// Creates a map from a sequence of entries, which is sorted by key. Of several entries with
    /// the same key, the first one is kept.
    pub fn from_base(seq: S) -> Self {
        FlatMap::from_base_with(seq, Natural)
    }

    /// Creates a map from a sequence of entries that is already sorted by key, with no key
    /// repeated.
    pub fn from_sorted_base(seq: S) -> Result<Self, Error> {
        FlatMap::from_sorted_base_with(seq, Natural)
    }
}

impl<K, V, C, S: Sequence<(K, V)>> FlatMap<K, V, C, S> {
    /// Creates an empty map ordered by a custom key comparator.
    pub fn with_comparator(comp: C) -> Self {
        FlatMap {
            engine: Engine::new(ValueCompare::new(comp)),
        }
    }

    /// Creates an empty map ordered by a custom key comparator, with room for `capacity`
    /// entries.
    pub fn with_capacity_and_comparator(capacity: usize, comp: C) -> Self {
        FlatMap {
            engine: Engine::with_capacity(capacity, ValueCompare::new(comp)),
        }
    }

    /// The underlying sequence of entries.
    pub fn base(&self) -> &S {
        self.engine.base()
    }

    /// Takes the underlying sequence of entries (which is sorted by key).
    pub fn into_base(self) -> S {
        self.engine.into_base()
    }

    /// The entries, in order.
    pub fn as_slice(&self) -> &[(K, V)] {
        self.engine.as_slice()
    }

    /// Iterates over the entries in order of their keys.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.as_slice().iter(),
        }
    }

    /// Iterates over the entries in order of their keys, with mutable access to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.engine.as_mut_slice().iter_mut(),
        }
    }

    /// The keys, in order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.as_slice().iter().map(|(k, _)| k)
    }

    /// The values, in order of their keys.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.as_slice().iter().map(|(_, v)| v)
    }

    /// Mutable access to the values, in order of their keys.
    pub fn values_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut V> + ExactSizeIterator {
        self.engine.as_mut_slice().iter_mut().map(|(_, v)| v)
    }

    /// The entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.as_slice().first().map(|(k, v)| (k, v))
    }

    /// The entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.as_slice().last().map(|(k, v)| (k, v))
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.engine.len()
    }

    /// Is the map empty?
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

    /// Keeps only the entries for which `keep` returns true. `keep` may modify the values.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.engine.retain(|(k, v)| keep(k, v));
    }

    /// Exchanges contents and comparators with another map. This is `O(1)`.
    pub fn swap(&mut self, other: &mut Self) {
        self.engine.swap(&mut other.engine);
    }

    /// The key comparator.
    pub fn key_comp(&self) -> &C {
        self.engine.comp().key_compare()
    }

    /// The entry comparator, which orders entries by their keys.
    pub fn value_comp(&self) -> &ValueCompare<C> {
        self.engine.comp()
    }
}

impl<K, V, C: Compare<K>, S: Sequence<(K, V)>> FlatMap<K, V, C, S> {
    /// Creates a map with a custom key comparator from a sequence of entries.
    pub fn from_base_with(seq: S, comp: C) -> Self {
        FlatMap {
            engine: Engine::from_base(seq, ValueCompare::new(comp)),
        }
    }

    /// Creates a map with a custom key comparator from a sequence of entries that is already
    /// sorted, with no key repeated.
    pub fn from_sorted_base_with(seq: S, comp: C) -> Result<Self, Error> {
        Ok(FlatMap {
            engine: Engine::from_sorted_base(seq, ValueCompare::new(comp))?,
        })
    }

    /// Replaces the contents with `seq`, which is then sorted by key and deduplicated.
    pub fn assign_base(&mut self, seq: S) {
        self.engine.assign_base(seq);
    }

    /// Exchanges the contents with a raw sequence of entries, and then sorts and deduplicates
    /// the new contents. This is `O(n log n)`.
    pub fn swap_base(&mut self, other: &mut S) {
        self.engine.swap_base(other);
    }

    /// Inserts an entry, unless there is already one with the same key.
    ///
    /// Returns the position of the new entry (or of the existing one), and whether it was
    /// inserted. An existing entry is never modified.
    pub fn insert(&mut self, entry: (K, V)) -> (usize, bool) {
        self.engine.insert(entry)
    }

    /// Inserts an entry, starting the search for its position at `hint`. Returns the position of
    /// the new entry, or of the existing entry with the same key.
    pub fn insert_hint(&mut self, hint: usize, entry: (K, V)) -> usize {
        self.engine.insert_hint(hint, entry).0
    }

    /// Inserts all the entries of `iter`. Where keys collide, entries that were already present
    /// win over new ones, and among the new ones the earliest one wins.
    ///
    /// See [`FlatSet::insert_iter`](crate::FlatSet::insert_iter) for what happens if something
    /// panics.
    pub fn insert_iter<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.engine.insert_iter(iter);
    }

    /// Like [`FlatMap::insert_iter`], but first reserves room for the iterator's lower size
    /// bound. If that fails, nothing is changed.
    pub fn try_insert_iter<I>(&mut self, iter: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.engine.try_insert_iter(iter)
    }

    /// Returns a mutable reference to the value for `key`, inserting `V::default()` first if
    /// there isn't one.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let comp = self.engine.comp();
        let at = self.engine.lower_bound_by(|e| comp.entry_key(e, &key));
        let present = self
            .as_slice()
            .get(at)
            .is_some_and(|e| !self.engine.comp().key_entry(&key, e));
        if !present {
            self.engine.insert_at(at, (key, V::default()));
        }
        &mut self.engine.as_mut_slice()[at].1
    }
}

impl<K, V, C, S> FlatMap<K, V, C, S>
where
    C: Compare<K>,
    S: Sequence<(K, V)>,
{
    /// Removes the entry for `key`, returning how many entries were removed (0 or 1).
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

    /// The position of the entry for `key`.
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

    /// The value for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.find(key).map(|i| &self.as_slice()[i].1)
    }

    /// The value for `key`, mutably.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        let i = self.find(key)?;
        Some(&mut self.engine.as_mut_slice()[i].1)
    }

    /// The stored key and the value for `key`.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.find(key).map(|i| {
            let (k, v) = &self.as_slice()[i];
            (k, v)
        })
    }

    /// Is there an entry for `key`?
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.find(key).is_some()
    }

    /// Is there an entry for `key`? The same as `contains_key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.contains_key(key)
    }

    /// The number of entries for `key` (0 or 1).
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.contains_key(key) as usize
    }

    /// The positions of the entries for `key`: either empty or of length 1.
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

impl_sequence_traits!(FlatMap<K, V, C, S>, (K, V));

impl<K, V, C, S> fmt::Debug for FlatMap<K, V, C, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
    S: Sequence<(K, V)>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C, S, Q> Index<&Q> for FlatMap<K, V, C, S>
where
    Q: ?Sized,
    K: Borrow<Q>,
    C: Compare<K> + Compare<Q>,
    S: Sequence<(K, V)>,
{
    type Output = V;

    /// Panics if there is no entry for `key`.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V, C, S> FromIterator<(K, V)> for FlatMap<K, V, C, S>
where
    C: Compare<K> + Default,
    S: Sequence<(K, V)>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FlatMap::from_base_with(iter.into_iter().collect(), C::default())
    }
}

impl<K, V, C: Compare<K>, S: Sequence<(K, V)>> Extend<(K, V)> for FlatMap<K, V, C, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.insert_iter(iter);
    }
}

impl<'a, K, V, C, S: Sequence<(K, V)>> IntoIterator for &'a FlatMap<K, V, C, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C, S: Sequence<(K, V)>> IntoIterator for &'a mut FlatMap<K, V, C, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// An iterator over the entries of a map (or multimap), in order.
#[derive(Clone, Debug)]
pub struct Iter<'a, K, V> {
    pub(crate) inner: std::slice::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k, v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator over the entries of a map (or multimap), with mutable access to the values.
#[derive(Debug)]
pub struct IterMut<'a, K, V> {
    pub(crate) inner: std::slice::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (&*k, v))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reversed;
    use proptest::prelude::*;

    fn s(x: &str) -> String {
        x.to_owned()
    }

    #[test]
    fn strings_to_ints() {
        let mut map = FlatMap::new();
        map.insert((s("b"), 2));
        map.insert((s("a"), 1));
        assert_eq!(
            map.iter().collect::<Vec<_>>(),
            vec![(&s("a"), &1), (&s("b"), &2)]
        );
        assert_eq!(*map.get_or_insert_default(s("a")), 1);
        assert_eq!(*map.get_or_insert_default(s("c")), 0);
        assert_eq!(
            map.as_slice(),
            &[(s("a"), 1), (s("b"), 2), (s("c"), 0)]
        );
    }

    #[test]
    fn insert_does_not_overwrite() {
        let mut map = FlatMap::new();
        assert_eq!(map.insert((1, "one")), (0, true));
        assert_eq!(map.insert((1, "uno")), (0, false));
        assert_eq!(map[&1], "one");
        *map.get_mut(&1).unwrap() = "ein";
        assert_eq!(map.get(&1), Some(&"ein"));
    }

    #[test]
    fn lookups_by_borrowed_key() {
        let map: FlatMap<String, usize> =
            ["x", "yy", "zzz"].iter().map(|k| (s(k), k.len())).collect();
        assert_eq!(map.get("yy"), Some(&2));
        assert_eq!(map["zzz"], 3);
        assert!(map.contains_key("x"));
        assert!(!map.contains("w"));
        assert_eq!(map.count("w"), 0);
        assert_eq!(map.find("w"), None);
        assert_eq!(map.lower_bound("y"), 1);
        assert_eq!(map.upper_bound("yy"), 2);
        assert_eq!(map.equal_range("zzz"), 2..3);
        assert_eq!(map.get_key_value("x"), Some((&s("x"), &1)));
    }

    #[test]
    fn earliest_new_entry_wins() {
        let mut map = FlatMap::from_base(vec![(2, 'a')]);
        map.insert_iter(vec![(1, 'x'), (2, 'b'), (1, 'y'), (0, 'z'), (1, 'w')]);
        assert_eq!(map.as_slice(), &[(0, 'z'), (1, 'x'), (2, 'a')]);
    }

    #[test]
    fn hinted_and_bulk() {
        let mut map = FlatMap::from_base(vec![(5, 'a'), (1, 'b'), (5, 'c')]);
        assert_eq!(map.as_slice(), &[(1, 'b'), (5, 'a')]);
        assert_eq!(map.insert_hint(2, (3, 'd')), 1);
        assert_eq!(map.insert_hint(0, (5, 'e')), 2);
        map.extend(vec![(0, 'f'), (5, 'g'), (9, 'h')]);
        assert_eq!(
            map.values().cloned().collect::<String>(),
            "fbdah"
        );
        assert_eq!(map.keys().rev().cloned().collect::<Vec<_>>(), vec![9, 5, 3, 1, 0]);
    }

    #[test]
    fn mutate_values() {
        let mut map: FlatMap<u8, u32> = (0..5).map(|k| (k, 0)).collect();
        for (k, v) in map.iter_mut() {
            *v = *k as u32 * 10;
        }
        for v in map.values_mut() {
            *v += 1;
        }
        map.retain(|k, v| {
            *v += 1;
            k % 2 == 0
        });
        assert_eq!(map.as_slice(), &[(0, 2), (2, 22), (4, 42)]);
        assert_eq!(map.erase(&2), 1);
        assert_eq!(map.erase(&2), 0);
        assert_eq!(map.erase_at(0), (0, 2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn custom_order() {
        let mut map: FlatMap<i32, (), _> = FlatMap::with_comparator(Reversed(Natural));
        map.insert_iter((0..5).map(|k| (k, ())));
        assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec![4, 3, 2, 1, 0]);
        assert_eq!(map.key_comp(), &Reversed(Natural));
        assert!(map.value_comp().less(&(3, ()), &(2, ())));
    }

    #[test]
    fn swap_and_debug() {
        let mut a = FlatMap::from_base(vec![(1, 1)]);
        let mut b = FlatMap::from_base(vec![(2, 2), (3, 3)]);
        a.swap(&mut b);
        assert_eq!(format!("{:?}", a), "{2: 2, 3: 3}");
        let mut raw = vec![(9, 0), (8, 0), (9, 1)];
        b.swap_base(&mut raw);
        assert_eq!(raw, vec![(1, 1)]);
        assert_eq!(b.into_base(), vec![(8, 0), (9, 0)]);
    }

    proptest! {
        #[test]
        fn agrees_with_btree_map(entries in proptest::collection::vec((0..20u8, 0..100u32), 0..60)) {
            let mut map = FlatMap::new();
            let mut model = std::collections::BTreeMap::new();
            for &(k, v) in &entries {
                map.insert((k, v));
                model.entry(k).or_insert(v);
            }
            prop_assert_eq!(
                map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
                model.into_iter().collect::<Vec<_>>()
            );
        }

        #[test]
        fn bulk_keys_match_sequential(
            old in proptest::collection::vec((0..20u8, 0..100u32), 0..30),
            new in proptest::collection::vec((0..20u8, 0..100u32), 0..30),
        ) {
            let mut bulk = FlatMap::from_base(old.clone());
            let mut seq = FlatMap::from_base(old);
            bulk.insert_iter(new.iter().cloned());
            for &e in &new {
                seq.insert(e);
            }
            prop_assert_eq!(bulk.keys().collect::<Vec<_>>(), seq.keys().collect::<Vec<_>>());
            prop_assert!(bulk.as_slice().windows(2).all(|w| w[0].0 < w[1].0));
        }
    }
}
