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

//! The algorithms shared by all of the containers.
//!
//! An [`Engine`] owns a [`Sequence`] and a comparator, and keeps the sequence sorted. When
//! `UNIQUE` is true it also keeps it free of equivalent neighbors (which, given that it's
//! sorted, means free of equivalent elements altogether). Sets and maps use `UNIQUE = true`;
//! multisets and multimaps use `UNIQUE = false`.
//!
//! # Panics in the comparator
//!
//! The single-element operations only compare before they move anything, so a panicking
//! comparator leaves the container as it was. The bulk operations ([`Engine::insert_iter`],
//! construction from a base sequence, [`Engine::swap_base`]) are different: if the comparator
//! panics while they are sorting, merging or removing duplicates, the container still owns
//! exactly the elements it owned before plus the new ones, but in no particular order and
//! possibly with duplicates. It is up to the caller to discard the container (or to re-sort it
//! with [`Engine::assign_base`]) in that case.

use std::{borrow::Borrow, iter::Peekable, marker::PhantomData, mem, ops::Range};

use itertools::Itertools;

use crate::{Compare, Error, Sequence};

/// Finds the partition point of `slice` with respect to `before`, guessing that it is near
/// `hint`.
///
/// `before` must be true for some prefix of `slice` and false for the rest; the return value is
/// the length of that prefix, exactly as in `slice::partition_point`. Starting from `hint`, we
/// probe at distances 1, 3, 7, 15, ... until we find elements on both sides of the partition
/// point (or run off the end), and then binary search between them. If the partition point is
/// `d` away from `hint`, this takes `O(log d)` calls to `before`. The hint can be anything at
/// all (even past the end); a bad hint only makes things slower.
pub(crate) fn gallop<T, F>(slice: &[T], hint: usize, mut before: F) -> usize
where
    F: FnMut(&T) -> bool,
{
    let len = slice.len();
    let hint = hint.min(len);

    let (lo, hi) = if hint > 0 && !before(&slice[hint - 1]) {
        // The partition point is at or before `hint - 1`, so search to the left. At every step,
        // `slice[hi]` is known not to come before.
        let mut hi = hint - 1;
        let mut step = 1;
        let lo = loop {
            let Some(probe) = hi.checked_sub(step) else {
                break 0;
            };
            if before(&slice[probe]) {
                break probe + 1;
            }
            hi = probe;
            step = step * 2 + 1;
        };
        (lo, hi)
    } else if hint < len && before(&slice[hint]) {
        // The partition point is after `hint`, so search to the right. At every step,
        // `slice[lo - 1]` is known to come before.
        let mut lo = hint + 1;
        let mut step = 1;
        let hi = loop {
            let probe = lo - 1 + step;
            if probe >= len {
                break len;
            }
            if !before(&slice[probe]) {
                break probe;
            }
            lo = probe + 1;
            step = step * 2 + 1;
        };
        (lo, hi)
    } else {
        return hint;
    };

    lo + slice[lo..hi].partition_point(before)
}

/// A sorted sequence together with the comparator that sorts it.
pub(crate) struct Engine<T, S, C, const UNIQUE: bool> {
    seq: S,
    comp: C,
    marker: PhantomData<fn() -> T>,
}

impl<T, S: Clone, C: Clone, const UNIQUE: bool> Clone for Engine<T, S, C, UNIQUE> {
    fn clone(&self) -> Self {
        Engine {
            seq: self.seq.clone(),
            comp: self.comp.clone(),
            marker: PhantomData,
        }
    }
}

impl<T, S: Sequence<T>, C, const UNIQUE: bool> Engine<T, S, C, UNIQUE> {
    pub fn new(comp: C) -> Self {
        Engine {
            seq: S::default(),
            comp,
            marker: PhantomData,
        }
    }

    pub fn with_capacity(capacity: usize, comp: C) -> Self {
        Engine {
            seq: S::with_capacity(capacity),
            comp,
            marker: PhantomData,
        }
    }

    pub fn base(&self) -> &S {
        &self.seq
    }

    pub fn into_base(self) -> S {
        self.seq
    }

    pub fn as_slice(&self) -> &[T] {
        self.seq.as_slice()
    }

    pub fn comp(&self) -> &C {
        &self.comp
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.seq.max_size()
    }

    pub fn capacity(&self) -> usize {
        self.seq.capacity()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.seq.reserve(additional);
    }

    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.seq.try_reserve(additional)
    }

    pub fn clear(&mut self) {
        self.seq.clear();
    }

    pub fn erase_at(&mut self, index: usize) -> T {
        self.seq.remove(index)
    }

    pub fn erase_range(&mut self, range: Range<usize>) {
        self.seq.remove_range(range);
    }

    /// Removes all the elements for which `keep` returns false.
    ///
    /// Mutable access is only for the benefit of the maps, which hand out their values mutably.
    /// The parts of an element that the comparator looks at must not be changed.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&mut T) -> bool,
    {
        let slice = self.seq.as_mut_slice();
        let mut kept = 0;
        for read in 0..slice.len() {
            if keep(&mut slice[read]) {
                slice.swap(kept, read);
                kept += 1;
            }
        }
        self.seq.truncate(kept);
    }

    /// Mutable access to the elements, for the maps. The same caveat applies as for `retain`.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.seq.as_mut_slice()
    }

    /// Exchanges contents and comparators with `other`.
    ///
    /// The comparators go first. With the sequences we have, swapping can't fail; but if it
    /// could, a failure would leave the comparators exchanged and the sequences not.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.comp, &mut other.comp);
        mem::swap(&mut self.seq, &mut other.seq);
    }
}

impl<T, S: Sequence<T>, C: Compare<T>, const UNIQUE: bool> Engine<T, S, C, UNIQUE> {
    /// Adopts `seq`, sorting it (and removing duplicates, if `UNIQUE`).
    pub fn from_base(seq: S, comp: C) -> Self {
        let mut ret = Engine {
            seq,
            comp,
            marker: PhantomData,
        };
        ret.normalize();
        ret
    }

    /// Adopts `seq`, which must already be sorted (and free of duplicates, if `UNIQUE`).
    pub fn from_sorted_base(seq: S, comp: C) -> Result<Self, Error> {
        let ret = Engine {
            seq,
            comp,
            marker: PhantomData,
        };
        match ret.first_disorder() {
            Some(index) => Err(Error::Unsorted { index }),
            None => Ok(ret),
        }
    }

    /// Replaces the contents with `seq`, which is then sorted (and deduplicated, if `UNIQUE`).
    pub fn assign_base(&mut self, seq: S) {
        self.seq = seq;
        self.normalize();
    }

    /// Exchanges the contents with a raw sequence, and then sorts (and maybe deduplicates) what
    /// we got. This is `O(n log n)`, not `O(1)`.
    pub fn swap_base(&mut self, other: &mut S) {
        mem::swap(&mut self.seq, other);
        trace!("swapped in a base sequence of {} elements", self.seq.len());
        self.normalize();
    }

    /// Must `elem` come before `value` in the sequence?
    ///
    /// Equivalent elements don't, so a new value always goes at the lower bound. With unique
    /// elements that's where we check for an existing equivalent; without, the new value ends up
    /// in front of its equivalents.
    fn goes_before(&self, elem: &T, value: &T) -> bool {
        self.comp.less(elem, value)
    }

    /// Inserts `value` at `at`, which must be where it belongs. If `UNIQUE` and there's already
    /// an equivalent element there, does nothing.
    fn place(&mut self, at: usize, value: T) -> (usize, bool) {
        if UNIQUE {
            if let Some(existing) = self.seq.as_slice().get(at) {
                if !self.comp.less(&value, existing) {
                    return (at, false);
                }
            }
        }
        self.seq.insert(at, value);
        (at, true)
    }

    /// Inserts `value` at `index` without any checks. The caller must have searched for `index`.
    pub fn insert_at(&mut self, index: usize, value: T) {
        debug_assert!(index == 0 || self.goes_before(&self.seq.as_slice()[index - 1], &value));
        self.seq.insert(index, value);
    }

    /// Inserts a single element, returning its position and whether it was actually inserted.
    ///
    /// If `UNIQUE` and an equivalent element is already present, the position is that of the
    /// existing element and nothing changes.
    pub fn insert(&mut self, value: T) -> (usize, bool) {
        let at = self
            .seq
            .as_slice()
            .partition_point(|e| self.goes_before(e, &value));
        self.place(at, value)
    }

    /// Like [`Engine::insert`], but starts looking for the right position at `hint`.
    pub fn insert_hint(&mut self, hint: usize, value: T) -> (usize, bool) {
        let at = gallop(self.seq.as_slice(), hint, |e| self.goes_before(e, &value));
        self.place(at, value)
    }

    /// Inserts a whole bunch of elements at once.
    ///
    /// The new elements are appended, sorted among themselves, and then merged with the old
    /// ones. If `UNIQUE`, duplicates are removed afterwards; where a new element is equivalent
    /// to an old one, the old one stays. If the iterator panics, the elements it produced are
    /// removed again before the panic continues.
    pub fn insert_iter<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        let before = self.seq.len();
        {
            let mut rollback = Rollback::<T, S>::new(&mut self.seq);
            rollback.seq.extend(iter);
            rollback.disarm();
        }
        self.merge_appended(before);
    }

    /// Like [`Engine::insert_iter`], but first tries to reserve room for the iterator's lower
    /// size bound, and gives up (without changing anything) if that fails.
    pub fn try_insert_iter<I>(&mut self, iter: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = T>,
    {
        let iter = iter.into_iter();
        self.seq.try_reserve(iter.size_hint().0)?;
        self.insert_iter(iter);
        Ok(())
    }

    fn merge_appended(&mut self, before: usize) {
        let added = self.seq.len() - before;
        if added == 0 {
            return;
        }

        trace!("sorting {} appended elements", added);
        let comp = &self.comp;
        let slice = self.seq.as_mut_slice();
        slice[before..].sort_by(|a, b| comp.ordering(a, b));
        // If the new elements all belong after the old ones, there's nothing to merge.
        if before > 0 && comp.less(&slice[before], &slice[before - 1]) {
            trace!("merging {} appended elements into {}", added, before);
            self.merge(before);
        }

        if UNIQUE {
            self.dedup();
        }
    }

    // Merges the sorted runs `[..mid]` and `[mid..]`. Where elements are equivalent, the ones
    // from the first run go first.
    fn merge(&mut self, mid: usize) {
        let right = self.seq.split_off(mid);
        let left = mem::take(&mut self.seq);
        self.seq.reserve(left.len() + right.len());

        let comp = &self.comp;
        let mut merge = Merge {
            out: &mut self.seq,
            left: left.into_iter().peekable(),
            right: right.into_iter().peekable(),
        };
        loop {
            let take_right = match (merge.left.peek(), merge.right.peek()) {
                (Some(l), Some(r)) => comp.less(r, l),
                _ => break,
            };
            let next = if take_right {
                merge.right.next()
            } else {
                merge.left.next()
            };
            merge.out.extend(next);
        }
        // Dropping `merge` moves whatever is left of the runs to the output.
    }

    // Removes all but the first of every run of equivalent elements. Nothing is dropped until
    // the end: the duplicates are swapped to the back and then truncated.
    fn dedup(&mut self) {
        let comp = &self.comp;
        let slice = self.seq.as_mut_slice();
        if slice.is_empty() {
            return;
        }

        let mut kept = 0;
        for read in 1..slice.len() {
            if comp.less(&slice[kept], &slice[read]) {
                kept += 1;
                slice.swap(kept, read);
            }
        }

        let removed = slice.len() - (kept + 1);
        if removed > 0 {
            trace!("removing {} duplicate elements", removed);
            self.seq.truncate(kept + 1);
        }
    }

    fn normalize(&mut self) {
        let comp = &self.comp;
        self.seq
            .as_mut_slice()
            .sort_by(|a, b| comp.ordering(a, b));
        if UNIQUE {
            self.dedup();
        }
    }

    // The index of the first element that is out of place relative to its predecessor.
    fn first_disorder(&self) -> Option<usize> {
        self.seq
            .as_slice()
            .iter()
            .tuple_windows()
            .position(|(a, b)| {
                if UNIQUE {
                    !self.comp.less(a, b)
                } else {
                    self.comp.less(b, a)
                }
            })
            .map(|i| i + 1)
    }

    /// Checks that the sequence is sorted (and, if `UNIQUE`, free of duplicates).
    pub fn is_normalized(&self) -> bool {
        self.first_disorder().is_none()
    }

    /// The index of the first element for which `elem_less` is false.
    ///
    /// `elem_less` should say whether an element is less than whatever is being searched for.
    pub fn lower_bound_by<F>(&self, elem_less: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        self.seq.as_slice().partition_point(elem_less)
    }

    /// The index of the first element for which `probe_less` is true.
    ///
    /// `probe_less` should say whether whatever is being searched for is less than an element.
    pub fn upper_bound_by<F>(&self, mut probe_less: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        self.seq.as_slice().partition_point(|e| !probe_less(e))
    }

    pub fn equal_range_by<F, G>(&self, elem_less: F, mut probe_less: G) -> Range<usize>
    where
        F: FnMut(&T) -> bool,
        G: FnMut(&T) -> bool,
    {
        let lo = self.lower_bound_by(elem_less);
        let hi = lo + self.seq.as_slice()[lo..].partition_point(|e| !probe_less(e));
        lo..hi
    }

    /// The index of the first element equivalent to the probe, if there is one.
    pub fn find_by<F, G>(&self, elem_less: F, mut probe_less: G) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
        G: FnMut(&T) -> bool,
    {
        let i = self.lower_bound_by(elem_less);
        match self.seq.as_slice().get(i) {
            Some(e) if !probe_less(e) => Some(i),
            _ => None,
        }
    }

    pub fn lower_bound<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        self.lower_bound_by(|e| self.comp.less(e.borrow(), key))
    }

    pub fn upper_bound<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        self.upper_bound_by(|e| self.comp.less(key, e.borrow()))
    }

    pub fn equal_range<Q>(&self, key: &Q) -> Range<usize>
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        self.equal_range_by(
            |e| self.comp.less(e.borrow(), key),
            |e| self.comp.less(key, e.borrow()),
        )
    }

    pub fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        self.find_by(
            |e| self.comp.less(e.borrow(), key),
            |e| self.comp.less(key, e.borrow()),
        )
    }

    /// Counts the elements equivalent to `key`: 0 or 1 if `UNIQUE`, anything otherwise.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        if UNIQUE {
            self.find(key).is_some() as usize
        } else {
            self.equal_range(key).len()
        }
    }

    /// Removes every element equivalent to `key`, returning how many there were.
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        Q: ?Sized,
        T: Borrow<Q>,
        C: Compare<Q>,
    {
        let range = self.equal_range(key);
        let count = range.len();
        if count > 0 {
            self.seq.remove_range(range);
        }
        count
    }
}

// Truncates the sequence back to its original length when dropped, unless disarmed first.
struct Rollback<'a, T, S: Sequence<T>> {
    seq: &'a mut S,
    len: usize,
    armed: bool,
    marker: PhantomData<fn() -> T>,
}

impl<'a, T, S: Sequence<T>> Rollback<'a, T, S> {
    fn new(seq: &'a mut S) -> Self {
        let len = seq.len();
        Rollback {
            seq,
            len,
            armed: true,
            marker: PhantomData,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<T, S: Sequence<T>> Drop for Rollback<'_, T, S> {
    fn drop(&mut self) {
        if self.armed {
            debug!(
                "rolling back {} appended elements",
                self.seq.len().saturating_sub(self.len)
            );
            self.seq.truncate(self.len);
        }
    }
}

// The state of a merge in progress. However the merge ends (even if the comparator panics), the
// output gets everything that hasn't been merged yet, so no element is ever lost.
struct Merge<'a, S, I>
where
    S: Extend<I::Item>,
    I: Iterator,
{
    out: &'a mut S,
    left: Peekable<I>,
    right: Peekable<I>,
}

impl<S, I> Drop for Merge<'_, S, I>
where
    S: Extend<I::Item>,
    I: Iterator,
{
    fn drop(&mut self) {
        self.out.extend(self.left.by_ref());
        self.out.extend(self.right.by_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Natural;
    use proptest::prelude::*;
    use std::{
        cell::Cell,
        panic::{AssertUnwindSafe, catch_unwind},
    };

    type Unique = Engine<i32, Vec<i32>, Natural, true>;
    type Equal = Engine<i32, Vec<i32>, Natural, false>;

    // A comparator that panics once it has been called `budget` times.
    #[derive(Clone)]
    struct Fuse<'a> {
        budget: &'a Cell<usize>,
    }

    impl Compare<i32> for Fuse<'_> {
        fn less(&self, lhs: &i32, rhs: &i32) -> bool {
            let left = self.budget.get();
            if left == 0 {
                panic!("the comparator blew a fuse");
            }
            self.budget.set(left - 1);
            lhs < rhs
        }
    }

    // Counts how many times it has been dropped.
    #[derive(Debug)]
    struct Counted<'a> {
        value: i32,
        drops: &'a Cell<usize>,
    }

    impl Drop for Counted<'_> {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    impl Compare<Counted<'_>> for Fuse<'_> {
        fn less(&self, lhs: &Counted<'_>, rhs: &Counted<'_>) -> bool {
            <Self as Compare<i32>>::less(self, &lhs.value, &rhs.value)
        }
    }

    // Entries that compare by their first component only, so we can tell equivalent ones apart.
    fn by_key(a: &(u8, u32), b: &(u8, u32)) -> bool {
        a.0 < b.0
    }

    fn sorted(mut v: Vec<i32>) -> Vec<i32> {
        v.sort();
        v
    }

    #[test]
    fn gallop_exact_hint() {
        let v = [1, 3, 5, 7];
        assert_eq!(gallop(&v, 2, |x| *x < 4), 2);
        assert_eq!(gallop(&v, 0, |x| *x < 0), 0);
        assert_eq!(gallop(&v, 4, |x| *x < 10), 4);
    }

    #[test]
    fn gallop_bad_hints() {
        let v: Vec<i32> = (0..100).collect();
        assert_eq!(gallop(&v, 0, |x| *x < 99), 99);
        assert_eq!(gallop(&v, 100, |x| *x < 1), 1);
        assert_eq!(gallop(&v, 1000, |x| *x < 50), 50);
        assert_eq!(gallop(&[] as &[i32], 5, |x| *x < 50), 0);
    }

    #[test]
    fn gallop_probes_logarithmically() {
        let v: Vec<i32> = (0..1_000_000).collect();
        let calls = Cell::new(0);
        let at = gallop(&v, 500_000, |x| {
            calls.set(calls.get() + 1);
            *x < 500_010
        });
        assert_eq!(at, 500_010);
        // Distance 10 should take a handful of probes, not the 20 of a full binary search.
        assert!(calls.get() <= 10, "took {} probes", calls.get());
    }

    #[test]
    fn unique_insert() {
        let mut e = Unique::new(Natural);
        assert_eq!(e.insert(5), (0, true));
        assert_eq!(e.insert(3), (0, true));
        assert_eq!(e.insert(8), (2, true));
        assert_eq!(e.insert(3), (0, false));
        assert_eq!(e.as_slice(), &[3, 5, 8]);
    }

    #[test]
    fn equal_insert_goes_first() {
        let mut e: Engine<(u8, u32), Vec<_>, _, false> = Engine::new(by_key);
        assert_eq!(e.insert((1, 0)), (0, true));
        assert_eq!(e.insert((0, 1)), (0, true));
        assert_eq!(e.insert((1, 2)), (1, true));
        assert_eq!(e.insert_hint(0, (1, 3)), (1, true));
        assert_eq!(e.insert_hint(4, (0, 4)), (0, true));
        assert_eq!(e.as_slice(), &[(0, 4), (0, 1), (1, 3), (1, 2), (1, 0)]);
        assert_eq!(e.lower_bound_by(|x| x.0 < 1), 2);
    }

    #[test]
    fn equal_insert_lands_on_lower_bound() {
        let mut e: Engine<(u8, u32), Vec<_>, _, false> =
            Engine::from_base(vec![(1, 0), (1, 1), (2, 0)], by_key);
        for (hint, value) in [(0, (1, 10)), (3, (1, 11)), (100, (1, 12))] {
            let lower = e.lower_bound_by(|x| x.0 < value.0);
            assert_eq!(e.insert_hint(hint, value), (lower, true));
            assert_eq!(e.as_slice()[lower], value);
        }
        let lower = e.lower_bound_by(|x| x.0 < 2);
        assert_eq!(e.insert((2, 1)), (lower, true));
    }

    #[test]
    fn bulk_keeps_old_representatives() {
        let mut e: Engine<(u8, u32), Vec<_>, _, true> =
            Engine::from_base(vec![(3, 0), (1, 0), (3, 1)], by_key);
        assert_eq!(e.as_slice(), &[(1, 0), (3, 0)]);
        e.insert_iter(vec![(2, 1), (1, 1), (0, 1), (2, 2)]);
        assert_eq!(e.as_slice(), &[(0, 1), (1, 0), (2, 1), (3, 0)]);
    }

    #[test]
    fn bulk_appends_without_merging() {
        let mut e = Equal::from_base(vec![1, 2, 3], Natural);
        e.insert_iter(vec![5, 4, 3]);
        assert_eq!(e.as_slice(), &[1, 2, 3, 3, 4, 5]);
    }

    #[test]
    fn from_sorted_base() {
        assert!(Unique::from_sorted_base(vec![1, 2, 3], Natural).is_ok());
        match Unique::from_sorted_base(vec![1, 2, 2], Natural) {
            Err(Error::Unsorted { index }) => assert_eq!(index, 2),
            _ => panic!("duplicates should be rejected"),
        }
        assert!(Equal::from_sorted_base(vec![1, 2, 2], Natural).is_ok());
        match Equal::from_sorted_base(vec![1, 3, 2], Natural) {
            Err(Error::Unsorted { index }) => assert_eq!(index, 2),
            _ => panic!("disorder should be rejected"),
        }
    }

    #[test]
    fn erase_removes_whole_range() {
        let mut e = Equal::from_base(vec![2, 1, 2, 3, 2], Natural);
        assert_eq!(e.erase(&2), 3);
        assert_eq!(e.erase(&2), 0);
        assert_eq!(e.as_slice(), &[1, 3]);
    }

    #[test]
    fn swap_base_sorts() {
        let mut e = Unique::from_base(vec![1, 2], Natural);
        let mut raw = vec![9, 7, 9, 8];
        e.swap_base(&mut raw);
        assert_eq!(raw, vec![1, 2]);
        assert_eq!(e.as_slice(), &[7, 8, 9]);
    }

    #[test]
    fn panicking_iterator_rolls_back() {
        let mut e = Unique::from_base(vec![4, 2], Natural);
        let result = catch_unwind(AssertUnwindSafe(|| {
            e.insert_iter((0..10).map(|i| if i == 5 { panic!("bad iterator") } else { i }));
        }));
        assert!(result.is_err());
        assert_eq!(e.as_slice(), &[2, 4]);
    }

    // An iterator that claims to be enormous.
    struct Huge;

    impl Iterator for Huge {
        type Item = i32;

        fn next(&mut self) -> Option<i32> {
            None
        }

        fn size_hint(&self) -> (usize, Option<usize>) {
            (usize::MAX, None)
        }
    }

    #[test]
    fn failed_reservation_changes_nothing() {
        let mut e = Unique::from_base(vec![1, 2, 3], Natural);
        assert!(matches!(
            e.try_insert_iter(Huge),
            Err(Error::TryReserve(_))
        ));
        assert_eq!(e.as_slice(), &[1, 2, 3]);
        assert!(e.try_insert_iter(vec![0]).is_ok());
        assert_eq!(e.as_slice(), &[0, 1, 2, 3]);
    }

    // Whenever the comparator panics in the middle of a bulk insertion, we keep all the elements,
    // although they may be out of order and contain duplicates.
    #[test]
    fn panicking_comparator_loses_nothing() {
        let old = vec![10, 0, 20, 5, 15, 5];
        let new = vec![7, 20, 3, 11, 0, 30, 7];
        let mut everything = vec![0, 5, 10, 15, 20];
        everything.extend(new.iter().cloned());
        let everything = sorted(everything);

        let budget = Cell::new(usize::MAX);
        let mut panicked = 0;
        for limit in 0..200 {
            budget.set(usize::MAX);
            let mut e: Engine<i32, Vec<i32>, _, true> =
                Engine::from_base(old.clone(), Fuse { budget: &budget });
            budget.set(limit);
            let result = catch_unwind(AssertUnwindSafe(|| e.insert_iter(new.clone())));
            budget.set(usize::MAX);

            if result.is_err() {
                panicked += 1;
                assert_eq!(sorted(e.as_slice().to_vec()), everything);
            } else {
                assert!(e.is_normalized());
                assert_eq!(e.as_slice(), &[0, 3, 5, 7, 10, 11, 15, 20, 30]);
            }
        }
        assert!(panicked > 0);
    }

    // The same goes for sorting a whole base sequence, when it is swapped or assigned in.
    #[test]
    fn panicking_comparator_while_adopting_a_base() {
        let raw = vec![5, 1, 5, 3, 2, 4, 0, 3];
        let budget = Cell::new(usize::MAX);
        let mut panicked = 0;
        for limit in 0..100 {
            budget.set(usize::MAX);
            let mut swapped: Engine<i32, Vec<i32>, _, true> =
                Engine::from_base(vec![9, 8], Fuse { budget: &budget });
            let mut other = raw.clone();
            budget.set(limit);
            let result = catch_unwind(AssertUnwindSafe(|| swapped.swap_base(&mut other)));
            budget.set(usize::MAX);
            assert_eq!(other, vec![8, 9]);
            if result.is_err() {
                panicked += 1;
                assert_eq!(sorted(swapped.as_slice().to_vec()), sorted(raw.clone()));
            } else {
                assert_eq!(swapped.as_slice(), &[0, 1, 2, 3, 4, 5]);
            }

            let mut assigned: Engine<i32, Vec<i32>, _, false> =
                Engine::from_base(vec![7], Fuse { budget: &budget });
            budget.set(limit);
            let result = catch_unwind(AssertUnwindSafe(|| assigned.assign_base(raw.clone())));
            budget.set(usize::MAX);
            if result.is_err() {
                panicked += 1;
                assert_eq!(sorted(assigned.as_slice().to_vec()), sorted(raw.clone()));
            } else {
                assert_eq!(assigned.as_slice(), &[0, 1, 2, 3, 3, 4, 5, 5]);
            }
        }
        assert!(panicked > 0);
    }

    // If building from a base sequence panics, the half-built container is dropped along with
    // everything in it, exactly once.
    #[test]
    fn panicking_comparator_while_building() {
        let values = [5, 1, 5, 3, 2, 4, 0, 3];
        let budget = Cell::new(usize::MAX);
        let mut panicked = 0;
        for limit in 0..100 {
            let drops = Cell::new(0);
            let raw: Vec<Counted<'_>> = values
                .iter()
                .map(|&value| Counted {
                    value,
                    drops: &drops,
                })
                .collect();
            budget.set(limit);
            let result = catch_unwind(AssertUnwindSafe(|| {
                let e: Engine<Counted<'_>, Vec<_>, _, true> =
                    Engine::from_base(raw, Fuse { budget: &budget });
                e.as_slice().iter().map(|c| c.value).collect::<Vec<_>>()
            }));
            budget.set(usize::MAX);
            match result {
                Err(_) => panicked += 1,
                Ok(built) => assert_eq!(built, vec![0, 1, 2, 3, 4, 5]),
            }
            assert_eq!(drops.get(), values.len());
        }
        assert!(panicked > 0);
    }

    proptest! {
        #[test]
        fn gallop_agrees_with_partition_point(
            mut v in proptest::collection::vec(0..100i32, 0..50),
            x in 0..100i32,
            hint in 0..60usize,
        ) {
            v.sort();
            prop_assert_eq!(gallop(&v, hint, |y| *y < x), v.partition_point(|y| *y < x));
            prop_assert_eq!(gallop(&v, hint, |y| *y <= x), v.partition_point(|y| *y <= x));
        }

        #[test]
        fn hints_do_not_matter(
            values in proptest::collection::vec((0..20i32, 0..30usize), 0..40),
        ) {
            let mut plain = Equal::new(Natural);
            let mut hinted = Equal::new(Natural);
            let mut plain_unique = Unique::new(Natural);
            let mut hinted_unique = Unique::new(Natural);
            for &(v, hint) in &values {
                plain.insert(v);
                hinted.insert_hint(hint, v);
                let (_, inserted) = plain_unique.insert(v);
                let (_, hinted_inserted) = hinted_unique.insert_hint(hint, v);
                prop_assert_eq!(inserted, hinted_inserted);
            }
            prop_assert_eq!(plain.as_slice(), hinted.as_slice());
            prop_assert_eq!(plain_unique.as_slice(), hinted_unique.as_slice());
            prop_assert!(hinted.is_normalized());
            prop_assert!(hinted_unique.is_normalized());
        }

        #[test]
        fn bulk_matches_sequential(
            old in proptest::collection::vec(0..50i32, 0..30),
            new in proptest::collection::vec(0..50i32, 0..30),
        ) {
            let mut bulk = Unique::from_base(old.clone(), Natural);
            let mut one_by_one = Unique::from_base(old.clone(), Natural);
            bulk.insert_iter(new.iter().cloned());
            for &v in new.iter().rev() {
                one_by_one.insert(v);
            }
            prop_assert_eq!(bulk.as_slice(), one_by_one.as_slice());
            prop_assert!(bulk.is_normalized());

            let mut bulk = Equal::from_base(old.clone(), Natural);
            let mut one_by_one = Equal::from_base(old, Natural);
            bulk.insert_iter(new.iter().cloned());
            for &v in &new {
                one_by_one.insert(v);
            }
            prop_assert_eq!(bulk.as_slice(), one_by_one.as_slice());
        }

        #[test]
        fn multiplicity(
            values in proptest::collection::vec(0..10i32, 0..40),
            erased in 0..10i32,
        ) {
            let mut e = Equal::new(Natural);
            e.insert_iter(values.iter().cloned());
            e.erase(&erased);
            for k in 0..10 {
                let expected = if k == erased {
                    0
                } else {
                    values.iter().filter(|&&v| v == k).count()
                };
                prop_assert_eq!(e.count(&k), expected);
            }
        }
    }
}
