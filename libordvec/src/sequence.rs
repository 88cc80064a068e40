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

//! The storage that the containers in this crate are built on.
//!
//! All of the containers keep their elements in a single contiguous sequence, sorted by their
//! comparator. They don't much care what that sequence is, as long as it implements
//! [`Sequence`]. `Vec` is the default; with the `smallvec` feature, `SmallVec` works too.

use std::ops::Range;

use crate::Error;

/// An owned, contiguous, random-access sequence of `T`s.
///
/// Positions are plain indices. Anything that changes the structure of the sequence (inserting,
/// removing, reserving) may move every element, so indices obtained before such a change should
/// not be relied on afterwards.
pub trait Sequence<T>: Default + Extend<T> + FromIterator<T> + IntoIterator<Item = T> {
    /// Creates an empty sequence with room for at least `capacity` elements.
    fn with_capacity(capacity: usize) -> Self;

    /// Views the sequence as a slice.
    fn as_slice(&self) -> &[T];

    /// Views the sequence as a mutable slice.
    fn as_mut_slice(&mut self) -> &mut [T];

    /// Appends an element to the end.
    fn push(&mut self, value: T);

    /// Inserts an element at `index`, shifting everything after it to the right.
    ///
    /// Panics if `index > len`.
    fn insert(&mut self, index: usize, value: T);

    /// Removes and returns the element at `index`, shifting everything after it to the left.
    ///
    /// Panics if `index >= len`.
    fn remove(&mut self, index: usize) -> T;

    /// Removes the elements in `range`.
    fn remove_range(&mut self, range: Range<usize>);

    /// Shortens the sequence to `len` elements. Does nothing if it is already shorter.
    fn truncate(&mut self, len: usize);

    /// Splits the sequence in two, returning everything from `at` onwards.
    fn split_off(&mut self, at: usize) -> Self;

    /// The number of elements.
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Are there any elements?
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all of the elements.
    fn clear(&mut self) {
        self.truncate(0);
    }

    /// The number of elements the sequence can hold without reallocating.
    ///
    /// Sequences without a notion of capacity report their length.
    fn capacity(&self) -> usize {
        self.len()
    }

    /// Makes room for at least `additional` more elements. Sequences without a notion of capacity
    /// ignore this.
    fn reserve(&mut self, additional: usize) {
        let _ = additional;
    }

    /// Like [`Sequence::reserve`], but reports failure instead of aborting.
    fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        let _ = additional;
        Ok(())
    }

    /// The largest number of elements that this sequence could ever hold.
    fn max_size(&self) -> usize {
        isize::MAX as usize / std::mem::size_of::<T>().max(1)
    }
}

impl<T> Sequence<T> for Vec<T> {
    fn with_capacity(capacity: usize) -> Self {
        Vec::with_capacity(capacity)
    }

    fn as_slice(&self) -> &[T] {
        self
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    fn push(&mut self, value: T) {
        Vec::push(self, value);
    }

    fn insert(&mut self, index: usize, value: T) {
        Vec::insert(self, index, value);
    }

    fn remove(&mut self, index: usize) -> T {
        Vec::remove(self, index)
    }

    fn remove_range(&mut self, range: Range<usize>) {
        self.drain(range);
    }

    fn truncate(&mut self, len: usize) {
        Vec::truncate(self, len);
    }

    fn split_off(&mut self, at: usize) -> Self {
        Vec::split_off(self, at)
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn capacity(&self) -> usize {
        Vec::capacity(self)
    }

    fn reserve(&mut self, additional: usize) {
        Vec::reserve(self, additional);
    }

    fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        Ok(Vec::try_reserve(self, additional)?)
    }
}

#[cfg(feature = "smallvec")]
impl<A: smallvec::Array> Sequence<A::Item> for smallvec::SmallVec<A> {
    fn with_capacity(capacity: usize) -> Self {
        smallvec::SmallVec::with_capacity(capacity)
    }

    fn as_slice(&self) -> &[A::Item] {
        self
    }

    fn as_mut_slice(&mut self) -> &mut [A::Item] {
        self
    }

    fn push(&mut self, value: A::Item) {
        smallvec::SmallVec::push(self, value);
    }

    fn insert(&mut self, index: usize, value: A::Item) {
        smallvec::SmallVec::insert(self, index, value);
    }

    fn remove(&mut self, index: usize) -> A::Item {
        smallvec::SmallVec::remove(self, index)
    }

    fn remove_range(&mut self, range: Range<usize>) {
        self.drain(range);
    }

    fn truncate(&mut self, len: usize) {
        smallvec::SmallVec::truncate(self, len);
    }

    fn split_off(&mut self, at: usize) -> Self {
        self.drain(at..).collect()
    }

    fn capacity(&self) -> usize {
        smallvec::SmallVec::capacity(self)
    }

    fn reserve(&mut self, additional: usize) {
        smallvec::SmallVec::reserve(self, additional);
    }

    fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        smallvec::SmallVec::try_reserve(self, additional)
            .map_err(|_| Error::Capacity { additional })
    }
}
