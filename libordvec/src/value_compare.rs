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

use std::borrow::Borrow;

use crate::Compare;

/// Turns a comparator on keys into a comparator on `(key, value)` entries.
///
/// Entries are ordered by their keys alone; the values are never looked at. Besides comparing
/// two entries, this can compare a bare key against an entry (in either order), which is what
/// the maps use for their lookups: there's no need to make up a placeholder value just to search
/// for a key.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ValueCompare<C> {
    key_compare: C,
}

impl<C> ValueCompare<C> {
    /// Wraps a key comparator.
    pub fn new(key_compare: C) -> ValueCompare<C> {
        ValueCompare { key_compare }
    }

    /// The wrapped key comparator.
    pub fn key_compare(&self) -> &C {
        &self.key_compare
    }

    /// Unwraps the key comparator.
    pub fn into_key_compare(self) -> C {
        self.key_compare
    }

    /// Is the key of `lhs` less than the key of `rhs`?
    pub fn entries<K, V>(&self, lhs: &(K, V), rhs: &(K, V)) -> bool
    where
        C: Compare<K>,
    {
        self.key_compare.less(&lhs.0, &rhs.0)
    }

    /// Is `key` less than the key of `entry`?
    pub fn key_entry<Q, K, V>(&self, key: &Q, entry: &(K, V)) -> bool
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.key_compare.less(key, entry.0.borrow())
    }

    /// Is the key of `entry` less than `key`?
    pub fn entry_key<Q, K, V>(&self, entry: &(K, V), key: &Q) -> bool
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: Compare<Q>,
    {
        self.key_compare.less(entry.0.borrow(), key)
    }
}

impl<K, V, C: Compare<K>> Compare<(K, V)> for ValueCompare<C> {
    fn less(&self, lhs: &(K, V), rhs: &(K, V)) -> bool {
        self.entries(lhs, rhs)
    }
}
