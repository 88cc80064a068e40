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

#![deny(missing_docs)]

//! Sets and maps that keep their elements sorted in a contiguous sequence.
//!
//! The four containers here ([`FlatSet`], [`FlatMultiSet`], [`FlatMap`] and [`FlatMultiMap`])
//! are thin layers over a sorted [`Sequence`] (usually a `Vec`). Compared to the tree-based
//! collections in `std`, they use less memory and are much faster to search and to iterate
//! over, but inserting or removing a single element costs `O(n)`. They are a good fit for
//! collections that are built once (or in big batches, see `insert_iter`) and then mostly read.
//!
//! Every container has a comparator (see [`Compare`]), which defaults to [`Natural`], the order
//! given by `Ord`. Two elements are equivalent if neither is less than the other; the sets and
//! maps hold at most one element per equivalence class, while the multisets and multimaps keep
//! all of them next to one another. A single insertion into a multiset or multimap goes at the
//! lower bound, in front of the existing equivalents.
//!
//! Positions are plain indices into the container's slice. Hinted insertion
//! (`insert_hint`) takes a position where the new element probably belongs, and finds the
//! actual position in time logarithmic in the distance between the two.

#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

// The containers compare, hash, clone and consume themselves as their underlying slices do.
macro_rules! impl_sequence_traits {
    ($name:ident<$($param:ident),*>, $elem:ty) => {
        impl<$($param),*> PartialEq for $name<$($param),*>
        where
            S: $crate::Sequence<$elem>,
            $elem: PartialEq,
        {
            fn eq(&self, other: &Self) -> bool {
                self.as_slice() == other.as_slice()
            }
        }

        impl<$($param),*> Eq for $name<$($param),*>
        where
            S: $crate::Sequence<$elem>,
            $elem: Eq,
        {
        }

        impl<$($param),*> PartialOrd for $name<$($param),*>
        where
            S: $crate::Sequence<$elem>,
            $elem: PartialOrd,
        {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                self.as_slice().partial_cmp(other.as_slice())
            }
        }

        impl<$($param),*> Ord for $name<$($param),*>
        where
            S: $crate::Sequence<$elem>,
            $elem: Ord,
        {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.as_slice().cmp(other.as_slice())
            }
        }

        impl<$($param),*> std::hash::Hash for $name<$($param),*>
        where
            S: $crate::Sequence<$elem>,
            $elem: std::hash::Hash,
        {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.as_slice().hash(state);
            }
        }

        impl<$($param),*> Clone for $name<$($param),*>
        where
            S: Clone,
            C: Clone,
        {
            fn clone(&self) -> Self {
                $name {
                    engine: self.engine.clone(),
                }
            }
        }

        impl<$($param),*> Default for $name<$($param),*>
        where
            S: $crate::Sequence<$elem>,
            C: Default,
        {
            fn default() -> Self {
                $name::with_comparator(C::default())
            }
        }

        impl<$($param),*> IntoIterator for $name<$($param),*>
        where
            S: $crate::Sequence<$elem>,
        {
            type Item = $elem;
            type IntoIter = <S as IntoIterator>::IntoIter;

            fn into_iter(self) -> Self::IntoIter {
                self.into_base().into_iter()
            }
        }
    };
}

mod compare;
mod engine;
mod error;
mod map;
mod multimap;
mod multiset;
mod sequence;
#[cfg(feature = "serde")]
mod serde_impls;
mod set;
mod value_compare;

pub use crate::{
    compare::{Compare, Natural, Reversed},
    error::Error,
    map::{FlatMap, Iter, IterMut},
    multimap::FlatMultiMap,
    multiset::FlatMultiSet,
    sequence::Sequence,
    set::FlatSet,
    value_compare::ValueCompare,
};
