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

//! Comparators.
//!
//! The containers never use `Ord` directly. Instead they ask a comparator whether one thing is
//! less than another, which lets the same container type be ordered in different ways. The
//! comparator is expected to be a strict weak order: `less(a, a)` is always false, and "neither
//! is less than the other" is an equivalence relation. Two elements are considered the same
//! exactly when they are equivalent in this sense; `Eq` is never consulted.

use std::cmp::Ordering;

/// A strict weak order on `T`.
pub trait Compare<T: ?Sized> {
    /// Is `lhs` strictly less than `rhs`?
    fn less(&self, lhs: &T, rhs: &T) -> bool;

    /// Are `lhs` and `rhs` equivalent (neither is less than the other)?
    fn equivalent(&self, lhs: &T, rhs: &T) -> bool {
        !self.less(lhs, rhs) && !self.less(rhs, lhs)
    }

    /// Converts the answers of [`Compare::less`] into an `Ordering`.
    fn ordering(&self, lhs: &T, rhs: &T) -> Ordering {
        if self.less(lhs, rhs) {
            Ordering::Less
        } else if self.less(rhs, lhs) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// Orders things according to their `Ord` implementation. This is the default comparator.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    fn less(&self, lhs: &T, rhs: &T) -> bool {
        lhs < rhs
    }
}

/// Flips the order of another comparator.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Reversed<C>(pub C);

impl<T: ?Sized, C: Compare<T>> Compare<T> for Reversed<C> {
    fn less(&self, lhs: &T, rhs: &T) -> bool {
        self.0.less(rhs, lhs)
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn less(&self, lhs: &T, rhs: &T) -> bool {
        self(lhs, rhs)
    }
}
