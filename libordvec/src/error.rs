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

use std::collections::TryReserveError;

/// The things that can go wrong when growing or building a container.
///
/// Note that a comparator that panics is not reported here: the panic unwinds through whatever
/// operation was running. See the documentation of the bulk operations for what state the
/// container is left in.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The base sequence is a `Vec` and it could not allocate.
    #[error(transparent)]
    TryReserve(#[from] TryReserveError),
    /// The base sequence could not make room for this many more elements.
    #[error("Could not make room for {additional} more elements")]
    Capacity {
        /// The number of elements that we asked room for.
        additional: usize,
    },
    /// A sequence that was supposed to be sorted was not.
    ///
    /// `index` is the position of the first element that is out of order (or, for the unique
    /// containers, equivalent to its predecessor).
    #[error("The element at position {index} is out of order")]
    Unsorted {
        /// The position of the offending element.
        index: usize,
    },
}
