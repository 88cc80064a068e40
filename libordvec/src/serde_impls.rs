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

//! `serde` support.
//!
//! Sets, multisets and multimaps are written as sequences of their elements (for multimaps,
//! of `(key, value)` pairs), and maps as maps. When reading, the input doesn't need to be
//! sorted: it is normalized just as in `from_base`.

use std::{fmt, marker::PhantomData};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
};

use crate::{Compare, FlatMap, FlatMultiMap, FlatMultiSet, FlatSet, Sequence};

// Don't trust the input's claims about its own size too far.
const MAX_PREALLOCATED: usize = 4096;

impl<T: Serialize, C, S: Sequence<T>> Serialize for FlatSet<T, C, S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T, C, S> Deserialize<'de> for FlatSet<T, C, S>
where
    C: Compare<T> + Default,
    S: Sequence<T> + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let seq = S::deserialize(deserializer)?;
        Ok(FlatSet::from_base_with(seq, C::default()))
    }
}

impl<T: Serialize, C, S: Sequence<T>> Serialize for FlatMultiSet<T, C, S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T, C, S> Deserialize<'de> for FlatMultiSet<T, C, S>
where
    C: Compare<T> + Default,
    S: Sequence<T> + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let seq = S::deserialize(deserializer)?;
        Ok(FlatMultiSet::from_base_with(seq, C::default()))
    }
}

impl<K, V, C, S> Serialize for FlatMap<K, V, C, S>
where
    K: Serialize,
    V: Serialize,
    S: Sequence<(K, V)>,
{
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_map(self.iter())
    }
}

struct FlatMapVisitor<K, V, C, S> {
    marker: PhantomData<fn() -> FlatMap<K, V, C, S>>,
}

impl<'de, K, V, C, S> Visitor<'de> for FlatMapVisitor<K, V, C, S>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Compare<K> + Default,
    S: Sequence<(K, V)>,
{
    type Value = FlatMap<K, V, C, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let capacity = access.size_hint().unwrap_or(0).min(MAX_PREALLOCATED);
        let mut seq = S::with_capacity(capacity);
        while let Some(entry) = access.next_entry()? {
            seq.push(entry);
        }
        // Where a key is repeated, the first entry wins.
        Ok(FlatMap::from_base_with(seq, C::default()))
    }
}

impl<'de, K, V, C, S> Deserialize<'de> for FlatMap<K, V, C, S>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Compare<K> + Default,
    S: Sequence<(K, V)>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FlatMapVisitor {
            marker: PhantomData,
        })
    }
}

impl<K, V, C, S> Serialize for FlatMultiMap<K, V, C, S>
where
    K: Serialize,
    V: Serialize,
    S: Sequence<(K, V)>,
{
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(self.as_slice())
    }
}

impl<'de, K, V, C, S> Deserialize<'de> for FlatMultiMap<K, V, C, S>
where
    C: Compare<K> + Default,
    S: Sequence<(K, V)> + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let seq = S::deserialize(deserializer)?;
        Ok(FlatMultiMap::from_base_with(seq, C::default()))
    }
}
