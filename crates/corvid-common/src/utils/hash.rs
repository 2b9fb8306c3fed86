//! Fast, non-cryptographic hashing aliases used throughout the store and
//! adjacency index. Node/edge ids and label ids are already well-distributed
//! integers, so `ahash`'s speed is preferred over `std`'s DoS-resistant
//! (and much slower) default hasher.

use std::collections::{HashMap, HashSet};

/// A [`HashMap`] keyed with [`ahash`]'s hasher.
pub type FxHashMap<K, V> = HashMap<K, V, ahash::RandomState>;

/// A [`HashSet`] keyed with [`ahash`]'s hasher.
pub type FxHashSet<T> = HashSet<T, ahash::RandomState>;
