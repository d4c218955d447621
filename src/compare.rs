/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Entry ordering.
//!
//! Trees are ordered by a zero-sized comparator type implementing
//! [`TreeCompare`], a strict weak ordering over entries. Two entries compare
//! equal exactly when neither is less than the other. Lookups go through
//! [`LookupCompare`] so that `find`/`upper_bound` can take a query type
//! distinct from the entry type (typically the bare key).

/// Strict weak ordering over stored entries.
pub trait TreeCompare<T> {
    /// Whether `a` orders strictly before `b`.
    fn less(a: &T, b: &T) -> bool;

    /// Whether `a` and `b` occupy the same position in the ordering.
    fn equal(a: &T, b: &T) -> bool {
        !Self::less(a, b) && !Self::less(b, a)
    }
}

/// Heterogeneous comparison between a query value and stored entries, for
/// `find` and `upper_bound`.
pub trait LookupCompare<T, Q: ?Sized>: TreeCompare<T> {
    /// Whether the query orders strictly before the entry.
    fn query_less(query: &Q, entry: &T) -> bool;
    /// Whether the entry orders strictly before the query.
    fn entry_less(entry: &T, query: &Q) -> bool;
}

/// An entry with an intrinsic lookup key.
///
/// This is what the stock [`KeyCompare`] comparator orders by; entries with
/// derived or composite orderings supply their own [`TreeCompare`] instead.
pub trait KeyedEntry {
    /// The key type.
    type Key: Ord;

    /// Borrow the entry's key.
    fn key(&self) -> &Self::Key;
}

/// The stock comparator: orders entries by their [`KeyedEntry::key`] under
/// `Ord`, and looks entries up by bare key.
#[derive(Debug)]
pub struct KeyCompare;

impl<T: KeyedEntry> TreeCompare<T> for KeyCompare {
    fn less(a: &T, b: &T) -> bool {
        a.key() < b.key()
    }
}

impl<T: KeyedEntry> LookupCompare<T, T::Key> for KeyCompare {
    fn query_less(query: &T::Key, entry: &T) -> bool {
        query < entry.key()
    }

    fn entry_less(entry: &T, query: &T::Key) -> bool {
        entry.key() < query
    }
}
