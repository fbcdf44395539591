// File: ./src/model/identity.rs
//! Identity resolution between parent items and their occurrences.

use crate::model::Occurrence;

/// Two occurrences target the same pending edit when their identity hashes
/// are equal, or the tracked item's parent is the queried item, or the
/// tracked item is the queried item's parent.
///
/// An edit dialog may have been opened on a parent item while the caller now
/// holds one of its occurrences, or the other way around, so both directions
/// of the parent comparison are checked. The three-way form also guards
/// against identity hashes generated inconsistently elsewhere; it is
/// deliberate and must not be collapsed into a symmetric shortcut.
pub fn identity_overlaps(tracked: &Occurrence, queried: &Occurrence) -> bool {
    tracked.hash_id() == queried.hash_id()
        || tracked.parent_hash_id() == queried.hash_id()
        || tracked.hash_id() == queried.parent_hash_id()
}
