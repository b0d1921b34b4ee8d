//! Rank type and the two rank transitions a hollow heap performs.
//!
//! A node's rank only changes in two places:
//!
//! - a ranked link during delete-min consolidation joins two nodes of equal
//!   rank `r` and gives the winner rank `r + 1` ([`checked_increment`]);
//! - decrease-key gives the replacement node rank `max(0, r - 2)` where `r` is
//!   the rank of the node it replaces ([`demote`]).
//!
//! # Why u8?
//!
//! A node of rank `r` has at least `φ^r` descendants (φ the golden ratio), so
//! ranks stay below `1.45 · log₂(n)` for `n` nodes. Even a heap with `2⁶⁴`
//! nodes keeps ranks under 93, so `u8` leaves ample headroom while keeping
//! nodes small.

/// Type alias for node rank.
pub type Rank = u8;

/// Maximum valid rank value.
pub const MAX_RANK: Rank = u8::MAX;

/// How much rank a decrease-key replacement node gives up.
pub const DEMOTION: Rank = 2;

/// Safely increment a rank value, panicking on overflow.
///
/// # Panics
///
/// Panics if `rank == MAX_RANK`. This cannot happen for any heap that fits
/// in memory and would indicate a bug in consolidation.
///
/// # Example
///
/// ```rust
/// use hollow_heap::rank::{checked_increment, Rank};
///
/// let rank: Rank = 5;
/// assert_eq!(checked_increment(rank), 6);
/// ```
#[inline]
pub fn checked_increment(rank: Rank) -> Rank {
    rank.checked_add(1).expect(
        "rank overflow: ranks are logarithmic in the number of nodes, \
         u8::MAX cannot be reached by a well-formed heap",
    )
}

/// Rank of the node created by decrease-key to replace a node of `rank`.
///
/// # Example
///
/// ```rust
/// use hollow_heap::rank::demote;
///
/// assert_eq!(demote(5), 3);
/// assert_eq!(demote(1), 0);
/// ```
#[inline]
pub fn demote(rank: Rank) -> Rank {
    rank.saturating_sub(DEMOTION)
}
