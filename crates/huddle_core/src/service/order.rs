//! Presentation order randomization.
//!
//! # Invariants
//! - The produced order is a permutation of exactly the given member ids.
//! - Shuffling is an unbiased Fisher-Yates pass, never a random-comparator sort.

use crate::model::member::{Member, MemberId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Returns the members' ids in uniformly random order.
pub fn shuffled_order<R: Rng + ?Sized>(members: &[Member], rng: &mut R) -> Vec<MemberId> {
    let mut ids: Vec<MemberId> = members.iter().map(|member| member.id).collect();
    ids.shuffle(rng);
    ids
}

/// Checks that `order` holds each roster id exactly once.
pub fn is_permutation_of(order: &[MemberId], members: &[Member]) -> bool {
    if order.len() != members.len() {
        return false;
    }
    let expected: HashSet<MemberId> = members.iter().map(|member| member.id).collect();
    let mut seen = HashSet::with_capacity(order.len());
    order
        .iter()
        .all(|id| expected.contains(id) && seen.insert(*id))
}
