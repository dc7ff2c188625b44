use std::hash::BuildHasherDefault;
use wyhash::WyHash;

/// Opaque handle into an [`Engine`](crate::engine::Engine)'s node table. Two ids
/// compare equal iff they denote structurally identical sub-diagrams.
pub type NodeId = usize;

/// Identifies one of the pre-registered variable headers (family bit plus
/// address-bit positions).
pub type HeaderId = usize;

/// A variable's position in the fixed root-to-leaf ordering.
pub type Level = usize;

pub type BddHashMap<T, U> = std::collections::HashMap<T, U, BuildHasherDefault<WyHash>>;
pub type BddHashSet<T> = std::collections::HashSet<T, BuildHasherDefault<WyHash>>;
// pub type BddHashMap<T, U> = hashbrown::HashMap<T, U, BuildHasherDefault<WyHash>>;
// pub type BddHashSet<T> = hashbrown::HashSet<T, BuildHasherDefault<WyHash>>;

/// Family discriminator tested at variable 0.
pub const FAMILY_VAR: HeaderId = 0;
/// Highest variable index used by an IPv6 address (1..=128).
pub const MAX_VAR: HeaderId = 128;
