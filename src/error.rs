use thiserror::Error;

/// Errors surfaced by the recoverable parts of the engine: stream I/O and the
/// on-disk format (spec.md §7). Invariant violations inside the node cache
/// itself (a dangling `NodeId`, a malformed header) are programmer errors and
/// still panic, exactly as `bddcore`'s `get_node(&id).unwrap()` does
/// throughout `bdd_ops.rs` — there is no recovery story for a corrupted
/// in-memory cache.
#[derive(Debug, Error)]
pub enum IpSetError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad format: {0}")]
    BadFormat(String),
}

pub type Result<T> = std::result::Result<T, IpSetError>;
