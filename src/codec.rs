use crate::common::{HeaderId, NodeId};
use crate::engine::Engine;
use std::net::IpAddr;

/// Which address family a header/assignment belongs to (spec.md §3: "variable
/// 0 is the family bit, 1 = IPv4, 0 = IPv6").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    pub fn of(addr: &IpAddr) -> Family {
        match addr {
            IpAddr::V4(_) => Family::V4,
            IpAddr::V6(_) => Family::V6,
        }
    }

    #[inline]
    pub fn width(self) -> u32 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }

    /// The value variable 0 carries for this family.
    #[inline]
    pub fn family_bit(self) -> bool {
        matches!(self, Family::V4)
    }
}

/// Ordered `(variable, bit)` literals encoding `addr/prefix_len` (spec.md
/// §4.3). `None` when `prefix_len` is 0 or exceeds the family width — §7's
/// `InvalidPrefix`, which callers must treat as a no-op rather than a panic.
pub fn encode(addr: IpAddr, prefix_len: u32) -> Option<Vec<(HeaderId, bool)>> {
    let family = Family::of(&addr);
    let width = family.width();
    if prefix_len == 0 || prefix_len > width {
        return None;
    }
    let mut literals = Vec::with_capacity(1 + prefix_len as usize);
    literals.push((0, family.family_bit()));
    for (i, bit) in address_bits(addr).take(prefix_len as usize).enumerate() {
        literals.push((i + 1, bit));
    }
    Some(literals)
}

/// MSB-first bit sequence of an address's bytes.
pub fn address_bits(addr: IpAddr) -> impl Iterator<Item = bool> {
    let bytes: Vec<u8> = match addr {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    };
    (0..bytes.len() * 8).map(move |i| (bytes[i / 8] >> (7 - i % 8)) & 1 == 1)
}

/// Builds the characteristic function of the single variable assignment
/// `encode(addr, prefix_len)` describes: the conjunction of its literals,
/// `true` below the last specified variable (every address sharing the
/// leading `prefix_len` bits with `addr`). `None` on an invalid prefix.
pub fn characteristic(engine: &mut Engine, addr: IpAddr, prefix_len: u32) -> Option<NodeId> {
    let literals = encode(addr, prefix_len)?;
    let mut node = engine.true_id();
    for &(var, bit) in literals.iter().rev() {
        let false_id = engine.false_id();
        node = if bit {
            engine.nonterminal(var, false_id, node)
        } else {
            engine.nonterminal(var, node, false_id)
        };
    }
    Some(node)
}

/// MSB-first bits to an address of the given family. Any index past
/// `family.width()` in `bits` is ignored.
pub fn bits_to_addr(bits: &[bool], family: Family) -> IpAddr {
    let width = family.width() as usize;
    let mut bytes = vec![0u8; width / 8];
    for (i, &bit) in bits.iter().take(width).enumerate() {
        if bit {
            bytes[i / 8] |= 1 << (7 - i % 8);
        }
    }
    match family {
        Family::V4 => {
            let arr: [u8; 4] = bytes.try_into().unwrap();
            IpAddr::from(arr)
        }
        Family::V6 => {
            let arr: [u8; 16] = bytes.try_into().unwrap();
            IpAddr::from(arr)
        }
    }
}
