use crate::codec::{bits_to_addr, Family};
use crate::common::NodeId;
use crate::engine::Engine;
use crate::iter::{Assignment, Bit};
use std::collections::VecDeque;
use std::fmt;
use std::net::IpAddr;

/// A single CIDR network (or, in host-expansion mode, a single `/width`
/// host).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Network {
    pub addr: IpAddr,
    pub prefix_len: u32,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

/// What one family's projection of an assignment turned into: either a
/// single maximal-prefix network (cheap, always exactly one item), or a
/// host expansion that must be driven one address at a time (spec.md §4.4:
/// "a lazy, finite sequence" — a don't-care run can cover up to 2^128
/// addresses, so nothing here may materialize them up front).
enum PendingExpansion {
    Single(Network),
    Hosts(HostExpansion),
}

/// Walks every host address a partial bit assignment covers, one at a time,
/// by treating the don't-care positions as a binary counter instead of
/// building the Cartesian product of all of them up front.
struct HostExpansion {
    bits: Vec<Bit>,
    dontcare_positions: Vec<usize>,
    counter: Vec<bool>,
    family: Family,
    exhausted: bool,
}

impl HostExpansion {
    fn new(bits: Vec<Bit>, family: Family) -> Self {
        let dontcare_positions: Vec<usize> = bits
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == Bit::DontCare)
            .map(|(i, _)| i)
            .collect();
        let counter = vec![false; dontcare_positions.len()];
        Self {
            bits,
            dontcare_positions,
            counter,
            family,
            exhausted: false,
        }
    }
}

impl Iterator for HostExpansion {
    type Item = Network;

    fn next(&mut self) -> Option<Network> {
        if self.exhausted {
            return None;
        }

        let mut resolved: Vec<bool> = self.bits.iter().map(|b| matches!(b, Bit::One)).collect();
        for (slot, &position) in self.dontcare_positions.iter().enumerate() {
            resolved[position] = self.counter[slot];
        }

        // Binary-increment the don't-care counter so the next call produces
        // the next host; a carry out of the top bit means every combination
        // has been emitted.
        let mut carry = true;
        for bit in self.counter.iter_mut() {
            if !carry {
                break;
            }
            if *bit {
                *bit = false;
            } else {
                *bit = true;
                carry = false;
            }
        }
        if carry {
            self.exhausted = true;
        }

        Some(Network {
            addr: bits_to_addr(&resolved, self.family),
            prefix_len: self.family.width(),
        })
    }
}

/// Drives [`crate::iter::AssignmentIter`] and, per assignment, expands it
/// into the CIDR networks (or, unsummarized, the host addresses) it covers.
/// Every assignment is gathered eagerly at construction time (see `new`), so
/// unlike the engine's other views this iterator does not borrow it at all;
/// the expansion of any single assignment into hosts, which is the part that
/// can be unbounded, stays lazy via [`HostExpansion`].
pub struct NetworkIter {
    assignments: std::vec::IntoIter<(Assignment, i64)>,
    summarize: bool,
    pending: VecDeque<PendingExpansion>,
    current_hosts: Option<HostExpansion>,
    finished: bool,
}

impl NetworkIter {
    pub(crate) fn new(
        engine: &Engine,
        root: NodeId,
        desired: bool,
        summarize: bool,
    ) -> Self {
        let want = if desired { 1 } else { 0 };
        let assignments = engine
            .assignments(root, move |value| (value != 0) as i64 == want)
            .collect::<Vec<_>>()
            .into_iter();
        Self {
            assignments,
            summarize,
            pending: VecDeque::new(),
            current_hosts: None,
            finished: false,
        }
    }

    /// `true` once there are no more accepting leaves and no pending
    /// expansion remains (spec.md §4.5's "finished" flag).
    pub fn finished(&self) -> bool {
        self.finished && self.pending.is_empty() && self.current_hosts.is_none()
    }
}

impl Iterator for NetworkIter {
    type Item = Network;

    fn next(&mut self) -> Option<Network> {
        loop {
            if let Some(hosts) = self.current_hosts.as_mut() {
                match hosts.next() {
                    Some(network) => return Some(network),
                    None => self.current_hosts = None,
                }
                continue;
            }

            match self.pending.pop_front() {
                Some(PendingExpansion::Single(network)) => return Some(network),
                Some(PendingExpansion::Hosts(hosts)) => {
                    self.current_hosts = Some(hosts);
                    continue;
                }
                None => {}
            }

            match self.assignments.next() {
                None => {
                    self.finished = true;
                    return None;
                }
                // A mixed-family assignment (the family variable itself is a
                // don't-care) projects to both families; each projection is
                // cheap to compute up front (it's at most one `Single` or one
                // lazy `Hosts` generator), so both go on the queue directly
                // rather than needing a separate "still owe the other family"
                // state to defer the second one.
                Some((assignment, _value)) => match assignment[0] {
                    Bit::One => self
                        .pending
                        .push_back(project_networks(&assignment, Family::V4, self.summarize)),
                    Bit::Zero => self
                        .pending
                        .push_back(project_networks(&assignment, Family::V6, self.summarize)),
                    Bit::DontCare => {
                        self.pending
                            .push_back(project_networks(&assignment, Family::V4, self.summarize));
                        self.pending
                            .push_back(project_networks(&assignment, Family::V6, self.summarize));
                    }
                },
            }
        }
    }
}

fn project_networks(assignment: &Assignment, family: Family, summarize: bool) -> PendingExpansion {
    let width = family.width() as usize;
    let bits: Vec<Bit> = assignment[1..=width].to_vec();

    if !summarize {
        return PendingExpansion::Hosts(HostExpansion::new(bits, family));
    }

    let n = bits.iter().take_while(|b| **b != Bit::DontCare).count();
    let holes_past_n = bits[n..].iter().any(|b| *b != Bit::DontCare);

    if holes_past_n {
        // spec.md §4.5: "the caller may drop to a non-summarizing mode that
        // emits all host addresses one by one" when an assignment can't be
        // described by a single maximal prefix.
        return PendingExpansion::Hosts(HostExpansion::new(bits, family));
    }

    let resolved: Vec<bool> = bits.iter().map(|b| matches!(b, Bit::One)).collect();
    PendingExpansion::Single(Network {
        addr: bits_to_addr(&resolved, family),
        prefix_len: n as u32,
    })
}
