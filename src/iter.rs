use crate::common::{HeaderId, NodeId, MAX_VAR};
use crate::engine::Engine;
use crate::nodes::Node;

/// One variable's value in an [`Assignment`]: tested and fixed, or never
/// tested on the accepting path (spec.md §4.4's "don't care").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bit {
    Zero,
    One,
    DontCare,
}

/// `variable -> {0, 1, don't care}`, indexed by [`HeaderId`] (`0..=128`).
pub type Assignment = Vec<Bit>;

pub fn empty_assignment() -> Assignment {
    vec![Bit::DontCare; MAX_VAR + 1]
}

/// A finite, restartable sequence of `(assignment, terminal value)` pairs:
/// every accepting leaf of a depth-first, low-before-high walk whose terminal
/// satisfies `accept` (spec.md §4.4).
pub struct AssignmentIter {
    items: std::vec::IntoIter<(Assignment, i64)>,
}

impl Iterator for AssignmentIter {
    type Item = (Assignment, i64);

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next()
    }
}

impl Engine {
    /// Depth-first traversal of `root`, tracking the current
    /// `variable -> bit` stack; variables strictly between the previous
    /// tested variable and the next nonterminal's are left as don't-care by
    /// never being written to, exactly as spec.md §4.4 describes.
    pub fn assignments(&self, root: NodeId, accept: impl Fn(i64) -> bool) -> AssignmentIter {
        let mut out = Vec::new();
        let mut path = empty_assignment();
        self.walk(root, &mut path, &mut out, &accept);
        AssignmentIter {
            items: out.into_iter(),
        }
    }

    fn walk(
        &self,
        id: NodeId,
        path: &mut Assignment,
        out: &mut Vec<(Assignment, i64)>,
        accept: &impl Fn(i64) -> bool,
    ) {
        match self.get_node(id) {
            Node::Terminal(_, value) => {
                if accept(*value) {
                    out.push((path.clone(), *value));
                }
            }
            Node::NonTerminal(n) => {
                let var: HeaderId = n.header();
                let (low, high) = (n.low(), n.high());
                path[var] = Bit::Zero;
                self.walk(low, path, out, accept);
                path[var] = Bit::One;
                self.walk(high, path, out, accept);
                path[var] = Bit::DontCare;
            }
        }
    }
}
