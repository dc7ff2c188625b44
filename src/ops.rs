use crate::common::NodeId;
use crate::engine::Engine;

/// The commutative Boolean operators `apply` knows how to memoize. Mirrors
/// `bddcore::bdd_ops::Operation`, minus its `Not` variant: `not` is
/// implemented as `ite(a, FALSE, TRUE)` per spec.md §4.2 and therefore shares
/// the `ite` cache instead of needing its own operator tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    And,
    Or,
    Xor,
}

impl Engine {
    /// `apply(op, a, b)` from spec.md §4.2: recursive Shannon expansion over
    /// the minimum of the two operands' variables, canonicalizing commutative
    /// operand order before the memo lookup.
    pub fn apply(&mut self, op: Op, a: NodeId, b: NodeId) -> NodeId {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };

        if a == b {
            return match op {
                Op::And | Op::Or => a,
                Op::Xor => self.false_id(),
            };
        }
        if let Some(result) = self.bool_short_circuit(op, a, b) {
            return result;
        }

        let key = (op, a, b);
        if let Some(&id) = self.apply_cache.get(&key) {
            return id;
        }

        let result = if self.is_terminal(a) && self.is_terminal(b) {
            let va = self.value(a).unwrap() != 0;
            let vb = self.value(b).unwrap() != 0;
            let r = match op {
                Op::And => va && vb,
                Op::Or => va || vb,
                Op::Xor => va ^ vb,
            };
            self.bool_terminal(r)
        } else {
            let v = match (self.variable(a), self.variable(b)) {
                (Some(x), Some(y)) => x.min(y),
                (Some(x), None) => x,
                (None, Some(y)) => y,
                (None, None) => unreachable!("terminal/terminal case handled above"),
            };
            let lo = self.apply(op, self.cofactor(a, v, false), self.cofactor(b, v, false));
            let hi = self.apply(op, self.cofactor(a, v, true), self.cofactor(b, v, true));
            self.nonterminal(v, lo, hi)
        };

        self.apply_cache.insert(key, result);
        result
    }

    /// spec.md §4.2 edge cases: `AND(a, FALSE) = FALSE`, `OR(a, TRUE) = TRUE`,
    /// and their `b`-first mirrors. `a == a` and `XOR(a, a)` are handled by
    /// the caller before this is consulted.
    fn bool_short_circuit(&self, op: Op, a: NodeId, b: NodeId) -> Option<NodeId> {
        let bit = |id: NodeId| -> Option<bool> {
            if id == self.false_id() {
                Some(false)
            } else if id == self.true_id() {
                Some(true)
            } else {
                None
            }
        };
        let (fa, fb) = (bit(a), bit(b));
        match op {
            Op::And => {
                if fa == Some(false) || fb == Some(false) {
                    Some(self.false_id())
                } else if fa == Some(true) {
                    Some(b)
                } else if fb == Some(true) {
                    Some(a)
                } else {
                    None
                }
            }
            Op::Or => {
                if fa == Some(true) || fb == Some(true) {
                    Some(self.true_id())
                } else if fa == Some(false) {
                    Some(b)
                } else if fb == Some(false) {
                    Some(a)
                } else {
                    None
                }
            }
            Op::Xor => {
                if fa == Some(false) {
                    Some(b)
                } else if fb == Some(false) {
                    Some(a)
                } else {
                    None
                }
            }
        }
    }

    /// `ite(f, g, h)` from spec.md §4.2: `g` on paths where `f = 1`, else `h`.
    /// `g`/`h` may be arbitrary terminals (a map's values), not just Boolean
    /// ones; only `f` is required to resolve to a Boolean terminal on every
    /// path this recursion bottoms out on.
    pub fn ite(&mut self, f: NodeId, g: NodeId, h: NodeId) -> NodeId {
        if f == self.true_id() {
            return g;
        }
        if f == self.false_id() {
            return h;
        }
        if g == h {
            return g;
        }

        let key = (f, g, h);
        if let Some(&id) = self.ite_cache.get(&key) {
            return id;
        }

        let v = [self.variable(f), self.variable(g), self.variable(h)]
            .into_iter()
            .flatten()
            .min()
            .expect("ite: f is not a Boolean terminal and has no variable");

        let lo = self.ite(
            self.cofactor(f, v, false),
            self.cofactor(g, v, false),
            self.cofactor(h, v, false),
        );
        let hi = self.ite(
            self.cofactor(f, v, true),
            self.cofactor(g, v, true),
            self.cofactor(h, v, true),
        );
        let result = self.nonterminal(v, lo, hi);
        self.ite_cache.insert(key, result);
        result
    }

    /// `not(a)`, implemented as `ite(a, FALSE, TRUE)` exactly as spec.md §4.2
    /// prescribes.
    pub fn not(&mut self, f: NodeId) -> NodeId {
        let false_id = self.false_id();
        let true_id = self.true_id();
        self.ite(f, false_id, true_id)
    }

    pub fn and(&mut self, f: NodeId, g: NodeId) -> NodeId {
        self.apply(Op::And, f, g)
    }

    pub fn or(&mut self, f: NodeId, g: NodeId) -> NodeId {
        self.apply(Op::Or, f, g)
    }

    pub fn xor(&mut self, f: NodeId, g: NodeId) -> NodeId {
        self.apply(Op::Xor, f, g)
    }
}
