use crate::common::{BddHashMap, BddHashSet, HeaderId, Level, NodeId, MAX_VAR};
use crate::nodes::{Node, NodeHeader, NonTerminal};
use crate::ops::Op;

/// The reduced ordered binary decision diagram engine: a hash-consed node
/// table plus a memoized apply/ite cache, generalized from
/// `okamumu_rust_dd::bddcore::bdd::BddManager` to carry arbitrary integer
/// terminals (needed for IP-map values) instead of a fixed `{Zero, One,
/// Undet}` terminal set.
///
/// An `Engine` owns every node any [`crate::set::IpSet`] or
/// [`crate::map::IpMap`] built from it references; those types hold a
/// `NodeId` into this table, which is why they are cheap to clone and why
/// equality between them is the `NodeId` comparison spec.md's canonicalization
/// invariant promises is O(1).
pub struct Engine {
    headers: Vec<NodeHeader>,
    nodes: Vec<Node>,
    terminals: BddHashMap<i64, NodeId>,
    utable: BddHashMap<(HeaderId, NodeId, NodeId), NodeId>,
    pub(crate) apply_cache: BddHashMap<(Op, NodeId, NodeId), NodeId>,
    pub(crate) ite_cache: BddHashMap<(NodeId, NodeId, NodeId), NodeId>,
    false_id: NodeId,
    true_id: NodeId,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        let mut headers = Vec::with_capacity(MAX_VAR + 1);
        headers.push(NodeHeader::new(0, "family".to_string()));
        for v in 1..=MAX_VAR {
            headers.push(NodeHeader::new(v, format!("b{v}")));
        }

        let mut nodes = Vec::new();
        let mut terminals = BddHashMap::default();
        let false_id = Self::install_terminal(&mut nodes, &mut terminals, 0);
        let true_id = Self::install_terminal(&mut nodes, &mut terminals, 1);

        Self {
            headers,
            nodes,
            terminals,
            utable: BddHashMap::default(),
            apply_cache: BddHashMap::default(),
            ite_cache: BddHashMap::default(),
            false_id,
            true_id,
        }
    }

    fn install_terminal(
        nodes: &mut Vec<Node>,
        terminals: &mut BddHashMap<i64, NodeId>,
        value: i64,
    ) -> NodeId {
        let id = nodes.len();
        nodes.push(Node::Terminal(id, value));
        terminals.insert(value, id);
        id
    }

    /// Canonical id for the terminal holding `value`, installing a new one if
    /// this is the first time it has been seen.
    pub fn terminal(&mut self, value: i64) -> NodeId {
        if let Some(&id) = self.terminals.get(&value) {
            return id;
        }
        Self::install_terminal(&mut self.nodes, &mut self.terminals, value)
    }

    /// Looks up the terminal for `value` without installing one, so a caller
    /// can compare against it without mutating the node table.
    pub fn terminal_id(&self, value: i64) -> Option<NodeId> {
        self.terminals.get(&value).copied()
    }

    /// Canonical id for the Boolean terminal `false`/`true`.
    #[inline]
    pub fn false_id(&self) -> NodeId {
        self.false_id
    }

    #[inline]
    pub fn true_id(&self) -> NodeId {
        self.true_id
    }

    pub fn bool_terminal(&self, value: bool) -> NodeId {
        if value {
            self.true_id
        } else {
            self.false_id
        }
    }

    /// Returns `low` directly when `low == high` (reduction, spec.md invariant
    /// 2); otherwise the existing id for `(var, low, high)`, or installs a new
    /// node (spec.md invariant 1: uniqueness).
    pub fn nonterminal(&mut self, var: HeaderId, low: NodeId, high: NodeId) -> NodeId {
        if low == high {
            return low;
        }
        let key = (var, low, high);
        if let Some(&id) = self.utable.get(&key) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes
            .push(Node::NonTerminal(NonTerminal::new(id, var, low, high)));
        self.utable.insert(key, id);
        id
    }

    #[inline]
    pub fn get_node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub fn is_terminal(&self, id: NodeId) -> bool {
        self.get_node(id).is_terminal()
    }

    #[inline]
    pub fn value(&self, id: NodeId) -> Option<i64> {
        self.get_node(id).value()
    }

    #[inline]
    pub fn variable(&self, id: NodeId) -> Option<HeaderId> {
        self.get_node(id).header()
    }

    pub fn level(&self, id: NodeId) -> Option<Level> {
        self.variable(id).map(|h| self.headers[h].level())
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.variable(id).map(|h| self.headers[h].label())
    }

    pub fn low(&self, id: NodeId) -> Option<NodeId> {
        match self.get_node(id) {
            Node::NonTerminal(n) => Some(n.low()),
            Node::Terminal(..) => None,
        }
    }

    pub fn high(&self, id: NodeId) -> Option<NodeId> {
        match self.get_node(id) {
            Node::NonTerminal(n) => Some(n.high()),
            Node::Terminal(..) => None,
        }
    }

    /// Fixes variable `var` to `bit` in `id`: returns the selected child if
    /// `id` tests `var` at this node, else `id` unchanged (spec.md §4.2's
    /// `cofactor(x, v, bit)`).
    pub(crate) fn cofactor(&self, id: NodeId, var: HeaderId, bit: bool) -> NodeId {
        match self.get_node(id) {
            Node::NonTerminal(n) if n.header() == var => n.child(bit),
            _ => id,
        }
    }

    /// Number of distinct nodes reachable from `id`, counting each node once
    /// (spec.md §4.1's `reachable_node_count`).
    pub fn reachable_node_count(&self, id: NodeId) -> usize {
        let mut visited = BddHashSet::default();
        self.mark_reachable(id, &mut visited);
        visited.len()
    }

    fn mark_reachable(&self, id: NodeId, visited: &mut BddHashSet<NodeId>) {
        if !visited.insert(id) {
            return;
        }
        if let Node::NonTerminal(n) = self.get_node(id) {
            self.mark_reachable(n.low(), visited);
            self.mark_reachable(n.high(), visited);
        }
    }

    /// Best-effort byte estimate: node count times a fixed per-node footprint.
    /// spec.md §9 explicitly asks for this instead of a raw pointer-width-
    /// dependent count, since the source's `ipset_memory_size` is not
    /// reproducible across allocator/pointer-width choices.
    pub fn memory_size_estimate(&self, id: NodeId) -> usize {
        const BYTES_PER_NODE: usize = std::mem::size_of::<usize>() * 4;
        self.reachable_node_count(id) * BYTES_PER_NODE
    }

    /// Total nodes and cache entries currently live in this engine, mirroring
    /// `BddManager::size`.
    pub fn size(&self) -> (usize, usize, usize) {
        (self.headers.len(), self.nodes.len(), self.apply_cache.len())
    }

    /// Drops the apply/ite memo tables. The node table (and therefore every
    /// live `NodeId`) is left untouched: spec.md §9 notes the apply cache is
    /// only valid against a fixed node cache, so this is the only cache an
    /// `Engine` can safely invalidate on its own without knowing which roots
    /// are still referenced by a live `IpSet`/`IpMap`.
    pub fn clear_apply_cache(&mut self) {
        self.apply_cache.clear();
        self.ite_cache.clear();
    }
}
