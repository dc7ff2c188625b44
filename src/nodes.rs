use crate::common::{HeaderId, Level, NodeId};

/// Metadata for one of the 129 pre-registered variables (the family bit at
/// level 0, plus address-bit positions 1..=128). Mirrors
/// `okamumu_rust_dd::bddcore::nodes::NodeHeader`, but header id and level
/// always coincide here: the IP encoding fixes the variable order, so there
/// is no need for the teacher's separate header/level indirection.
#[derive(Debug)]
pub struct NodeHeader {
    id: HeaderId,
    level: Level,
    label: String,
}

impl NodeHeader {
    pub fn new(id: HeaderId, label: String) -> Self {
        Self {
            id,
            level: id,
            label,
        }
    }

    #[inline]
    pub fn id(&self) -> HeaderId {
        self.id
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// A nonterminal node: a test of `header`'s variable, with `low`/`high`
/// children selected by the bit being 0/1 respectively.
#[derive(Debug)]
pub struct NonTerminal {
    id: NodeId,
    header: HeaderId,
    low: NodeId,
    high: NodeId,
}

impl NonTerminal {
    pub fn new(id: NodeId, header: HeaderId, low: NodeId, high: NodeId) -> Self {
        Self {
            id,
            header,
            low,
            high,
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn header(&self) -> HeaderId {
        self.header
    }

    #[inline]
    pub fn low(&self) -> NodeId {
        self.low
    }

    #[inline]
    pub fn high(&self) -> NodeId {
        self.high
    }

    #[inline]
    pub fn child(&self, bit: bool) -> NodeId {
        if bit {
            self.high
        } else {
            self.low
        }
    }
}

/// Either a terminal carrying an arbitrary integer value, or a nonterminal
/// variable test. Generalizes `bddcore::nodes::Node`'s fixed
/// `{Zero, One, Undet}` terminal set to arbitrary map values.
#[derive(Debug)]
pub enum Node {
    Terminal(NodeId, i64),
    NonTerminal(NonTerminal),
}

impl Node {
    #[inline]
    pub fn id(&self) -> NodeId {
        match self {
            Node::Terminal(id, _) => *id,
            Node::NonTerminal(n) => n.id(),
        }
    }

    #[inline]
    pub fn header(&self) -> Option<HeaderId> {
        match self {
            Node::Terminal(..) => None,
            Node::NonTerminal(n) => Some(n.header()),
        }
    }

    #[inline]
    pub fn value(&self) -> Option<i64> {
        match self {
            Node::Terminal(_, v) => Some(*v),
            Node::NonTerminal(_) => None,
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Node::Terminal(..))
    }
}
