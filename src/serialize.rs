use crate::common::{BddHashMap, BddHashSet, NodeId};
use crate::engine::Engine;
use crate::error::{IpSetError, Result};
use crate::nodes::Node;
use std::io::{Read, Write};

const MAGIC: &[u8; 8] = b"IP set\0\0";
const VERSION: u16 = 1;

/// Writes the sub-DAG reachable from `root` in the format spec.md §4.6
/// defines: an 8-byte magic, a 16-bit version, a 64-bit reachable node count,
/// a 64-bit root ordinal, then one tagged record per node in reverse
/// topological order (children before parents).
pub fn save<W: Write>(engine: &Engine, root: NodeId, w: &mut W) -> Result<()> {
    let mut order = Vec::new();
    let mut visited = BddHashSet::default();
    post_order(engine, root, &mut visited, &mut order);

    let ordinal: BddHashMap<NodeId, u64> = order
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, i as u64))
        .collect();

    w.write_all(MAGIC)?;
    w.write_all(&VERSION.to_be_bytes())?;
    w.write_all(&(order.len() as u64).to_be_bytes())?;
    w.write_all(&ordinal[&root].to_be_bytes())?;

    for &id in &order {
        match engine.get_node(id) {
            Node::Terminal(_, value) => {
                w.write_all(&[0u8])?;
                w.write_all(&(*value as i32).to_be_bytes())?;
            }
            Node::NonTerminal(n) => {
                w.write_all(&[1u8])?;
                w.write_all(&(n.header() as u16).to_be_bytes())?;
                w.write_all(&ordinal[&n.low()].to_be_bytes())?;
                w.write_all(&ordinal[&n.high()].to_be_bytes())?;
            }
        }
    }
    Ok(())
}

fn post_order(engine: &Engine, id: NodeId, visited: &mut BddHashSet<NodeId>, order: &mut Vec<NodeId>) {
    if !visited.insert(id) {
        return;
    }
    if let Node::NonTerminal(n) = engine.get_node(id) {
        post_order(engine, n.low(), visited, order);
        post_order(engine, n.high(), visited, order);
    }
    order.push(id);
}

/// Reads a stream written by [`save`], installing every node into `engine`
/// via `terminal`/`nonterminal` so the result is canonicalized against
/// whatever `engine` already contains (spec.md §4.6: "two BDDs serialized
/// from distinct caches and loaded into a third compare equal iff they are
/// semantically equal").
pub fn load<R: Read>(engine: &mut Engine, r: &mut R) -> Result<NodeId> {
    let mut magic = [0u8; 8];
    r.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(IpSetError::BadFormat("bad magic bytes".into()));
    }

    let mut version_buf = [0u8; 2];
    r.read_exact(&mut version_buf)?;
    let version = u16::from_be_bytes(version_buf);
    if version != VERSION {
        return Err(IpSetError::BadFormat(format!(
            "unsupported version {version}"
        )));
    }

    let mut count_buf = [0u8; 8];
    r.read_exact(&mut count_buf)?;
    let count = u64::from_be_bytes(count_buf) as usize;

    let mut root_buf = [0u8; 8];
    r.read_exact(&mut root_buf)?;
    let root_ordinal = u64::from_be_bytes(root_buf) as usize;
    if root_ordinal >= count {
        return Err(IpSetError::BadFormat("root ordinal out of range".into()));
    }

    let mut installed: Vec<NodeId> = Vec::with_capacity(count);
    for i in 0..count {
        let mut tag = [0u8; 1];
        r.read_exact(&mut tag)?;
        let id = match tag[0] {
            0 => {
                let mut value_buf = [0u8; 4];
                r.read_exact(&mut value_buf)?;
                let value = i32::from_be_bytes(value_buf) as i64;
                engine.terminal(value)
            }
            1 => {
                let mut var_buf = [0u8; 2];
                r.read_exact(&mut var_buf)?;
                let var = u16::from_be_bytes(var_buf) as usize;
                if var > crate::common::MAX_VAR {
                    return Err(IpSetError::BadFormat(format!("variable {var} out of range")));
                }

                let mut low_buf = [0u8; 8];
                r.read_exact(&mut low_buf)?;
                let low_ordinal = u64::from_be_bytes(low_buf) as usize;

                let mut high_buf = [0u8; 8];
                r.read_exact(&mut high_buf)?;
                let high_ordinal = u64::from_be_bytes(high_buf) as usize;

                if low_ordinal >= i || high_ordinal >= i {
                    return Err(IpSetError::BadFormat(
                        "child ordinal references a node not yet defined".into(),
                    ));
                }
                engine.nonterminal(var, installed[low_ordinal], installed[high_ordinal])
            }
            other => {
                return Err(IpSetError::BadFormat(format!("unknown node tag {other}")));
            }
        };
        installed.push(id);
    }

    Ok(installed[root_ordinal])
}
