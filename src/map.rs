use crate::codec;
use crate::engine::Engine;
use crate::error::Result;
use crate::nodes::Node;
use std::cell::RefCell;
use std::io::{Read, Write};
use std::net::IpAddr;
use std::rc::Rc;

/// An IP-to-integer map, represented as a BDD whose terminals carry the
/// mapped value rather than a Boolean. Addresses never explicitly `set`
/// evaluate to `default_value`, mirroring `ip_map_t` from
/// `examples/original_source/include/ipset/ipset.h`: `map_bdd` starts as the
/// constant function `default_value`, and each `set`/`set_network` narrows
/// it via `ite` without disturbing any region it doesn't touch.
pub struct IpMap {
    engine: Rc<RefCell<Engine>>,
    map_bdd: usize,
    default_value: i64,
}

impl Clone for IpMap {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            map_bdd: self.map_bdd,
            default_value: self.default_value,
        }
    }
}

impl IpMap {
    /// A map where every address evaluates to `default_value`, backed by
    /// this thread's default engine (see `crate::set`'s `DEFAULT_ENGINE`).
    pub fn new(default_value: i64) -> Self {
        Self::with_engine(crate::set::default_engine(), default_value)
    }

    pub fn with_engine(engine: Rc<RefCell<Engine>>, default_value: i64) -> Self {
        let map_bdd = engine.borrow_mut().terminal(default_value);
        Self {
            engine,
            map_bdd,
            default_value,
        }
    }

    pub fn engine(&self) -> Rc<RefCell<Engine>> {
        self.engine.clone()
    }

    pub fn default_value(&self) -> i64 {
        self.default_value
    }

    /// `true` iff every address still evaluates to `default_value`.
    pub fn is_empty(&self) -> bool {
        let default_bdd = self.engine.borrow().terminal_id(self.default_value);
        default_bdd == Some(self.map_bdd)
    }

    pub fn equal(&self, other: &IpMap) -> bool {
        Rc::ptr_eq(&self.engine, &other.engine)
            && self.map_bdd == other.map_bdd
            && self.default_value == other.default_value
    }

    pub fn not_equal(&self, other: &IpMap) -> bool {
        !self.equal(other)
    }

    pub fn memory_size(&self) -> usize {
        self.engine.borrow().memory_size_estimate(self.map_bdd)
    }

    /// Maps a single host address to `value`.
    pub fn ip_set(&mut self, addr: IpAddr, value: i64) {
        self.ip_set_network(addr, codec::Family::of(&addr).width(), value);
    }

    pub fn ipv4_set(&mut self, addr: std::net::Ipv4Addr, value: i64) {
        self.ip_set(IpAddr::V4(addr), value);
    }

    pub fn ipv6_set(&mut self, addr: std::net::Ipv6Addr, value: i64) {
        self.ip_set(IpAddr::V6(addr), value);
    }

    /// Maps every address in `addr/prefix_len` to `value`, leaving every
    /// other address's value untouched. An invalid prefix (spec.md §7) is a
    /// no-op.
    pub fn ip_set_network(&mut self, addr: IpAddr, prefix_len: u32, value: i64) {
        let mut engine = self.engine.borrow_mut();
        let Some(characteristic) = codec::characteristic(&mut engine, addr, prefix_len) else {
            return;
        };
        let value_bdd = engine.terminal(value);
        self.map_bdd = engine.ite(characteristic, value_bdd, self.map_bdd);
    }

    pub fn ipv4_set_network(&mut self, addr: std::net::Ipv4Addr, prefix_len: u32, value: i64) {
        self.ip_set_network(IpAddr::V4(addr), prefix_len, value);
    }

    pub fn ipv6_set_network(&mut self, addr: std::net::Ipv6Addr, prefix_len: u32, value: i64) {
        self.ip_set_network(IpAddr::V6(addr), prefix_len, value);
    }

    /// The value `addr` currently maps to: `default_value` unless narrowed
    /// by an earlier `set`/`set_network` call that covers it.
    pub fn ip_get(&self, addr: IpAddr) -> i64 {
        let engine = self.engine.borrow();
        let family = codec::Family::of(&addr);
        let width = family.width();
        let mut node = engine.cofactor(self.map_bdd, 0, family.family_bit());
        for (var, bit) in codec::address_bits(addr).take(width as usize).enumerate() {
            node = engine.cofactor(node, var + 1, bit);
        }
        match engine.get_node(node) {
            Node::Terminal(_, v) => *v,
            Node::NonTerminal(_) => unreachable!("every variable was cofactored out"),
        }
    }

    pub fn ipv4_get(&self, addr: std::net::Ipv4Addr) -> i64 {
        self.ip_get(IpAddr::V4(addr))
    }

    pub fn ipv6_get(&self, addr: std::net::Ipv6Addr) -> i64 {
        self.ip_get(IpAddr::V6(addr))
    }

    pub fn save<W: Write>(&self, w: &mut W) -> Result<()> {
        crate::serialize::save(&self.engine.borrow(), self.map_bdd, w)
    }

    pub fn load<R: Read>(engine: Rc<RefCell<Engine>>, default_value: i64, r: &mut R) -> Result<IpMap> {
        let map_bdd = crate::serialize::load(&mut engine.borrow_mut(), r)?;
        Ok(IpMap {
            engine,
            map_bdd,
            default_value,
        })
    }

    pub fn save_dot<W: Write>(&self, w: &mut W) {
        use crate::dot::Dot;
        self.engine.borrow().dot(w, self.map_bdd);
    }
}
