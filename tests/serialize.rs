use ipset_bdd::error::IpSetError;
use ipset_bdd::{Engine, IpSet};
use std::net::Ipv4Addr;

#[test]
fn load_rejects_bad_magic() {
    let mut set = IpSet::new();
    set.ipv4_add_network(Ipv4Addr::new(10, 0, 0, 0), 8);
    let mut buf = Vec::new();
    set.save(&mut buf).unwrap();
    buf[0] = b'X';

    let engine = std::rc::Rc::new(std::cell::RefCell::new(Engine::new()));
    let err = IpSet::load(engine, &mut buf.as_slice()).unwrap_err();
    match err {
        IpSetError::BadFormat(msg) => assert!(msg.contains("magic"), "unexpected message: {msg}"),
        other => panic!("expected BadFormat, got {other:?}"),
    }
}

#[test]
fn load_rejects_unsupported_version() {
    let mut set = IpSet::new();
    set.ipv4_add_network(Ipv4Addr::new(10, 0, 0, 0), 8);
    let mut buf = Vec::new();
    set.save(&mut buf).unwrap();
    // version is the two bytes right after the 8-byte magic.
    buf[8] = 0;
    buf[9] = 99;

    let engine = std::rc::Rc::new(std::cell::RefCell::new(Engine::new()));
    let err = IpSet::load(engine, &mut buf.as_slice()).unwrap_err();
    match err {
        IpSetError::BadFormat(msg) => assert!(msg.contains("version"), "unexpected message: {msg}"),
        other => panic!("expected BadFormat, got {other:?}"),
    }
}

#[test]
fn load_rejects_root_ordinal_out_of_range() {
    // magic(8) + version(2) + count=1(8) + root_ordinal=5(8), then a single
    // terminal record (tag 0, value 0). root_ordinal 5 is out of range for a
    // one-node stream.
    let mut buf = Vec::new();
    buf.extend_from_slice(b"IP set\0\0");
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.extend_from_slice(&1u64.to_be_bytes());
    buf.extend_from_slice(&5u64.to_be_bytes());
    buf.push(0u8);
    buf.extend_from_slice(&0i32.to_be_bytes());

    let engine = std::rc::Rc::new(std::cell::RefCell::new(Engine::new()));
    let err = IpSet::load(engine, &mut buf.as_slice()).unwrap_err();
    match err {
        IpSetError::BadFormat(msg) => assert!(msg.contains("root ordinal"), "unexpected message: {msg}"),
        other => panic!("expected BadFormat, got {other:?}"),
    }
}

#[test]
fn load_rejects_a_child_ordinal_that_has_not_been_defined_yet() {
    // magic(8) + version(2) + count=1(8) + root_ordinal=0(8), then a single
    // nonterminal record (tag 1, var 0, low_ordinal=0, high_ordinal=0) whose
    // children point at itself rather than an earlier, already-installed
    // node — a corrupt topological order.
    let mut buf = Vec::new();
    buf.extend_from_slice(b"IP set\0\0");
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.extend_from_slice(&1u64.to_be_bytes());
    buf.extend_from_slice(&0u64.to_be_bytes());
    buf.push(1u8);
    buf.extend_from_slice(&0u16.to_be_bytes());
    buf.extend_from_slice(&0u64.to_be_bytes());
    buf.extend_from_slice(&0u64.to_be_bytes());

    let engine = std::rc::Rc::new(std::cell::RefCell::new(Engine::new()));
    let err = IpSet::load(engine, &mut buf.as_slice()).unwrap_err();
    match err {
        IpSetError::BadFormat(msg) => {
            assert!(msg.contains("not yet defined"), "unexpected message: {msg}")
        }
        other => panic!("expected BadFormat, got {other:?}"),
    }
}

#[test]
fn load_rejects_an_out_of_range_variable() {
    // A nonterminal record naming a variable past MAX_VAR.
    let mut buf = Vec::new();
    buf.extend_from_slice(b"IP set\0\0");
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.extend_from_slice(&2u64.to_be_bytes());
    buf.extend_from_slice(&1u64.to_be_bytes());
    buf.push(0u8);
    buf.extend_from_slice(&0i32.to_be_bytes());
    buf.push(1u8);
    buf.extend_from_slice(&65000u16.to_be_bytes());
    buf.extend_from_slice(&0u64.to_be_bytes());
    buf.extend_from_slice(&0u64.to_be_bytes());

    let engine = std::rc::Rc::new(std::cell::RefCell::new(Engine::new()));
    let err = IpSet::load(engine, &mut buf.as_slice()).unwrap_err();
    match err {
        IpSetError::BadFormat(msg) => assert!(msg.contains("variable"), "unexpected message: {msg}"),
        other => panic!("expected BadFormat, got {other:?}"),
    }
}

#[test]
fn load_surfaces_a_truncated_stream_as_an_io_error() {
    // Magic bytes only, stream cut off before the version field.
    let buf = b"IP set\0\0".to_vec();

    let engine = std::rc::Rc::new(std::cell::RefCell::new(Engine::new()));
    let err = IpSet::load(engine, &mut buf.as_slice()).unwrap_err();
    match err {
        IpSetError::Io(_) => {}
        other => panic!("expected Io, got {other:?}"),
    }
}
