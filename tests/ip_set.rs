use ipset_bdd::IpSet;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

#[test]
fn new_set_is_empty() {
    let set = IpSet::new();
    assert!(set.is_empty());
}

#[test]
fn two_fresh_sets_compare_equal() {
    let a = IpSet::new();
    let b = IpSet::new();
    assert!(a.equal(&b));
    assert!(!a.not_equal(&b));
}

#[test]
fn add_reports_whether_already_present() {
    let mut set = IpSet::new();
    let addr = Ipv4Addr::new(192, 168, 1, 100);

    assert!(!set.ipv4_add_network(addr, 24), "first insertion should report absent");
    assert!(set.ipv4_add_network(addr, 24), "repeat insertion should report already present");
}

#[test]
fn ip_add_network_agrees_with_ipv4_add_network() {
    let mut set = IpSet::new();
    let ip = std::net::IpAddr::from_str("192.168.1.100").unwrap();
    assert!(!set.ip_add_network(ip, 24));
    assert!(set.ipv4_add_network(Ipv4Addr::new(192, 168, 1, 100), 24));
}

#[test]
fn invalid_prefix_is_a_no_op() {
    let mut set = IpSet::new();
    let addr = Ipv4Addr::new(10, 0, 0, 1);
    assert!(!set.ipv4_add_network(addr, 0));
    assert!(!set.ipv4_add_network(addr, 33));
    assert!(set.is_empty());
}

#[test]
fn contains_reflects_added_network() {
    let mut set = IpSet::new();
    set.ipv4_add_network(Ipv4Addr::new(10, 0, 0, 0), 8);

    assert!(set.ip_contains(std::net::IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3))));
    assert!(!set.ip_contains(std::net::IpAddr::V4(Ipv4Addr::new(11, 0, 0, 1))));
}

#[test]
fn union_intersection_difference() {
    let mut a = IpSet::new();
    a.ipv4_add_network(Ipv4Addr::new(10, 0, 0, 0), 8);
    let mut b = IpSet::new();
    b.ipv4_add_network(Ipv4Addr::new(10, 1, 0, 0), 16);

    let union = a.union(&b);
    let inter = a.intersection(&b);
    let diff = a.difference(&b);

    assert!(union.equal(&a));
    assert!(inter.equal(&b));
    assert!(diff.ip_contains(std::net::IpAddr::V4(Ipv4Addr::new(10, 2, 0, 0))));
    assert!(!diff.ip_contains(std::net::IpAddr::V4(Ipv4Addr::new(10, 1, 0, 0))));
}

#[test]
fn iterate_networks_summarizes_a_single_cidr_block() {
    let mut set = IpSet::new();
    set.ipv4_add_network(Ipv4Addr::new(192, 168, 0, 0), 24);

    let networks: Vec<_> = set.iterate_networks(true).map(|n| n.to_string()).collect();
    assert_eq!(networks, vec!["192.168.0.0/24"]);
}

#[test]
fn iterate_networks_on_empty_set_double_expands_the_complement() {
    let set = IpSet::new();
    let networks: Vec<_> = set.iterate_networks(false).map(|n| n.to_string()).collect();
    assert_eq!(networks.len(), 2);
    assert!(networks.contains(&"0.0.0.0/0".to_string()));
    assert!(networks.contains(&"::/0".to_string()));
}

#[test]
fn iterate_without_summarize_lists_individual_hosts() {
    let mut set = IpSet::new();
    set.ipv4_add_network(Ipv4Addr::new(192, 168, 0, 0), 30);
    let hosts: Vec<_> = set.iterate(true).collect();
    assert_eq!(hosts.len(), 4);
    assert!(hosts.iter().all(|n| n.prefix_len == 32));
}

#[test]
fn iterate_hosts_over_a_wide_prefix_is_lazy() {
    // 0.0.0.0/1 alone covers 2^31 host addresses; taking only the first few
    // must not force the whole expansion up front.
    let mut set = IpSet::new();
    set.ipv4_add_network(Ipv4Addr::new(0, 0, 0, 0), 1);

    let first_five: Vec<_> = set.iterate(true).take(5).collect();
    assert_eq!(first_five.len(), 5);
    assert!(first_five.iter().all(|n| n.prefix_len == 32));
}

#[test]
fn iterate_non_members_over_a_near_empty_set_is_lazy() {
    // A single host leaves almost the entire IPv4 and IPv6 space as
    // non-members; iterating non-members must still be drivable a few items
    // at a time instead of enumerating everything.
    let mut set = IpSet::new();
    set.ipv4_add(Ipv4Addr::new(1, 2, 3, 4));

    let first_ten: Vec<_> = set.iterate(false).take(10).collect();
    assert_eq!(first_ten.len(), 10);
}

#[test]
fn save_and_load_round_trip_preserves_membership() {
    let mut set = IpSet::new();
    set.ipv4_add_network(Ipv4Addr::new(172, 16, 0, 0), 12);
    set.ipv6_add_network(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0), 32);

    let mut buf = Vec::new();
    set.save(&mut buf).unwrap();

    let engine = std::rc::Rc::new(std::cell::RefCell::new(ipset_bdd::Engine::new()));
    let loaded = IpSet::load(engine, &mut buf.as_slice()).unwrap();

    assert!(loaded.ip_contains(std::net::IpAddr::V4(Ipv4Addr::new(172, 20, 1, 1))));
    assert!(loaded.ip_contains(std::net::IpAddr::V6(Ipv6Addr::new(
        0x2001, 0xdb8, 0, 0, 0, 0, 0, 1
    ))));
    assert!(!loaded.ip_contains(std::net::IpAddr::V4(Ipv4Addr::new(192, 168, 0, 1))));
}

#[test]
fn sets_from_distinct_engines_never_compare_equal() {
    let a = IpSet::new();
    let other_engine = std::rc::Rc::new(std::cell::RefCell::new(ipset_bdd::Engine::new()));
    let b = IpSet::with_engine(other_engine);
    assert!(a.not_equal(&b), "both empty, but backed by different node tables");
}
