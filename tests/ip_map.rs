use ipset_bdd::IpMap;
use std::net::Ipv4Addr;

#[test]
fn new_map_is_empty_and_returns_default_everywhere() {
    let map = IpMap::new(-1);
    assert!(map.is_empty());
    assert_eq!(map.ipv4_get(Ipv4Addr::new(8, 8, 8, 8)), -1);
}

#[test]
fn set_network_narrows_without_disturbing_other_addresses() {
    let mut map = IpMap::new(0);
    map.ipv4_set_network(Ipv4Addr::new(10, 0, 0, 0), 8, 7);

    assert_eq!(map.ipv4_get(Ipv4Addr::new(10, 1, 2, 3)), 7);
    assert_eq!(map.ipv4_get(Ipv4Addr::new(11, 0, 0, 1)), 0);
    assert!(!map.is_empty());
}

#[test]
fn later_set_overrides_an_earlier_narrower_one() {
    let mut map = IpMap::new(0);
    map.ipv4_set_network(Ipv4Addr::new(10, 0, 0, 0), 8, 1);
    map.ipv4_set(Ipv4Addr::new(10, 0, 0, 1), 2);

    assert_eq!(map.ipv4_get(Ipv4Addr::new(10, 0, 0, 1)), 2);
    assert_eq!(map.ipv4_get(Ipv4Addr::new(10, 0, 0, 2)), 1);
}

#[test]
fn invalid_prefix_leaves_map_untouched() {
    let mut map = IpMap::new(0);
    map.ipv4_set_network(Ipv4Addr::new(10, 0, 0, 0), 0, 99);
    assert!(map.is_empty());
}

#[test]
fn equal_maps_share_default_and_narrowing() {
    let mut a = IpMap::new(0);
    let mut b = IpMap::new(0);
    a.ipv4_set_network(Ipv4Addr::new(192, 168, 0, 0), 16, 5);
    b.ipv4_set_network(Ipv4Addr::new(192, 168, 0, 0), 16, 5);
    assert!(a.equal(&b));

    b.ipv4_set(Ipv4Addr::new(192, 168, 1, 1), 6);
    assert!(a.not_equal(&b));
}

#[test]
fn save_and_load_round_trip_preserves_values() {
    let mut map = IpMap::new(-1);
    map.ipv4_set_network(Ipv4Addr::new(172, 16, 0, 0), 12, 42);

    let mut buf = Vec::new();
    map.save(&mut buf).unwrap();

    let engine = std::rc::Rc::new(std::cell::RefCell::new(ipset_bdd::Engine::new()));
    let loaded = IpMap::load(engine, -1, &mut buf.as_slice()).unwrap();

    assert_eq!(loaded.ipv4_get(Ipv4Addr::new(172, 20, 1, 1)), 42);
    assert_eq!(loaded.ipv4_get(Ipv4Addr::new(8, 8, 8, 8)), -1);
}
