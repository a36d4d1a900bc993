//! Two interfaces wired back to back.

mod common;

use std::net::Ipv4Addr;

use common::{deliver, init_logging, interface, mac};
use toy_netcore::network::protocol;
use toy_netcore::{ArpMessage, ArpOperation, EtherType, EthernetAddress, Ipv4Datagram};

const IP_A: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
const IP_B: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 2);

fn datagram(payload: &[u8]) -> Ipv4Datagram {
    Ipv4Datagram::new(IP_A, IP_B, protocol::UDP, 64, payload.to_vec()).unwrap()
}

#[test]
fn test_first_send_resolves_then_delivers() {
    init_logging();
    let (mut a, a_out) = interface("a", mac(0xa), IP_A);
    let (mut b, b_out) = interface("b", mac(0xb), IP_B);

    let dgram = datagram(b"ping");
    a.send_datagram(dgram.clone(), IP_B);

    // A knows nothing yet: a broadcast ARP request is all that goes out
    let request = a_out.pop().expect("ARP request");
    assert!(a_out.is_empty());
    assert_eq!(request.header.dst, EthernetAddress::BROADCAST);
    assert_eq!(request.header.ethertype, EtherType::Arp);
    let msg = ArpMessage::parse(&request.payload).unwrap();
    assert_eq!(msg.operation, ArpOperation::Request);
    assert_eq!(msg.target_ip_address, IP_B);

    // B answers with a unicast reply
    b.recv_frame(&request);
    let reply = b_out.pop().expect("ARP reply");
    assert_eq!(reply.header.dst, mac(0xa));
    assert_eq!(
        ArpMessage::parse(&reply.payload).unwrap().operation,
        ArpOperation::Reply
    );

    // The reply releases the queued datagram
    a.recv_frame(&reply);
    assert_eq!(a.pending_len(), 0);
    assert_eq!(deliver(&a_out, &mut b), 1);
    assert_eq!(b.pop_datagram(), Some(dgram));
}

#[test]
fn test_resolution_is_reused_both_ways() {
    init_logging();
    let (mut a, a_out) = interface("a", mac(0xa), IP_A);
    let (mut b, b_out) = interface("b", mac(0xb), IP_B);

    a.send_datagram(datagram(b"one"), IP_B);
    // request -> reply -> data
    assert_eq!(deliver(&a_out, &mut b), 1);
    assert_eq!(deliver(&b_out, &mut a), 1);
    assert_eq!(deliver(&a_out, &mut b), 1);
    assert!(b.pop_datagram().is_some());

    // B learned A from the request, so its answer needs no ARP
    let back = Ipv4Datagram::new(IP_B, IP_A, protocol::UDP, 64, b"two".to_vec()).unwrap();
    b.send_datagram(back.clone(), IP_A);
    let frames = b_out.drain();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].header.ethertype, EtherType::Ipv4);
    a.recv_frame(&frames[0]);
    assert_eq!(a.pop_datagram(), Some(back));
}

#[test]
fn test_silent_peer_is_requested_again_after_retry_window() {
    init_logging();
    let (mut a, a_out) = interface("a", mac(0xa), IP_A);

    a.send_datagram(datagram(b"1"), IP_B);
    assert_eq!(a_out.drain().len(), 1);

    for _ in 0..4 {
        a.tick(1_000);
        a.send_datagram(datagram(b"x"), IP_B);
    }
    assert!(a_out.is_empty());

    a.tick(1_000);
    a.send_datagram(datagram(b"2"), IP_B);
    assert_eq!(a_out.drain().len(), 1);
    assert_eq!(a.pending_len(), 6);
}

#[test]
fn test_expired_mapping_is_resolved_again() {
    init_logging();
    let (mut a, a_out) = interface("a", mac(0xa), IP_A);
    let (mut b, b_out) = interface("b", mac(0xb), IP_B);

    a.send_datagram(datagram(b"1"), IP_B);
    deliver(&a_out, &mut b);
    deliver(&b_out, &mut a);
    deliver(&a_out, &mut b);

    a.tick(30_001);
    b.tick(30_001);
    a.send_datagram(datagram(b"2"), IP_B);
    let frames = a_out.drain();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].header.ethertype, EtherType::Arp);
}
