//! Ethernet/IPv4/TCP decode: pull a PSH-flagged payload and its socket
//! addresses out of a raw link-layer frame as delivered by `pcap`.
//!
//! This is the only place in the crate that understands link-layer framing;
//! everything past this point is `(SocketAddr, SocketAddr, &[u8])` feeding
//! `wiresniff_core::Pipeline::handle_payload`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use etherparse::{IpHeader, PacketHeaders, TransportHeader};

use crate::bpf::in_filtered_range;

/// One decoded TCP payload chunk, ready to feed the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct PshPayload<'a> {
    /// Address the segment was sent from.
    pub source: SocketAddr,
    /// Address the segment was sent to (the flow key).
    pub destination: SocketAddr,
    /// The TCP payload bytes.
    pub payload: &'a [u8],
}

/// Decode `frame` (a raw Ethernet II frame as handed back by `pcap`) and
/// return its payload if it's a PSH-flagged IPv4/TCP segment on one of the
/// filtered destination port ranges.
///
/// Returns `None` for anything that isn't IPv4-over-TCP, doesn't carry the
/// PSH flag, has an empty payload, or falls outside the filtered port
/// ranges — the last check is redundant with the BPF filter applied at
/// capture time, but cheap, and protects a caller that feeds frames in from
/// somewhere other than a live, filtered capture (a pcap file replay, a
/// test).
#[must_use]
pub fn decode_psh_payload(frame: &[u8]) -> Option<PshPayload<'_>> {
    let headers = PacketHeaders::from_ethernet_slice(frame).ok()?;

    let IpHeader::Version4(ipv4, _) = headers.ip? else {
        return None;
    };
    let TransportHeader::Tcp(tcp) = headers.transport? else {
        return None;
    };

    if !tcp.psh || headers.payload.is_empty() {
        return None;
    }
    if !in_filtered_range(tcp.source_port) && !in_filtered_range(tcp.destination_port) {
        return None;
    }

    let source = SocketAddr::new(IpAddr::V4(Ipv4Addr::from(ipv4.source)), tcp.source_port);
    let destination = SocketAddr::new(IpAddr::V4(Ipv4Addr::from(ipv4.destination)), tcp.destination_port);
    Some(PshPayload { source, destination, payload: headers.payload })
}
