//! The BPF filter this sniffer applies to every captured link-layer frame.
//!
//! `spec.md` §6 gives the filter as a literal string; it's reproduced here
//! as a constant (not reassembled from the port ranges at runtime) so the
//! exact expression handed to `pcap` is auditable at a glance.

/// TCP destination/source port ranges this protocol's known deployments use.
pub const PORT_RANGES: &[(u16, u16)] = &[(54992, 54994), (55006, 55007), (55021, 55040), (55296, 55551)];

/// The BPF expression applied to the capture handle.
pub const FILTER: &str = "tcp portrange 54992-54994 or tcp portrange 55006-55007 or \
    tcp portrange 55021-55040 or tcp portrange 55296-55551";

/// Whether `port` falls within one of [`PORT_RANGES`].
///
/// Used as a belt-and-braces check inside [`crate::link::decode_psh_payload`]
/// in case a capture backend is ever handed frames without applying the BPF
/// filter first (e.g. a pcap file replayed through a different device).
#[must_use]
pub fn in_filtered_range(port: u16) -> bool {
    PORT_RANGES.iter().any(|&(lo, hi)| (lo..=hi).contains(&port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_matches_spec_literal() {
        assert_eq!(
            FILTER,
            "tcp portrange 54992-54994 or tcp portrange 55006-55007 or tcp portrange 55021-55040 or tcp portrange 55296-55551"
        );
    }

    #[test]
    fn range_boundaries_are_inclusive() {
        assert!(in_filtered_range(54992));
        assert!(in_filtered_range(54994));
        assert!(!in_filtered_range(54995));
        assert!(in_filtered_range(55551));
        assert!(!in_filtered_range(55552));
    }
}
