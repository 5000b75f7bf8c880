use std::fmt;

use ledlink_shared::{FRAME_ID_MODULUS, FRAME_ID_OFFSET, SEGMENT_HEADER_LEN, SEGMENT_INDEX_OFFSET};

/// Identifies a logical frame, independent of whatever sequencing the transport does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u8);

impl FrameId {
	/// The id the sender uses for the frame after this one.
	pub fn next(self) -> Self {
		Self(((self.0 as u16 + 1) % FRAME_ID_MODULUS as u16) as u8)
	}
}

impl fmt::Display for FrameId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// One packet's worth of a frame.
///
/// The payload is borrowed from the receive buffer, it's only valid until the next packet is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
	pub frame:   FrameId,
	pub index:   u8,
	pub payload: &'a [u8],
}

impl<'a> Segment<'a> {
	/// Splits a raw packet into header and payload.
	///
	/// Anything too short to hold the header is not a segment.
	pub fn decode(packet: &'a [u8]) -> Option<Self> {
		if packet.len() < SEGMENT_HEADER_LEN {
			return None;
		}

		Some(Self {
			frame:   FrameId(packet[FRAME_ID_OFFSET]),
			index:   packet[SEGMENT_INDEX_OFFSET],
			payload: &packet[SEGMENT_HEADER_LEN..],
		})
	}

	/// Writes the wire form of this segment into `buf`, returns the number of bytes written.
	pub fn encode_into(&self, buf: &mut [u8]) -> Option<usize> {
		let len = SEGMENT_HEADER_LEN + self.payload.len();
		let out = buf.get_mut(..len)?;

		out[FRAME_ID_OFFSET] = self.frame.0;
		out[SEGMENT_INDEX_OFFSET] = self.index;
		out[SEGMENT_HEADER_LEN..].copy_from_slice(self.payload);

		Some(len)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_header_and_payload() {
		let packet = [5, 1, 10, 0, 0, 20, 0, 0];
		let segment = Segment::decode(&packet).unwrap();

		assert_eq!(segment.frame, FrameId(5));
		assert_eq!(segment.index, 1);
		assert_eq!(segment.payload, &[10, 0, 0, 20, 0, 0]);
	}

	#[test]
	fn header_only_packet_has_empty_payload() {
		let segment = Segment::decode(&[3, 0]).unwrap();

		assert!(segment.payload.is_empty());
	}

	#[test]
	fn short_packets_are_dropped() {
		assert_eq!(Segment::decode(&[]), None);
		assert_eq!(Segment::decode(&[7]), None);
	}

	#[test]
	fn encode_matches_wire_layout() {
		let segment = Segment {
			frame:   FrameId(254),
			index:   3,
			payload: &[1, 2, 3],
		};
		let mut buf = [0u8; 8];

		assert_eq!(segment.encode_into(&mut buf), Some(5));
		assert_eq!(&buf[..5], &[254, 3, 1, 2, 3]);
		assert_eq!(Segment::decode(&buf[..5]), Some(segment));

		assert_eq!(segment.encode_into(&mut [0u8; 4]), None);
	}

	#[test]
	fn frame_ids_wrap_before_255() {
		assert_eq!(FrameId(0).next(), FrameId(1));
		assert_eq!(FrameId(253).next(), FrameId(254));
		assert_eq!(FrameId(254).next(), FrameId(0));
	}
}
