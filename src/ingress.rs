use tracing::trace;

use crate::{
	config::Layout,
	segment::Segment,
	transport::{LinkEvent, Transport},
	Result,
};

/// What the ingress hands to the rest of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingress<'a> {
	Connected,
	Segment(Segment<'a>),
	Disconnected,
}

/// Reads packets off a [`Transport`] and decodes them into segments.
///
/// Packets are read into a single buffer allocated up front, decoded segments borrow from it.
pub struct PacketIngress<T> {
	transport:         T,
	buf:               Box<[u8]>,
	max_segment_bytes: usize,
}

impl<T: Transport> PacketIngress<T> {
	pub fn new(transport: T, layout: &Layout) -> Self {
		let max_segment_bytes = layout.max_segment_bytes();

		Self {
			transport,
			// one spare byte so an oversized packet can't pass for a full one
			buf: vec![0u8; max_segment_bytes + 1].into_boxed_slice(),
			max_segment_bytes,
		}
	}

	/// Waits for the next segment or link change, malformed packets are skipped.
	///
	/// Returns `None` once the transport has closed.
	pub async fn next(&mut self) -> Result<Option<Ingress<'_>>> {
		let len = loop {
			let Some(event) = self.transport.recv(&mut self.buf).await? else {
				return Ok(None);
			};

			match event {
				LinkEvent::Connected => return Ok(Some(Ingress::Connected)),
				LinkEvent::Disconnected => return Ok(Some(Ingress::Disconnected)),
				LinkEvent::Packet(len) if len > self.max_segment_bytes => {
					trace!(len, "dropping oversized packet");
				}
				LinkEvent::Packet(len) if Segment::decode(&self.buf[..len]).is_none() => {
					trace!(len, "dropping packet without a segment header");
				}
				LinkEvent::Packet(len) => break len,
			}
		};

		Ok(Segment::decode(&self.buf[..len]).map(Ingress::Segment))
	}

	pub fn into_inner(self) -> T {
		self.transport
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		segment::FrameId,
		transport::{channel, Message},
		Config,
	};

	#[tokio::test]
	async fn skips_malformed_packets() {
		let layout = Config {
			leds: 4,
			max_segment_bytes: 8,
			..Config::default()
		}
		.layout()
		.unwrap();
		let (tx, transport) = channel(8);
		let mut ingress = PacketIngress::new(transport, &layout);

		tx.send(Message::Connected).await.unwrap();
		tx.send(Message::Packet(vec![9])).await.unwrap();
		tx.send(Message::Packet(vec![0; 9])).await.unwrap();
		tx.send(Message::Packet(vec![2, 1, 7, 7, 7])).await.unwrap();
		tx.send(Message::Disconnected).await.unwrap();
		drop(tx);

		assert_eq!(ingress.next().await.unwrap(), Some(Ingress::Connected));
		assert_eq!(
			ingress.next().await.unwrap(),
			Some(Ingress::Segment(Segment {
				frame:   FrameId(2),
				index:   1,
				payload: &[7, 7, 7],
			}))
		);
		assert_eq!(ingress.next().await.unwrap(), Some(Ingress::Disconnected));
		assert_eq!(ingress.next().await.unwrap(), None);
	}
}
