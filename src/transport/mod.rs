//! The link segments arrive over.

mod channel;
mod udp;

pub use channel::{channel, ChannelSender, ChannelTransport, Message};
pub use udp::UdpTransport;

use crate::Result;

/// Something that happened on the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
	Connected,
	/// A packet was written to the receive buffer.
	///
	/// This is the packet's real length, it is larger than the buffer if the packet didn't fit.
	Packet(usize),
	Disconnected,
}

/// A receive-only, best effort packet link.
#[allow(async_fn_in_trait)]
pub trait Transport {
	/// Waits for the next event, packets are written to `buf`.
	///
	/// Returns `None` once the link is gone for good.
	async fn recv(&mut self, buf: &mut [u8]) -> Result<Option<LinkEvent>>;
}
