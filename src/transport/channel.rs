use tokio::sync::mpsc;

use super::{LinkEvent, Transport};
use crate::Result;

/// What a [`ChannelSender`] can push into the link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
	Connected,
	Packet(Vec<u8>),
	Disconnected,
}

pub type ChannelSender = mpsc::Sender<Message>;

/// An in-process link, fed through a [`ChannelSender`].
///
/// The link closes once every sender has been dropped.
#[derive(Debug)]
pub struct ChannelTransport {
	rx: mpsc::Receiver<Message>,
}

/// Creates a linked sender and transport with room for `capacity` queued messages.
pub fn channel(capacity: usize) -> (ChannelSender, ChannelTransport) {
	let (tx, rx) = mpsc::channel(capacity);
	(tx, ChannelTransport { rx })
}

impl Transport for ChannelTransport {
	async fn recv(&mut self, buf: &mut [u8]) -> Result<Option<LinkEvent>> {
		let event = match self.rx.recv().await {
			None => return Ok(None),
			Some(Message::Connected) => LinkEvent::Connected,
			Some(Message::Disconnected) => LinkEvent::Disconnected,
			Some(Message::Packet(packet)) => {
				let len = packet.len().min(buf.len());
				buf[..len].copy_from_slice(&packet[..len]);
				LinkEvent::Packet(packet.len())
			}
		};

		Ok(Some(event))
	}
}
