use std::{net::SocketAddr, time::Duration};

use tokio::{
	net::{ToSocketAddrs, UdpSocket},
	time,
};
use tracing::{info, trace};

use super::{LinkEvent, Transport};
use crate::Result;

/// One datagram per segment.
///
/// UDP has no connections, so the first peer to send a datagram counts as connected and it stays
/// connected until it has been quiet for `idle_timeout`. Datagrams from anyone else are ignored
/// in the meantime.
#[derive(Debug)]
pub struct UdpTransport {
	socket:       UdpSocket,
	idle_timeout: Duration,
	peer:         Option<SocketAddr>,
	/// Length of the datagram that announced the peer, it's still in the caller's buffer.
	held:         Option<usize>,
}

impl UdpTransport {
	pub async fn bind(addr: impl ToSocketAddrs, idle_timeout: Duration) -> Result<Self> {
		let socket = UdpSocket::bind(addr).await?;

		Ok(Self {
			socket,
			idle_timeout,
			peer: None,
			held: None,
		})
	}

	pub fn local_addr(&self) -> Result<SocketAddr> {
		Ok(self.socket.local_addr()?)
	}

	pub fn peer(&self) -> Option<SocketAddr> {
		self.peer
	}
}

impl Transport for UdpTransport {
	/// Expects the same buffer on every call, the first datagram of a connection is reported right
	/// after [`LinkEvent::Connected`] without being read again.
	async fn recv(&mut self, buf: &mut [u8]) -> Result<Option<LinkEvent>> {
		if let Some(len) = self.held.take() {
			return Ok(Some(LinkEvent::Packet(len)));
		}

		loop {
			let (len, from) = match self.peer {
				None => self.socket.recv_from(buf).await?,
				Some(peer) => match time::timeout(self.idle_timeout, self.socket.recv_from(buf)).await {
					Ok(received) => received?,
					Err(_) => {
						info!(%peer, "peer went quiet");
						self.peer = None;
						return Ok(Some(LinkEvent::Disconnected));
					}
				},
			};

			match self.peer {
				Some(peer) if peer == from => return Ok(Some(LinkEvent::Packet(len))),
				Some(_) => {
					trace!(%from, "ignoring datagram from a second peer");
				}
				None => {
					info!(peer = %from, "peer connected");
					self.peer = Some(from);
					self.held = Some(len);
					return Ok(Some(LinkEvent::Connected));
				}
			}
		}
	}
}
