//! Single-slot exchange of completed frames between reassembly and rendering.
//!
//! Everything in here runs with the exclusion region of [`Context`](crate::Context) held, so the
//! check of the altering flag and the swap that follows can't interleave with the renderer
//! finishing up.

use std::mem;

use tokio::sync::Notify;

use crate::frame::Frame;

/// A completed frame waiting for the renderer.
#[derive(Debug)]
pub(crate) struct Pending {
	pub frame:   Frame,
	/// Link session the frame was completed in.
	pub session: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Offer {
	Accepted,
	/// The renderer still owns the previous frame, the new one is dropped.
	Busy,
}

#[derive(Debug)]
pub(crate) struct Handoff {
	altering: bool,
	/// The renderer's buffer while it is idle.
	spare:    Option<Frame>,
	pending:  Option<Pending>,
}

impl Handoff {
	pub fn new(spare: Frame) -> Self {
		Self {
			altering: false,
			spare:    Some(spare),
			pending:  None,
		}
	}

	pub fn is_altering(&self) -> bool {
		self.altering
	}

	/// Trades the freshly completed `transcription` for the renderer's idle buffer and wakes the renderer.
	///
	/// Never waits: if the renderer is busy the completed frame is left where it is and gets overwritten by
	/// the next one.
	pub fn offer(&mut self, transcription: &mut Frame, session: u64, ready: &Notify) -> Offer {
		if self.altering {
			return Offer::Busy;
		}
		let Some(spare) = self.spare.take() else {
			return Offer::Busy;
		};

		let frame = mem::replace(transcription, spare);
		self.pending = Some(Pending { frame, session });
		self.altering = true;
		ready.notify_one();

		Offer::Accepted
	}

	/// Hands the pending frame to the renderer.
	pub fn take(&mut self) -> Option<Pending> {
		self.pending.take()
	}

	/// The renderer is done with `frame`, it becomes the spare for the next handoff.
	pub fn release(&mut self, frame: Frame) {
		self.spare = Some(frame);
		self.altering = false;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn filled(leds: usize, color: u8) -> Frame {
		let mut frame = Frame::new(leds);
		frame.fill([color; 3]);
		frame
	}

	#[test]
	fn offer_swaps_buffers_without_copying() {
		let ready = Notify::new();
		let mut handoff = Handoff::new(filled(2, 0));
		let mut transcription = filled(2, 9);

		assert_eq!(handoff.offer(&mut transcription, 0, &ready), Offer::Accepted);
		assert!(handoff.is_altering());
		assert_eq!(&*transcription, &[[0; 3]; 2]);

		let pending = handoff.take().unwrap();
		assert_eq!(&*pending.frame, &[[9; 3]; 2]);
		assert_eq!(pending.session, 0);
		assert!(handoff.take().is_none());
	}

	#[test]
	fn busy_renderer_drops_the_new_frame() {
		let ready = Notify::new();
		let mut handoff = Handoff::new(filled(2, 0));
		let mut transcription = filled(2, 1);

		assert_eq!(handoff.offer(&mut transcription, 0, &ready), Offer::Accepted);
		let pending = handoff.take().unwrap();

		transcription.fill([2; 3]);
		assert_eq!(handoff.offer(&mut transcription, 0, &ready), Offer::Busy);
		assert_eq!(&*transcription, &[[2; 3]; 2]);

		handoff.release(pending.frame);
		assert!(!handoff.is_altering());
		assert_eq!(handoff.offer(&mut transcription, 0, &ready), Offer::Accepted);
		assert_eq!(&*handoff.take().unwrap().frame, &[[2; 3]; 2]);
	}
}
