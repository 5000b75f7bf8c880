//! Rebuilds frames from segments.
//!
//! Only one frame is ever in progress. A segment with index 0 always starts a new frame, whatever
//! happened to the previous one, and segments for any other frame id are dropped. Segment work is
//! tagged with the epoch it was started in, starting a new frame moves the epoch on and turns any
//! work still in flight for the old frame into a no-op.

use std::rc::Rc;

use ledlink_shared::BYTES_PER_LED;
use tracing::{debug, trace};

use crate::{
	context::{Context, Shared},
	frame::SegmentMask,
	handoff::Offer,
	segment::{FrameId, Segment},
};

/// Reassembly state of the frame in progress, `current == None` means idle.
#[derive(Debug, Default)]
pub(crate) struct Progress {
	current:   Option<FrameId>,
	processed: usize,
	received:  SegmentMask,
}

impl Progress {
	pub fn current(&self) -> Option<FrameId> {
		self.current
	}

	pub fn processed(&self) -> usize {
		self.processed
	}

	fn begin(&mut self, frame: FrameId) {
		self.current = Some(frame);
		self.processed = 0;
		self.received.clear();
	}

	/// Back to idle. The counter keeps its value until the next frame starts.
	fn finish(&mut self) {
		self.current = None;
	}

	/// Counts `index` towards the frame, returns the new count or `None` if it was already counted.
	fn record(&mut self, index: u8) -> Option<usize> {
		if !self.received.insert(index) {
			return None;
		}
		self.processed += 1;
		Some(self.processed)
	}
}

/// What happened to a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	/// Index out of range or payload too short for its slot.
	Malformed,
	/// Not part of the frame currently being assembled.
	Stale,
	/// This segment was already applied to the current frame.
	Duplicate,
	/// A newer frame started (or the link dropped) while the segment was being applied.
	Superseded,
	/// Applied, the frame still needs more segments.
	Accumulating { processed: usize },
	/// Completed the frame and handed it to the renderer.
	HandedOff,
	/// Completed the frame, but the renderer was busy so it was dropped.
	RendererBusy,
}

pub struct Reassembler {
	ctx: Rc<Context>,
}

impl Reassembler {
	pub fn new(ctx: Rc<Context>) -> Self {
		Self { ctx }
	}

	/// Frame currently being assembled, if any.
	pub async fn current_frame(&self) -> Option<FrameId> {
		self.ctx.lock().await.progress.current()
	}

	/// Distinct segments applied to the current frame so far.
	pub async fn processed(&self) -> usize {
		self.ctx.lock().await.progress.processed()
	}

	/// Feeds one segment into the state machine.
	///
	/// Several calls may be in flight at once on the same reassembler; they only ever wait for the
	/// exclusion region, never for the renderer.
	pub async fn accept(&self, segment: Segment<'_>) -> Outcome {
		let layout = self.ctx.layout();

		let Some(leds) = layout.segment_len(segment.index as usize) else {
			trace!(frame = %segment.frame, index = segment.index, "segment index out of range");
			return Outcome::Malformed;
		};
		if segment.payload.len() < leds * BYTES_PER_LED {
			trace!(
				frame = %segment.frame,
				index = segment.index,
				len = segment.payload.len(),
				"segment payload too short"
			);
			return Outcome::Malformed;
		}

		let epoch = {
			let mut shared = self.ctx.lock().await;
			let progress = &mut shared.progress;

			if segment.index == 0 {
				if let Some(previous) = progress.current() {
					debug!(
						previous = %previous,
						processed = progress.processed(),
						segments = layout.segments(),
						"frame pre-empted by {}",
						segment.frame
					);
				}
				progress.begin(segment.frame);
				self.ctx.advance_epoch()
			} else if progress.current() != Some(segment.frame) {
				trace!(frame = %segment.frame, index = segment.index, "dropping stale segment");
				return Outcome::Stale;
			} else if progress.received.contains(segment.index) {
				return Outcome::Duplicate;
			} else {
				self.ctx.epoch()
			}
		};

		self.apply(segment, leds, epoch).await
	}

	/// Writes the segment into the transcription buffer and counts it.
	async fn apply(&self, segment: Segment<'_>, leds: usize, epoch: u64) -> Outcome {
		// nothing between this check and the write can yield
		if self.ctx.epoch() != epoch {
			return Outcome::Superseded;
		}
		let offset = self.ctx.layout().offset(segment.index as usize);
		self.ctx.transcription().write(offset, leds, segment.payload);

		let mut shared = self.ctx.lock().await;
		if self.ctx.epoch() != epoch {
			return Outcome::Superseded;
		}

		let Some(processed) = shared.progress.record(segment.index) else {
			return Outcome::Duplicate;
		};
		if processed < self.ctx.layout().segments() {
			return Outcome::Accumulating { processed };
		}

		self.complete(&mut shared, segment.frame)
	}

	fn complete(&self, shared: &mut Shared, frame: FrameId) -> Outcome {
		shared.progress.finish();
		self.ctx.advance_epoch();

		let offer = shared
			.handoff
			.offer(&mut self.ctx.transcription(), self.ctx.session(), self.ctx.ready());
		match offer {
			Offer::Accepted => {
				debug!(frame = %frame, "frame complete, handed to renderer");
				Outcome::HandedOff
			}
			Offer::Busy => {
				debug!(frame = %frame, "frame complete, renderer busy, dropping it");
				Outcome::RendererBusy
			}
		}
	}

	/// Forgets the frame in progress and cancels all segment work in flight.
	pub async fn reset(&self) {
		let mut shared = self.ctx.lock().await;
		if let Some(frame) = shared.progress.current() {
			debug!(frame = %frame, processed = shared.progress.processed(), "abandoning frame");
		}
		shared.progress.finish();
		self.ctx.advance_epoch();
	}
}
