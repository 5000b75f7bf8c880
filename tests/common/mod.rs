#![allow(dead_code)]

use std::{rc::Rc, time::Duration};

use eyre::{eyre, Result};
use ledlink::{driver::StripDriver, FrameId, Layout, Rgb, Segment};
use tokio::sync::{mpsc, Semaphore};
use tracing_subscriber::EnvFilter;

pub const RED: Rgb = [10, 0, 0];
pub const GREEN: Rgb = [0, 10, 0];
pub const BLUE: Rgb = [0, 0, 10];

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StripEvent {
	Frame(Vec<Rgb>),
	Cleared,
}

/// Reports everything the pipeline does to the strip.
///
/// With a gate, every render blocks until the test hands out a permit.
pub struct RecordingStrip {
	events: mpsc::UnboundedSender<StripEvent>,
	gate:   Option<Rc<Semaphore>>,
}

pub fn recording_strip() -> (RecordingStrip, mpsc::UnboundedReceiver<StripEvent>) {
	let (events, rx) = mpsc::unbounded_channel();
	(RecordingStrip { events, gate: None }, rx)
}

pub fn gated_strip() -> (RecordingStrip, mpsc::UnboundedReceiver<StripEvent>, Rc<Semaphore>) {
	let (mut strip, rx) = recording_strip();
	let gate = Rc::new(Semaphore::new(0));
	strip.gate = Some(gate.clone());
	(strip, rx, gate)
}

impl StripDriver for RecordingStrip {
	async fn render(&mut self, pixels: &[Rgb]) -> ledlink::Result<()> {
		let _ = self.events.send(StripEvent::Frame(pixels.to_vec()));
		if let Some(gate) = &self.gate {
			if let Ok(permit) = gate.acquire().await {
				permit.forget();
			}
		}
		Ok(())
	}

	async fn clear(&mut self) -> ledlink::Result<()> {
		let _ = self.events.send(StripEvent::Cleared);
		Ok(())
	}
}

pub async fn next_event(rx: &mut mpsc::UnboundedReceiver<StripEvent>) -> Result<StripEvent> {
	tokio::time::timeout(Duration::from_secs(2), rx.recv())
		.await
		.map_err(|_| eyre!("timed out waiting for the strip"))?
		.ok_or_else(|| eyre!("strip went away"))
}

pub async fn next_frame(rx: &mut mpsc::UnboundedReceiver<StripEvent>) -> Result<Vec<Rgb>> {
	match next_event(rx).await? {
		StripEvent::Frame(frame) => Ok(frame),
		other => Err(eyre!("expected a frame, got {other:?}")),
	}
}

/// Wire form of segment `index` of `frame`, filled with `color`.
pub fn packet(layout: &Layout, frame: u8, index: u8, color: Rgb) -> Vec<u8> {
	let leds = layout.segment_len(index as usize).unwrap_or(0);
	let payload = color.repeat(leds);
	let segment = Segment {
		frame: FrameId(frame),
		index,
		payload: &payload,
	};

	let mut buf = vec![0u8; 2 + payload.len()];
	let len = segment.encode_into(&mut buf).unwrap_or(0);
	buf.truncate(len);
	buf
}

/// Every segment of a single colored frame, in order.
pub fn frame_packets(layout: &Layout, frame: u8, color: Rgb) -> Vec<Vec<u8>> {
	(0..layout.segments()).map(|index| packet(layout, frame, index as u8, color)).collect()
}

pub fn solid(layout: &Layout, color: Rgb) -> Vec<Rgb> {
	vec![color; layout.leds()]
}
