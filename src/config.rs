use std::time::Duration;

use ledlink_shared::{
	BYTES_PER_LED,
	DEFAULT_BLINK_INTERVAL_MS,
	DEFAULT_MAX_SEGMENT_BYTES,
	DEFAULT_NUM_LEDS,
	MAX_SEGMENTS,
	SEGMENT_HEADER_LEN,
};

use crate::{Error, Result};

/// Startup configuration. None of this is negotiated over the link, sender and receiver have to agree on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Number of leds on the strip.
	pub leds:              usize,
	/// Largest packet the transport delivers, header included.
	pub max_segment_bytes: usize,
	/// How often the status led toggles while advertising.
	pub blink_interval:    Duration,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			leds:              DEFAULT_NUM_LEDS,
			max_segment_bytes: DEFAULT_MAX_SEGMENT_BYTES,
			blink_interval:    Duration::from_millis(DEFAULT_BLINK_INTERVAL_MS),
		}
	}
}

impl Config {
	/// Validates the config and derives how frames are split into segments.
	pub fn layout(&self) -> Result<Layout> {
		if self.leds == 0 {
			return Err(Error::InvalidConfig("the strip needs at least one led"));
		}

		let triples_per_segment = self.max_segment_bytes.saturating_sub(SEGMENT_HEADER_LEN) / BYTES_PER_LED;
		if triples_per_segment == 0 {
			return Err(Error::InvalidConfig("segments are too small to carry a single led"));
		}

		let segments = self.leds.div_ceil(triples_per_segment);
		if segments > MAX_SEGMENTS {
			return Err(Error::InvalidConfig("a frame needs more segments than the index byte can address"));
		}

		Ok(Layout {
			leds: self.leds,
			max_segment_bytes: self.max_segment_bytes,
			triples_per_segment,
			segments,
		})
	}
}

/// How a frame maps onto segments, derived once from [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
	leds:                usize,
	max_segment_bytes:   usize,
	triples_per_segment: usize,
	segments:            usize,
}

impl Layout {
	pub fn leds(&self) -> usize {
		self.leds
	}

	pub fn max_segment_bytes(&self) -> usize {
		self.max_segment_bytes
	}

	pub fn triples_per_segment(&self) -> usize {
		self.triples_per_segment
	}

	/// Number of distinct segments that make up one frame.
	pub fn segments(&self) -> usize {
		self.segments
	}

	/// First led written by segment `index`.
	pub fn offset(&self, index: usize) -> usize {
		index * self.triples_per_segment
	}

	/// Number of leds carried by segment `index`, only the last one can be short.
	///
	/// Returns `None` if the index is past the end of the frame.
	pub fn segment_len(&self, index: usize) -> Option<usize> {
		if index >= self.segments {
			return None;
		}

		Some(self.triples_per_segment.min(self.leds - self.offset(index)))
	}
}
