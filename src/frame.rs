use std::ops::{Deref, DerefMut};

use ledlink_shared::{BYTES_PER_LED, MAX_SEGMENTS};

pub type Rgb = [u8; BYTES_PER_LED];

/// A full strip worth of colors.
///
/// Only two of these exist for the lifetime of the pipeline, they change hands but are never reallocated.
#[derive(Debug, PartialEq, Eq)]
pub struct Frame(Box<[Rgb]>);

impl Frame {
	pub fn new(leds: usize) -> Self {
		Self(vec![[0u8; BYTES_PER_LED]; leds].into_boxed_slice())
	}

	/// Raw bytes in strip order, three per led.
	pub fn as_bytes(&self) -> &[u8] {
		bytemuck::cast_slice(&self.0[..])
	}

	/// Copies `leds` colors out of `payload`, starting at led `offset`.
	///
	/// The caller has already checked that the payload holds at least `leds` triples.
	pub(crate) fn write(&mut self, offset: usize, leds: usize, payload: &[u8]) {
		let colors: &[Rgb] = bytemuck::cast_slice(&payload[..leds * BYTES_PER_LED]);
		self.0[offset..offset + leds].copy_from_slice(colors);
	}
}

impl Deref for Frame {
	type Target = [Rgb];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl DerefMut for Frame {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

const MASK_WORDS: usize = MAX_SEGMENTS / 64;

/// Which segment indices have been applied to the current frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SegmentMask([u64; MASK_WORDS]);

impl SegmentMask {
	/// Marks `index` as received, returns `false` if it already was.
	pub fn insert(&mut self, index: u8) -> bool {
		let (word, bit) = (index as usize / 64, 1u64 << (index % 64));
		let fresh = self.0[word] & bit == 0;
		self.0[word] |= bit;
		fresh
	}

	pub fn contains(&self, index: u8) -> bool {
		self.0[index as usize / 64] & (1u64 << (index % 64)) != 0
	}

	pub fn clear(&mut self) {
		self.0 = [0; MASK_WORDS];
	}
}
