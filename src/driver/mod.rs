//! The output side: whatever turns a finished frame into light.

#[cfg(feature = "serial")]
mod serial;

#[cfg(feature = "serial")]
pub use serial::SerialStrip;

use crate::{frame::Rgb, Result};

/// Drives the physical strip.
///
/// Calls are expected to finish in bounded time, the renderer holds on to its frame until they do.
#[allow(async_fn_in_trait)]
pub trait StripDriver {
	/// Shows `pixels`, one color per led in strip order.
	async fn render(&mut self, pixels: &[Rgb]) -> Result<()>;

	/// Turns every led off.
	async fn clear(&mut self) -> Result<()>;
}
