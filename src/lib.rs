//! Receives an LED strip's colors over a lossy packet link and shows them, one whole frame at a
//! time.
//!
//! Frames are too large for a single packet, so the sender splits each one into segments tagged
//! with a frame id and a segment index. [`Reassembler`] puts them back together in a
//! transcription buffer and, once every segment of a frame has arrived, swaps that buffer with
//! the [`Renderer`]'s so the strip is never shown a half written frame. If the renderer is still
//! busy with the previous frame the new one is simply dropped, the receiver never waits.
//!
//! Everything runs on a single thread inside a [`tokio::task::LocalSet`], see [`receiver::run`].

mod config;
mod context;
pub mod driver;
mod error;
mod frame;
mod handoff;
pub mod indicator;
pub mod ingress;
mod reassembler;
pub mod receiver;
mod renderer;
mod segment;
pub mod supervisor;
pub mod transport;

pub use crate::{
	config::{Config, Layout},
	context::Context,
	error::{Error, Result},
	frame::{Frame, Rgb},
	reassembler::{Outcome, Reassembler},
	renderer::Renderer,
	segment::{FrameId, Segment},
};
