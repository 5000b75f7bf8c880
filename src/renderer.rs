use std::rc::Rc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{context::Context, driver::StripDriver, handoff::Pending};

/// Shows completed frames on the strip, one at a time.
///
/// Purely reactive: it waits for the reassembler to hand over a frame, drives the strip with it and
/// then gives the buffer back.
pub struct Renderer<D> {
	ctx:    Rc<Context>,
	driver: Rc<Mutex<D>>,
}

impl<D: StripDriver> Renderer<D> {
	pub fn new(ctx: Rc<Context>, driver: Rc<Mutex<D>>) -> Self {
		Self { ctx, driver }
	}

	/// Waits for one handoff and renders it.
	///
	/// Returns `false` if there was nothing to render after all, or if the link was lost after the
	/// frame was completed.
	pub async fn render_next(&self) -> bool {
		self.ctx.ready().notified().await;

		let Some(Pending { frame, session }) = self.ctx.lock().await.handoff.take() else {
			return false;
		};

		let rendered = {
			let mut driver = self.driver.lock().await;

			if session != self.ctx.session() {
				debug!("link was lost since the frame completed, not showing it");
				false
			} else if let Err(e) = driver.render(&frame).await {
				warn!("failed to render frame: {e}");
				false
			} else {
				true
			}
		};

		self.ctx.lock().await.handoff.release(frame);

		rendered
	}

	pub async fn run(self) {
		loop {
			self.render_next().await;
		}
	}
}
