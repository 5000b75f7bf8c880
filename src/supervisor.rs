use std::{cell::RefCell, rc::Rc, time::Duration};

use tokio::{sync::Mutex, task, task::JoinHandle, time};
use tracing::{info, warn};

use crate::{context::Context, driver::StripDriver, indicator::Indicator, reassembler::Reassembler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
	Advertising,
	Connected,
}

/// Follows the link through connects and disconnects.
///
/// While nobody is connected the indicator blinks, once connected it stays on. Losing the link
/// throws away whatever frame was being assembled and switches the strip off.
///
/// The blinker is a local task, so this has to be used from within a [`tokio::task::LocalSet`].
pub struct ConnectionSupervisor<I> {
	ctx:       Rc<Context>,
	indicator: Rc<RefCell<I>>,
	blinker:   Option<JoinHandle<()>>,
	state:     LinkState,
}

impl<I: Indicator + 'static> ConnectionSupervisor<I> {
	pub fn new(ctx: Rc<Context>, indicator: I) -> Self {
		Self {
			ctx,
			indicator: Rc::new(RefCell::new(indicator)),
			blinker: None,
			state: LinkState::Advertising,
		}
	}

	pub fn state(&self) -> LinkState {
		self.state
	}

	/// Starts advertising.
	pub fn start(&mut self) {
		self.state = LinkState::Advertising;
		self.start_blinking();
	}

	pub fn connected(&mut self) {
		if self.state == LinkState::Connected {
			return;
		}

		info!("connected");
		self.stop_blinking();
		self.indicator.borrow_mut().set(true);
		self.state = LinkState::Connected;
	}

	pub async fn disconnected<D: StripDriver>(&mut self, reassembler: &Reassembler, driver: &Mutex<D>) {
		if self.state == LinkState::Advertising {
			return;
		}

		info!("disconnected");
		self.ctx.end_session();
		reassembler.reset().await;

		if let Err(e) = driver.lock().await.clear().await {
			warn!("failed to switch the strip off: {e}");
		}

		self.start();
	}

	pub fn shutdown(&mut self) {
		self.stop_blinking();
	}

	fn start_blinking(&mut self) {
		self.stop_blinking();

		let indicator = self.indicator.clone();
		let period = self.ctx.config().blink_interval;
		self.blinker = Some(task::spawn_local(blink(indicator, period)));
	}

	fn stop_blinking(&mut self) {
		if let Some(blinker) = self.blinker.take() {
			blinker.abort();
		}
	}
}

impl<I> Drop for ConnectionSupervisor<I> {
	fn drop(&mut self) {
		if let Some(blinker) = self.blinker.take() {
			blinker.abort();
		}
	}
}

async fn blink<I: Indicator>(indicator: Rc<RefCell<I>>, period: Duration) {
	loop {
		time::sleep(period).await;
		indicator.borrow_mut().toggle();
	}
}
