use tracing::info;

/// The link status led.
pub trait Indicator {
	fn set(&mut self, on: bool);

	fn toggle(&mut self);
}

/// An indicator that only reports its state through the log.
#[derive(Debug, Default)]
pub struct LogIndicator {
	on: bool,
}

impl LogIndicator {
	pub fn is_on(&self) -> bool {
		self.on
	}
}

impl Indicator for LogIndicator {
	fn set(&mut self, on: bool) {
		if self.on != on {
			info!(on, "status led");
		}
		self.on = on;
	}

	fn toggle(&mut self) {
		self.on = !self.on;
	}
}
