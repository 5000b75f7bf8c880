use std::cell::{Cell, RefCell, RefMut};

use tokio::sync::{Mutex, MutexGuard, Notify};

use crate::{
	config::{Config, Layout},
	frame::Frame,
	handoff::Handoff,
	reassembler::Progress,
	Result,
};

/// State shared by every part of the pipeline, built once at startup.
///
/// The pipeline runs on a single thread, so the context is shared through `Rc` and the
/// bookkeeping that doesn't need exclusion lives in `Cell`s. No `RefCell` borrow is ever held
/// across an await point.
#[derive(Debug)]
pub struct Context {
	config:        Config,
	layout:        Layout,
	transcription: RefCell<Frame>,
	shared:        Mutex<Shared>,
	ready:         Notify,
	epoch:         Cell<u64>,
	session:       Cell<u64>,
}

/// Everything behind the one exclusion region: reassembly progress and the handoff.
#[derive(Debug)]
pub(crate) struct Shared {
	pub progress: Progress,
	pub handoff:  Handoff,
}

impl Context {
	/// Allocates both frame buffers, no other frame memory is allocated after this.
	pub fn new(config: Config) -> Result<Self> {
		let layout = config.layout()?;

		Ok(Self {
			transcription: RefCell::new(Frame::new(layout.leds())),
			shared: Mutex::new(Shared {
				progress: Progress::default(),
				handoff:  Handoff::new(Frame::new(layout.leds())),
			}),
			ready: Notify::new(),
			epoch: Cell::new(0),
			session: Cell::new(0),
			config,
			layout,
		})
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn layout(&self) -> &Layout {
		&self.layout
	}

	/// Whether the renderer currently owns a frame.
	pub async fn is_rendering(&self) -> bool {
		self.lock().await.handoff.is_altering()
	}

	pub(crate) async fn lock(&self) -> MutexGuard<'_, Shared> {
		self.shared.lock().await
	}

	pub(crate) fn transcription(&self) -> RefMut<'_, Frame> {
		self.transcription.borrow_mut()
	}

	pub(crate) fn ready(&self) -> &Notify {
		&self.ready
	}

	pub(crate) fn epoch(&self) -> u64 {
		self.epoch.get()
	}

	/// Invalidates all segment work started before this call.
	pub(crate) fn advance_epoch(&self) -> u64 {
		let epoch = self.epoch.get().wrapping_add(1);
		self.epoch.set(epoch);
		epoch
	}

	pub(crate) fn session(&self) -> u64 {
		self.session.get()
	}

	/// Marks the link as lost, frames completed before this won't be shown.
	pub(crate) fn end_session(&self) {
		self.session.set(self.session.get().wrapping_add(1));
	}
}
