use std::rc::Rc;

use tokio::{sync::Mutex, task};
use tracing::{info, trace};

use crate::{
	context::Context,
	driver::StripDriver,
	indicator::Indicator,
	ingress::{Ingress, PacketIngress},
	reassembler::Reassembler,
	renderer::Renderer,
	supervisor::ConnectionSupervisor,
	transport::Transport,
	Config,
	Result,
};

/// Runs the whole receive pipeline until the transport closes.
///
/// The renderer and the status blinker run as local tasks next to the receive loop, so this must
/// be polled from within a [`tokio::task::LocalSet`]. Only transport errors end the pipeline early,
/// everything that goes wrong with individual packets or frames is absorbed.
pub async fn run<T, D, I>(config: Config, transport: T, driver: D, indicator: I) -> Result<()>
where
	T: Transport,
	D: StripDriver + 'static,
	I: Indicator + 'static,
{
	let ctx = Rc::new(Context::new(config)?);
	let driver = Rc::new(Mutex::new(driver));

	let renderer = task::spawn_local(Renderer::new(ctx.clone(), driver.clone()).run());
	let reassembler = Reassembler::new(ctx.clone());
	let mut supervisor = ConnectionSupervisor::new(ctx.clone(), indicator);
	let mut ingress = PacketIngress::new(transport, ctx.layout());

	info!(
		leds = ctx.layout().leds(),
		segments = ctx.layout().segments(),
		"waiting for a connection"
	);
	supervisor.start();

	let result = loop {
		match ingress.next().await {
			Ok(Some(Ingress::Segment(segment))) => {
				let outcome = reassembler.accept(segment).await;
				trace!(frame = %segment.frame, index = segment.index, ?outcome);
			}
			Ok(Some(Ingress::Connected)) => supervisor.connected(),
			Ok(Some(Ingress::Disconnected)) => supervisor.disconnected(&reassembler, &*driver).await,
			Ok(None) => break Ok(()),
			Err(e) => break Err(e),
		}
	};

	info!("link closed, stopping");
	supervisor.shutdown();
	renderer.abort();

	result
}
