use std::time::Duration;

use color_eyre::eyre::{eyre, Result};
use ledlink::{driver::SerialStrip, indicator::LogIndicator, receiver, transport::UdpTransport, Config};
use tokio::task::LocalSet;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let config = Config::default();

	let strip = SerialStrip::find(config.leds)?.ok_or_else(|| eyre!("no serial ws2812 device found"))?;
	let transport = UdpTransport::bind("0.0.0.0:7890", Duration::from_secs(2)).await?;
	tracing::info!("listening on {}", transport.local_addr()?);

	LocalSet::new()
		.run_until(receiver::run(config, transport, strip, LogIndicator::default()))
		.await?;

	Ok(())
}
