#[cfg(feature = "timings")]
use std::time::Instant;
use std::{io, time::Duration};

use ledlink_shared::{
	BYTES_PER_LED,
	DEVICE_ERROR_MESSAGE,
	DEVICE_INIT_MESSAGE,
	DEVICE_MESSAGE_TYPE_LEN,
	DEVICE_OK_MESSAGE,
	DEVICE_PARTIAL_MESSAGE,
	DEVICE_PRODUCT_NAME,
	MAX_LEDS_PER_STRIP,
	SET_LEDS_MESSAGE,
	SET_STRIPS_MESSAGE,
	UPDATE_MESSAGE,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{SerialPort, SerialPortBuilderExt, SerialPortType, SerialStream};
#[cfg(feature = "timings")]
use tracing::debug;
use tracing::info;

use super::StripDriver;
use crate::{frame::Rgb, Error, Result};

const BAUD_RATE: u32 = 921_600;

/// Pushes frames to a Serial WS2812 controller over USB serial, as a single strip.
pub struct SerialStrip {
	leds:  usize,
	port:  SerialStream,
	/// All zeroes, sent to switch the strip off.
	blank: Box<[u8]>,

	initialized: bool,
}

impl SerialStrip {
	/// Opens `serial_device` for a strip of `leds` leds.
	pub fn new(serial_device: String, leds: usize) -> Result<Self> {
		if leds == 0 || leds > MAX_LEDS_PER_STRIP {
			return Err(Error::InvalidConfig("the serial controller drives 1 to 512 leds per strip"));
		}

		let builder = tokio_serial::new(serial_device, BAUD_RATE).timeout(Duration::from_millis(50));
		let port = builder.open_native_async()?;

		Ok(Self {
			leds,
			port,
			blank: vec![0u8; leds * BYTES_PER_LED].into_boxed_slice(),

			initialized: false,
		})
	}

	/// Finds the first serial device with product name "Serial WS2812" and opens it.
	///
	/// If more than one device is connected the returned device will be the first the OS lists.
	pub fn find(leds: usize) -> Result<Option<Self>> {
		let ports = tokio_serial::available_ports()?;
		let mut serial_device = None;

		for p in ports {
			if let SerialPortType::UsbPort(usb) = p.port_type {
				if usb.product == Some(DEVICE_PRODUCT_NAME.to_string())
					|| usb.product == Some(DEVICE_PRODUCT_NAME.replace(' ', "_"))
				{
					serial_device = Some(p.port_name);
					break;
				}
			}
		}

		let Some(serial_device) = serial_device else {
			return Ok(None);
		};

		Ok(Some(Self::new(serial_device, leds)?))
	}

	async fn reset_to_command(&mut self) -> Result<()> {
		let mut buffer = [0u8; DEVICE_MESSAGE_TYPE_LEN * 4];

		let mut has_printed = false;
		let mut counter = 0;

		info!("trying to reset strip controller to start of command");
		self.port.set_timeout(Duration::from_millis(10))?;

		loop {
			let read_bytes = match self.port.read(&mut buffer).await {
				Ok(n) => n,
				Err(e) if e.kind() == io::ErrorKind::TimedOut => {
					if !has_printed {
						info!("read timeout, writing null bytes to force a response");
						has_printed = true;
					}

					counter += 1;
					if counter < 8 {
						self.port.write_all(&[0u8]).await?;
					} else {
						self.port.write_all(&[0u8; 32]).await?;
					}

					continue;
				}
				Err(e) => return Err(e.into()),
			};

			// more than one byte means we're answering the 32 byte burst, start over
			if read_bytes > 1 {
				counter = 0;
				continue;
			}

			if &buffer[..1] == DEVICE_INIT_MESSAGE || &buffer[..1] == DEVICE_ERROR_MESSAGE {
				break;
			}
		}

		self.port.set_timeout(Duration::from_millis(50))?;
		info!("reset successful");

		Ok(())
	}

	async fn configure(&mut self) -> Result<()> {
		if !self.initialized {
			self.reset_to_command().await?;
		}

		self.send_command(SET_STRIPS_MESSAGE, &u32::to_le_bytes(1)).await?;
		self.send_command(SET_LEDS_MESSAGE, &u32::to_le_bytes(self.leds as u32))
			.await?;
		self.initialized = true;

		Ok(())
	}

	async fn send_leds(&mut self, leds: &[u8]) -> Result<()> {
		if !self.initialized {
			self.configure().await?;
		}

		self.send_command(UPDATE_MESSAGE, leds).await
	}

	async fn send_command(&mut self, command: &[u8], data: &[u8]) -> Result<()> {
		let mut output = [0u8; DEVICE_MESSAGE_TYPE_LEN];

		#[cfg(feature = "timings")]
		let command_start = Instant::now();

		self.expect_reply(command, &mut output, DEVICE_PARTIAL_MESSAGE).await?;

		#[cfg(feature = "timings")]
		let data_start = Instant::now();

		self.expect_reply(data, &mut output, DEVICE_OK_MESSAGE).await?;

		#[cfg(feature = "timings")]
		debug!(
			command = ?(data_start - command_start),
			data = ?data_start.elapsed(),
			"strip controller round trip"
		);

		Ok(())
	}

	async fn expect_reply(
		&mut self,
		message: &[u8],
		output: &mut [u8; DEVICE_MESSAGE_TYPE_LEN],
		expected: &[u8; DEVICE_MESSAGE_TYPE_LEN],
	) -> Result<()> {
		if self.serial_write(message).await? != message.len() {
			return Err(Error::IncompleteWrite);
		}
		if self.port.read(output).await? != 1 {
			return Err(Error::NoResponse);
		}
		if output != expected {
			// the controller lost track of where we are, resync on the next command
			self.initialized = false;
			return Err(Error::UnexpectedResponse {
				expected: String::from_utf8_lossy(expected).to_string(),
				received: format!("{:?}", output),
			});
		}

		Ok(())
	}

	async fn serial_write(&mut self, buffer: &[u8]) -> Result<usize> {
		self.port.write_all(buffer).await?;
		Ok(buffer.len())
	}
}

impl StripDriver for SerialStrip {
	async fn render(&mut self, pixels: &[Rgb]) -> Result<()> {
		if pixels.len() != self.leds {
			return Err(Error::InvalidConfig("frame size doesn't match the strip"));
		}

		self.send_leds(bytemuck::cast_slice(pixels)).await
	}

	async fn clear(&mut self) -> Result<()> {
		let blank = std::mem::take(&mut self.blank);
		let result = self.send_leds(&blank).await;
		self.blank = blank;
		result
	}
}
