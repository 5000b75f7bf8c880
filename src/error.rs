use std::io;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid config: {0}")]
	InvalidConfig(&'static str),

	#[error("io error: {0}")]
	Io(#[from] io::Error),

	#[cfg(feature = "serial")]
	#[error("serial error: {0}")]
	Serial(#[from] tokio_serial::Error),

	#[error("incomplete write to the strip controller")]
	IncompleteWrite,

	#[error("no response from the strip controller")]
	NoResponse,

	#[error("unexpected response from the strip controller: {received} (expected {expected})")]
	UnexpectedResponse { expected: String, received: String },
}
