#![no_std]

/// Every segment starts with `[frame id, segment index]`.
pub const SEGMENT_HEADER_LEN: usize = 2;
pub const FRAME_ID_OFFSET: usize = 0;
pub const SEGMENT_INDEX_OFFSET: usize = 1;

/// Frame ids cycle through `0..FRAME_ID_MODULUS`.
pub const FRAME_ID_MODULUS: u8 = 255;

/// The segment index is a single byte, so a frame can't be split any further than this.
pub const MAX_SEGMENTS: usize = u8::MAX as usize + 1;

pub const BYTES_PER_LED: usize = 3;

/// Largest write the BLE UART characteristic accepts.
pub const DEFAULT_MAX_SEGMENT_BYTES: usize = 512;
pub const DEFAULT_NUM_LEDS: usize = 300;

/// Toggle period of the status led while nobody is connected.
pub const DEFAULT_BLINK_INTERVAL_MS: u64 = 1000;

// serial ws2812 firmware protocol, used to push rendered frames to the strip

pub const MESSAGE_TYPE_LEN: usize = 8;
pub const MESSAGE_NUM_LEN: usize = 4;

pub const UPDATE_MESSAGE: &[u8; MESSAGE_TYPE_LEN] = b"update\0\0";
pub const SET_STRIPS_MESSAGE: &[u8; MESSAGE_TYPE_LEN] = b"strips\0\0";
pub const SET_LEDS_MESSAGE: &[u8; MESSAGE_TYPE_LEN] = b"leds\0\0\0\0";

/// The firmware won't take more than this per strip.
pub const MAX_LEDS_PER_STRIP: usize = 512;

pub const DEVICE_MESSAGE_TYPE_LEN: usize = 1;

pub const DEVICE_INIT_MESSAGE: &[u8; DEVICE_MESSAGE_TYPE_LEN] = b"i";
pub const DEVICE_ERROR_MESSAGE: &[u8; DEVICE_MESSAGE_TYPE_LEN] = b"e";
pub const DEVICE_PARTIAL_MESSAGE: &[u8; DEVICE_MESSAGE_TYPE_LEN] = b"p";
pub const DEVICE_OK_MESSAGE: &[u8; DEVICE_MESSAGE_TYPE_LEN] = b"k";

pub const DEVICE_PRODUCT_NAME: &str = "Serial WS2812";
