//! Common HID plumbing for OpenPad
//!
//! This crate provides the transport traits the session layer drives, the
//! device-info type enumeration produces, and a mock transport so everything
//! above raw I/O can be tested without hardware.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod device_info;
pub mod transport;

pub use device_info::*;
pub use transport::*;

use thiserror::Error;

/// Transport-level failures. These are distinct from protocol decode errors:
/// a transport error concerns moving bytes, never their meaning.
#[derive(Error, Debug, Clone)]
pub enum HidTransportError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Failed to open device: {0}")]
    OpenFailed(String),

    #[error("Failed to read from device: {0}")]
    ReadError(String),

    #[error("Failed to write to device: {0}")]
    WriteError(String),

    #[error("Device disconnected")]
    Disconnected,

    #[error("HID backend error: {0}")]
    Backend(String),
}

pub type HidTransportResult<T> = Result<T, HidTransportError>;
