//! Session-level error taxonomy.
//!
//! - [`OpenError`]: fatal to the open attempt, surfaced synchronously.
//! - [`SessionError::Decode`]: recovered locally; the report is dropped and
//!   the session continues.
//! - [`SessionError::Transport`]: unrecoverable mid-session I/O failure; the
//!   session faults and must be closed by the caller.
//! - [`SessionError::Closed`]: a command arrived after `close()`; rejected
//!   without touching the transport.
//!
//! Disconnection is deliberately *not* an error: it has its own callback.

use openpad_hid_common::HidTransportError;
use openpad_hid_dualshock_protocol::{ConnectionKind, DecodeError, DualShockModel};
use thiserror::Error;

/// Failures opening a device session.
#[derive(Debug, Clone, Error)]
pub enum OpenError {
    /// The transport could not deliver the device.
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    /// No known report layout for this model/transport combination.
    #[error("unsupported device type: {model:?} over {connection:?}")]
    UnsupportedType {
        /// Controller generation from the descriptor.
        model: DualShockModel,
        /// Transport from the descriptor.
        connection: ConnectionKind,
    },
}

/// Failures reported by a running session, via the error callback or the
/// write surface's return value.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// A report failed to decode; the session keeps running.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Transport I/O failed; the session is faulted.
    #[error("transport error: {0}")]
    Transport(#[from] HidTransportError),

    /// The session was closed; the command was rejected without touching
    /// the transport.
    #[error("session closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_error_display() {
        let err = OpenError::UnsupportedType {
            model: DualShockModel::Ds3,
            connection: ConnectionKind::Bluetooth,
        };
        let msg = err.to_string();
        assert!(msg.contains("Ds3"));
        assert!(msg.contains("Bluetooth"));
    }

    #[test]
    fn test_session_error_wraps_layers() {
        let err: SessionError = HidTransportError::Disconnected.into();
        assert!(matches!(err, SessionError::Transport(_)));
        let _: &dyn std::error::Error = &err;
    }
}
