//! DualShock device sessions for OpenPad.
//!
//! This crate ties the pure protocol layer to a live device: it enumerates
//! candidates, opens a transport, drives the read loop (decode → filter →
//! diff → callbacks), retains the current [`Snapshot`], and merges rumble/LED
//! commands into output reports flushed on a bounded cadence.
//!
//! # Example
//!
//! ```no_run
//! use openpad_session::{list_devices, DeviceSession, OpenConfig, SessionCallbacks};
//! use openpad_session::hid::HidapiPort;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let port = HidapiPort::new()?;
//! let devices = list_devices(&port, None)?;
//! let descriptor = devices.first().ok_or("no controller found")?;
//!
//! let config = OpenConfig {
//!     smooth_analog: 10.0,
//!     smooth_motion: 15.0,
//!     joy_deadband: 4.0,
//!     move_deadband: 4.0,
//!     ..OpenConfig::default()
//! };
//! let callbacks = SessionCallbacks::new()
//!     .on_update(|changes, snapshot| {
//!         if changes.contains_button(openpad_hid_dualshock_protocol::Button::Ps) {
//!             println!("PS pressed: {:?}", snapshot.digital);
//!         }
//!     });
//!
//! let mut session = DeviceSession::open(&port, descriptor, config, callbacks)?;
//! session.set_rumble(94, 0)?;
//! session.close();
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]

pub mod callbacks;
pub mod config;
pub mod descriptor;
pub mod diff;
pub mod error;
pub mod hid;
pub mod merger;
pub mod session;

pub use callbacks::SessionCallbacks;
pub use config::OpenConfig;
pub use descriptor::{list_devices, DeviceDescriptor};
pub use diff::{diff, ChangeSet};
pub use error::{OpenError, SessionError};
pub use merger::{OutputMerger, RumbleDelta};
pub use session::{DeviceSession, SessionState};

// The protocol surface applications read values through.
pub use openpad_hid_dualshock_protocol::{
    AnalogState, Axis, Button, Channel, ConnectionKind, DecodeOptions, DigitalState,
    DualShockModel, LedCommand, MotionAxis, MotionState, Snapshot, StatusField, StatusState,
};
