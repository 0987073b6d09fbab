//! Sony DualShock HID protocol: input report decoding and output report encoding.
//!
//! This crate is intentionally I/O-free and allocation-free on hot paths.
//! It provides pure functions and types that can be tested without hardware.
//!
//! Supported report layouts (bit-exact, part of the compatibility contract):
//! - DualShock 3 over USB (input report ID 0x01, 49 bytes)
//! - DualShock 4 over USB (input report ID 0x01, 64 bytes)
//! - DualShock 4 over Bluetooth (input report ID 0x11, 78 bytes, fields at +2)

#![deny(static_mut_refs)]

pub mod channel;
pub mod ids;
pub mod input;
pub mod output;
pub mod types;

pub use channel::{Axis, Button, Channel, MotionAxis, StatusField};
pub use ids::{product_ids, SONY_VENDOR_ID};
pub use input::{
    decode, AnalogState, DecodeError, DecodeOptions, DigitalState, MotionState, Snapshot,
    StatusState,
};
pub use output::{
    encode_output_report, LedCommand, RumbleOutput, DS3_OUTPUT_REPORT_LEN,
    DS4_BT_OUTPUT_REPORT_LEN, DS4_USB_OUTPUT_REPORT_LEN, MAX_OUTPUT_REPORT_LEN,
};
pub use types::{is_gamepad_product, ConnectionKind, DualShockModel, ReportLayout};
