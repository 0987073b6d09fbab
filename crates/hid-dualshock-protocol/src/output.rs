//! DualShock HID output report encoding (rumble + LED).
//!
//! All functions are pure and allocation-free.
//!
//! # Protocol notes
//!
//! The DualShock 3 output report (ID 0x01, 48 payload bytes) drives the two
//! rumble motors with per-motor duration bytes and the four player LEDs with
//! a bitmask at payload offset 9, followed by four 5-byte LED timing blocks.
//! The right (light) motor is on/off only; the left (heavy) motor takes an
//! 8-bit power level.
//!
//! The DualShock 4 USB output report (ID 0x05, 32 bytes) carries a feature
//! flag byte, weak/strong motor levels, and the RGB lightbar with flash
//! timing. Over Bluetooth the same payload sits inside report 0x11 (78 bytes)
//! and the last four bytes are a CRC-32 over `0xA2` plus the first 74 bytes,
//! little-endian; the controller silently drops reports with a bad trailer.

#![deny(static_mut_refs)]

use crate::ids::report_ids;
use crate::types::{ConnectionKind, DualShockModel, ReportLayout};

/// Wire size of a DualShock 3 output report, including the report ID.
pub const DS3_OUTPUT_REPORT_LEN: usize = 49;

/// Wire size of a DualShock 4 USB output report.
pub const DS4_USB_OUTPUT_REPORT_LEN: usize = 32;

/// Wire size of a DualShock 4 Bluetooth output report (CRC-trailed).
pub const DS4_BT_OUTPUT_REPORT_LEN: usize = 78;

/// Largest output report across supported layouts; size your buffers to this.
pub const MAX_OUTPUT_REPORT_LEN: usize = DS4_BT_OUTPUT_REPORT_LEN;

/// Stock DualShock 3 LED timing block (always-on, no blink).
const DS3_LED_BLOCK: [u8; 5] = [0xFF, 0x27, 0x10, 0x00, 0x32];

/// LED command. Which variant a device honors depends on its hardware:
/// RGB on the DualShock 4, a 4-LED pattern index on the DualShock 3.
/// The mismatched variant is accepted and encodes as "leave dark" rather
/// than erroring, matching the capability gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedCommand {
    /// Lightbar color (DualShock 4).
    Rgb {
        /// Red component.
        r: u8,
        /// Green component.
        g: u8,
        /// Blue component.
        b: u8,
    },
    /// Player LED pattern index 0–15 (DualShock 3); maps onto the four LEDs
    /// as a bitmask.
    Pattern(u8),
}

/// Rumble levels and durations as flushed to the wire.
///
/// Durations are in device ticks, 0xFF meaning "until changed". The
/// DualShock 4 has no duration field; durations are accepted and ignored
/// there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RumbleOutput {
    /// Heavy (left, slow) motor power.
    pub heavy: u8,
    /// Light (right, fast) motor power.
    pub light: u8,
    /// Heavy motor duration.
    pub heavy_duration: u8,
    /// Light motor duration.
    pub light_duration: u8,
}

/// Encode one output report for the given layout into `out`.
///
/// Returns the number of bytes to hand to the transport. `led` being `None`
/// leaves the LED section dark (DS3) or the lightbar section zeroed with the
/// LED feature flag still set (DS4), so a rumble-only flush never blanks a
/// previously merged LED state held by the caller.
pub fn encode_output_report(
    layout: ReportLayout,
    rumble: RumbleOutput,
    led: Option<LedCommand>,
    out: &mut [u8; MAX_OUTPUT_REPORT_LEN],
) -> usize {
    out.fill(0);
    match (layout.model, layout.connection) {
        (DualShockModel::Ds3, _) => encode_ds3(rumble, led, out),
        (DualShockModel::Ds4, ConnectionKind::Usb) => encode_ds4_usb(rumble, led, out),
        (DualShockModel::Ds4, ConnectionKind::Bluetooth) => encode_ds4_bt(rumble, led, out),
        (DualShockModel::Unknown, _) => 0,
    }
}

fn encode_ds3(
    rumble: RumbleOutput,
    led: Option<LedCommand>,
    out: &mut [u8; MAX_OUTPUT_REPORT_LEN],
) -> usize {
    out[0] = report_ids::DS3_OUTPUT;
    out[1] = rumble.light_duration;
    out[2] = u8::from(rumble.light > 0); // right motor is on/off only
    out[3] = rumble.heavy_duration;
    out[4] = rumble.heavy;
    if let Some(LedCommand::Pattern(pattern)) = led {
        // LED bitmask: bit 1 = player LED 1 … bit 4 = player LED 4.
        out[10] = (pattern & 0x0F) << 1;
    }
    for slot in 0..4 {
        let base = 11 + slot * DS3_LED_BLOCK.len();
        out[base..base + DS3_LED_BLOCK.len()].copy_from_slice(&DS3_LED_BLOCK);
    }
    DS3_OUTPUT_REPORT_LEN
}

fn encode_ds4_usb(
    rumble: RumbleOutput,
    led: Option<LedCommand>,
    out: &mut [u8; MAX_OUTPUT_REPORT_LEN],
) -> usize {
    out[0] = report_ids::DS4_USB_OUTPUT;
    out[1] = 0x07; // enable rumble + lightbar + flash
    out[4] = rumble.light;
    out[5] = rumble.heavy;
    if let Some(LedCommand::Rgb { r, g, b }) = led {
        out[6] = r;
        out[7] = g;
        out[8] = b;
    }
    DS4_USB_OUTPUT_REPORT_LEN
}

fn encode_ds4_bt(
    rumble: RumbleOutput,
    led: Option<LedCommand>,
    out: &mut [u8; MAX_OUTPUT_REPORT_LEN],
) -> usize {
    out[0] = report_ids::DS4_BT_OUTPUT;
    out[1] = 0x80; // HID + CRC framing
    out[3] = 0x07; // enable rumble + lightbar + flash
    out[6] = rumble.light;
    out[7] = rumble.heavy;
    if let Some(LedCommand::Rgb { r, g, b }) = led {
        out[8] = r;
        out[9] = g;
        out[10] = b;
    }
    let crc = bt_output_crc(&out[..DS4_BT_OUTPUT_REPORT_LEN - 4]);
    out[DS4_BT_OUTPUT_REPORT_LEN - 4..DS4_BT_OUTPUT_REPORT_LEN]
        .copy_from_slice(&crc.to_le_bytes());
    DS4_BT_OUTPUT_REPORT_LEN
}

/// CRC-32 over the Bluetooth HID output prefix byte (0xA2) plus the report
/// body, as the DualShock 4 firmware validates it.
fn bt_output_crc(body: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&[0xA2]);
    hasher.update(body);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(model: DualShockModel, connection: ConnectionKind) -> ReportLayout {
        ReportLayout { model, connection }
    }

    #[test]
    fn test_ds3_rumble_encoding() -> Result<(), Box<dyn std::error::Error>> {
        let mut out = [0u8; MAX_OUTPUT_REPORT_LEN];
        let rumble = RumbleOutput {
            heavy: 94,
            light: 200,
            heavy_duration: 0xFF,
            light_duration: 5,
        };
        let len = encode_output_report(
            layout(DualShockModel::Ds3, ConnectionKind::Usb),
            rumble,
            None,
            &mut out,
        );
        assert_eq!(len, DS3_OUTPUT_REPORT_LEN);
        assert_eq!(out[0], 0x01, "report ID");
        assert_eq!(out[1], 5, "light motor duration");
        assert_eq!(out[2], 1, "light motor is on/off");
        assert_eq!(out[3], 0xFF, "heavy motor duration");
        assert_eq!(out[4], 94, "heavy motor power");
        assert_eq!(out[10], 0, "no LED command leaves LEDs dark");
        Ok(())
    }

    #[test]
    fn test_ds3_led_pattern_bitmask() -> Result<(), Box<dyn std::error::Error>> {
        let mut out = [0u8; MAX_OUTPUT_REPORT_LEN];
        encode_output_report(
            layout(DualShockModel::Ds3, ConnectionKind::Usb),
            RumbleOutput::default(),
            Some(LedCommand::Pattern(0b0101)),
            &mut out,
        );
        assert_eq!(out[10], 0b01010, "pattern shifts into bits 1–4");
        assert_eq!(&out[11..16], &DS3_LED_BLOCK, "LED 4 timing block");
        assert_eq!(&out[26..31], &DS3_LED_BLOCK, "LED 1 timing block");
        Ok(())
    }

    #[test]
    fn test_ds3_led_pattern_masks_high_bits() -> Result<(), Box<dyn std::error::Error>> {
        let mut out = [0u8; MAX_OUTPUT_REPORT_LEN];
        encode_output_report(
            layout(DualShockModel::Ds3, ConnectionKind::Usb),
            RumbleOutput::default(),
            Some(LedCommand::Pattern(0xFF)),
            &mut out,
        );
        assert_eq!(out[10], 0x1E, "pattern index must be masked to 4 bits");
        Ok(())
    }

    #[test]
    fn test_ds3_ignores_rgb_command() -> Result<(), Box<dyn std::error::Error>> {
        let mut out = [0u8; MAX_OUTPUT_REPORT_LEN];
        let len = encode_output_report(
            layout(DualShockModel::Ds3, ConnectionKind::Usb),
            RumbleOutput::default(),
            Some(LedCommand::Rgb { r: 1, g: 2, b: 3 }),
            &mut out,
        );
        assert_eq!(len, DS3_OUTPUT_REPORT_LEN, "unsupported LED kind is a no-op, not an error");
        assert_eq!(out[10], 0, "RGB on a pattern device leaves LEDs dark");
        Ok(())
    }

    #[test]
    fn test_ds4_usb_encoding() -> Result<(), Box<dyn std::error::Error>> {
        let mut out = [0u8; MAX_OUTPUT_REPORT_LEN];
        let rumble = RumbleOutput {
            heavy: 0xAA,
            light: 0x55,
            heavy_duration: 0xFF,
            light_duration: 0xFF,
        };
        let len = encode_output_report(
            layout(DualShockModel::Ds4, ConnectionKind::Usb),
            rumble,
            Some(LedCommand::Rgb { r: 10, g: 20, b: 30 }),
            &mut out,
        );
        assert_eq!(len, DS4_USB_OUTPUT_REPORT_LEN);
        assert_eq!(out[0], 0x05, "report ID");
        assert_eq!(out[1], 0x07, "feature flags");
        assert_eq!(out[4], 0x55, "light motor");
        assert_eq!(out[5], 0xAA, "heavy motor");
        assert_eq!(&out[6..9], &[10, 20, 30], "lightbar RGB");
        Ok(())
    }

    #[test]
    fn test_ds4_ignores_pattern_command() -> Result<(), Box<dyn std::error::Error>> {
        let mut out = [0u8; MAX_OUTPUT_REPORT_LEN];
        encode_output_report(
            layout(DualShockModel::Ds4, ConnectionKind::Usb),
            RumbleOutput::default(),
            Some(LedCommand::Pattern(7)),
            &mut out,
        );
        assert_eq!(&out[6..9], &[0, 0, 0], "pattern on an RGB device leaves the bar dark");
        Ok(())
    }

    #[test]
    fn test_ds4_bt_crc_trailer() -> Result<(), Box<dyn std::error::Error>> {
        let mut out = [0u8; MAX_OUTPUT_REPORT_LEN];
        let len = encode_output_report(
            layout(DualShockModel::Ds4, ConnectionKind::Bluetooth),
            RumbleOutput {
                heavy: 1,
                light: 2,
                heavy_duration: 0xFF,
                light_duration: 0xFF,
            },
            Some(LedCommand::Rgb { r: 3, g: 4, b: 5 }),
            &mut out,
        );
        assert_eq!(len, DS4_BT_OUTPUT_REPORT_LEN);
        assert_eq!(out[0], 0x11);
        assert_eq!(out[6], 2, "light motor at BT offset");
        assert_eq!(out[7], 1, "heavy motor at BT offset");
        assert_eq!(&out[8..11], &[3, 4, 5]);

        let expected = bt_output_crc(&out[..74]);
        let trailer = u32::from_le_bytes([out[74], out[75], out[76], out[77]]);
        assert_eq!(trailer, expected, "CRC must cover 0xA2 + first 74 bytes");
        Ok(())
    }
}
