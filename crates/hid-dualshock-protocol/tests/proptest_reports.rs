//! Property-based tests for DualShock input decoding and output encoding.
//!
//! Uses proptest with 500 cases to verify invariants that hold across the full
//! input domain, complementing the unit tests in the crate.

use proptest::prelude::*;
use openpad_hid_dualshock_protocol::{
    decode, encode_output_report, ConnectionKind, DecodeError, DecodeOptions, DualShockModel,
    LedCommand, ReportLayout, RumbleOutput, DS3_OUTPUT_REPORT_LEN, DS4_BT_OUTPUT_REPORT_LEN,
    DS4_USB_OUTPUT_REPORT_LEN, MAX_OUTPUT_REPORT_LEN,
};

fn supported_layouts() -> [ReportLayout; 3] {
    [
        ReportLayout {
            model: DualShockModel::Ds3,
            connection: ConnectionKind::Usb,
        },
        ReportLayout {
            model: DualShockModel::Ds4,
            connection: ConnectionKind::Usb,
        },
        ReportLayout {
            model: DualShockModel::Ds4,
            connection: ConnectionKind::Bluetooth,
        },
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // ── Decoding: never panics, rejects every wrong length ────────────────────

    /// Decoding arbitrary bytes against any supported layout must never panic,
    /// and any length other than the layout's wire size must be rejected as
    /// malformed.
    #[test]
    fn prop_decode_never_panics_and_checks_length(
        data in proptest::collection::vec(proptest::num::u8::ANY, 0..=96usize),
        motion: bool,
        status: bool,
    ) {
        let options = DecodeOptions { motion, status };
        for layout in supported_layouts() {
            let result = decode(layout, &data, options);
            if data.len() != layout.input_report_len() {
                prop_assert!(
                    matches!(result, Err(DecodeError::MalformedReport { .. })),
                    "length {} accepted for {:?}",
                    data.len(),
                    layout
                );
            }
        }
    }

    /// A correctly sized report with the right leading ID always decodes.
    #[test]
    fn prop_well_formed_reports_decode(
        body in proptest::collection::vec(proptest::num::u8::ANY, 96usize),
        motion: bool,
        status: bool,
    ) {
        let options = DecodeOptions { motion, status };
        for layout in supported_layouts() {
            let mut data = body[..layout.input_report_len()].to_vec();
            data[0] = layout.input_report_id();
            prop_assert!(decode(layout, &data, options).is_ok());
        }
    }

    /// Motion and status stay at their defaults whenever decoding is disabled,
    /// regardless of the raw bytes.
    #[test]
    fn prop_disabled_sections_stay_default(
        body in proptest::collection::vec(proptest::num::u8::ANY, 96usize),
    ) {
        for layout in supported_layouts() {
            let mut data = body[..layout.input_report_len()].to_vec();
            data[0] = layout.input_report_id();
            let snap = decode(layout, &data, DecodeOptions::default()).unwrap();
            let reference = decode(layout, &data, DecodeOptions { motion: true, status: true }).unwrap();
            prop_assert_eq!(snap.motion, Default::default());
            prop_assert_eq!(snap.status, Default::default());
            // The enabled sections never disturb digital/analog decoding.
            prop_assert_eq!(snap.digital, reference.digital);
            prop_assert_eq!(snap.analog, reference.analog);
        }
    }

    // ── Encoding: wire sizes and report IDs are fixed ─────────────────────────

    /// Output reports always have the layout's exact wire size and report ID.
    #[test]
    fn prop_encode_fixed_framing(
        heavy: u8, light: u8, heavy_duration: u8, light_duration: u8,
        r: u8, g: u8, b: u8,
    ) {
        let rumble = RumbleOutput { heavy, light, heavy_duration, light_duration };
        let led = Some(LedCommand::Rgb { r, g, b });
        let mut out = [0u8; MAX_OUTPUT_REPORT_LEN];
        for layout in supported_layouts() {
            let len = encode_output_report(layout, rumble, led, &mut out);
            match (layout.model, layout.connection) {
                (DualShockModel::Ds3, _) => {
                    prop_assert_eq!(len, DS3_OUTPUT_REPORT_LEN);
                    prop_assert_eq!(out[0], 0x01);
                }
                (DualShockModel::Ds4, ConnectionKind::Usb) => {
                    prop_assert_eq!(len, DS4_USB_OUTPUT_REPORT_LEN);
                    prop_assert_eq!(out[0], 0x05);
                }
                (DualShockModel::Ds4, ConnectionKind::Bluetooth) => {
                    prop_assert_eq!(len, DS4_BT_OUTPUT_REPORT_LEN);
                    prop_assert_eq!(out[0], 0x11);
                }
                (DualShockModel::Unknown, _) => unreachable!(),
            }
        }
    }

    /// The heavy motor level always lands on the wire verbatim; the DS3 light
    /// motor degrades to on/off.
    #[test]
    fn prop_encode_motor_levels(heavy: u8, light: u8) {
        let rumble = RumbleOutput { heavy, light, heavy_duration: 0xFF, light_duration: 0xFF };
        let mut out = [0u8; MAX_OUTPUT_REPORT_LEN];

        let ds3 = ReportLayout { model: DualShockModel::Ds3, connection: ConnectionKind::Usb };
        encode_output_report(ds3, rumble, None, &mut out);
        prop_assert_eq!(out[4], heavy);
        prop_assert_eq!(out[2], u8::from(light > 0));

        let ds4 = ReportLayout { model: DualShockModel::Ds4, connection: ConnectionKind::Usb };
        encode_output_report(ds4, rumble, None, &mut out);
        prop_assert_eq!(out[5], heavy);
        prop_assert_eq!(out[4], light);
    }
}
