//! DualShock device model classification and report layout selection.

#![deny(static_mut_refs)]

use crate::ids::{product_ids, report_ids};

/// DualShock controller generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DualShockModel {
    /// DualShock 3 / Sixaxis (four discrete LEDs, pressure-sensitive buttons).
    Ds3,
    /// DualShock 4 (RGB lightbar, touchpad, 6-axis IMU).
    Ds4,
    /// Unknown or future DualShock device.
    Unknown,
}

impl DualShockModel {
    /// Classify a device by its product ID.
    pub fn from_product_id(product_id: u16) -> Self {
        match product_id {
            product_ids::DUALSHOCK_3 => Self::Ds3,
            product_ids::DUALSHOCK_4
            | product_ids::DUALSHOCK_4_SLIM
            | product_ids::DUALSHOCK_4_DONGLE => Self::Ds4,
            _ => Self::Unknown,
        }
    }

    /// Whether this model carries an RGB lightbar (as opposed to discrete LEDs).
    pub fn has_rgb_led(self) -> bool {
        matches!(self, Self::Ds4)
    }

    /// Whether this model reports a full 6-axis IMU (gyro X/Y/Z + accel X/Y/Z).
    ///
    /// The DualShock 3 reports a 3-axis accelerometer plus a single yaw gyro;
    /// the missing gyro axes decode as zero.
    pub fn has_full_imu(self) -> bool {
        matches!(self, Self::Ds4)
    }

    /// Short type tag as used in device descriptors (`"ds3"`, `"ds4"`).
    pub fn tag(self) -> &'static str {
        match self {
            Self::Ds3 => "ds3",
            Self::Ds4 => "ds4",
            Self::Unknown => "unknown",
        }
    }
}

/// Transport the controller is connected over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionKind {
    /// Wired USB connection.
    #[default]
    Usb,
    /// Bluetooth connection.
    Bluetooth,
}

/// Return `true` if the VID/PID pair corresponds to a supported DualShock device.
pub fn is_gamepad_product(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == crate::SONY_VENDOR_ID
        && DualShockModel::from_product_id(product_id) != DualShockModel::Unknown
}

/// Selects the byte layout for input decoding and output encoding.
///
/// A layout is the (model, transport) pair; all field offsets are keyed off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLayout {
    /// Controller generation.
    pub model: DualShockModel,
    /// Transport the reports travel over.
    pub connection: ConnectionKind,
}

impl ReportLayout {
    /// Resolve the layout for a device, or `None` if the combination is unsupported.
    ///
    /// The DualShock 3 is only supported over USB: its Bluetooth mode requires
    /// a pairing handshake that belongs to the transport layer, not this crate.
    pub fn for_device(model: DualShockModel, connection: ConnectionKind) -> Option<Self> {
        match (model, connection) {
            (DualShockModel::Ds3, ConnectionKind::Usb)
            | (DualShockModel::Ds4, ConnectionKind::Usb)
            | (DualShockModel::Ds4, ConnectionKind::Bluetooth) => Some(Self { model, connection }),
            _ => None,
        }
    }

    /// Expected input report length in bytes, including the leading report ID.
    pub fn input_report_len(self) -> usize {
        match (self.model, self.connection) {
            (DualShockModel::Ds3, _) => 49,
            (DualShockModel::Ds4, ConnectionKind::Usb) => 64,
            (DualShockModel::Ds4, ConnectionKind::Bluetooth) => 78,
            (DualShockModel::Unknown, _) => 0,
        }
    }

    /// Report ID expected in byte 0 of an input report.
    pub fn input_report_id(self) -> u8 {
        match (self.model, self.connection) {
            (DualShockModel::Ds3, _) => report_ids::DS3_INPUT,
            (DualShockModel::Ds4, ConnectionKind::Usb) => report_ids::DS4_USB_INPUT,
            (DualShockModel::Ds4, ConnectionKind::Bluetooth) => report_ids::DS4_BT_INPUT,
            (DualShockModel::Unknown, _) => 0,
        }
    }

    /// Extra offset applied to every DualShock 4 input field.
    ///
    /// The Bluetooth report carries the same payload as the USB report shifted
    /// two bytes right (report ID 0x11 plus one protocol byte).
    pub(crate) fn ds4_base_offset(self) -> usize {
        match self.connection {
            ConnectionKind::Usb => 0,
            ConnectionKind::Bluetooth => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_from_product_id() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(
            DualShockModel::from_product_id(product_ids::DUALSHOCK_3),
            DualShockModel::Ds3
        );
        assert_eq!(
            DualShockModel::from_product_id(product_ids::DUALSHOCK_4),
            DualShockModel::Ds4
        );
        assert_eq!(
            DualShockModel::from_product_id(product_ids::DUALSHOCK_4_SLIM),
            DualShockModel::Ds4
        );
        assert_eq!(
            DualShockModel::from_product_id(0xDEAD),
            DualShockModel::Unknown
        );
        Ok(())
    }

    #[test]
    fn test_model_capabilities() -> Result<(), Box<dyn std::error::Error>> {
        assert!(DualShockModel::Ds4.has_rgb_led());
        assert!(!DualShockModel::Ds3.has_rgb_led());
        assert!(DualShockModel::Ds4.has_full_imu());
        assert_eq!(DualShockModel::Ds3.tag(), "ds3");
        assert_eq!(DualShockModel::Ds4.tag(), "ds4");
        Ok(())
    }

    #[test]
    fn test_is_gamepad_product() -> Result<(), Box<dyn std::error::Error>> {
        assert!(is_gamepad_product(0x054C, product_ids::DUALSHOCK_3));
        assert!(is_gamepad_product(0x054C, product_ids::DUALSHOCK_4_DONGLE));
        assert!(!is_gamepad_product(0x054C, 0xFFFF));
        assert!(!is_gamepad_product(0x1234, product_ids::DUALSHOCK_4));
        Ok(())
    }

    #[test]
    fn test_layout_resolution() -> Result<(), Box<dyn std::error::Error>> {
        let ds3 = ReportLayout::for_device(DualShockModel::Ds3, ConnectionKind::Usb)
            .ok_or("ds3 usb must resolve")?;
        assert_eq!(ds3.input_report_len(), 49);
        assert_eq!(ds3.input_report_id(), 0x01);

        let ds4_bt = ReportLayout::for_device(DualShockModel::Ds4, ConnectionKind::Bluetooth)
            .ok_or("ds4 bt must resolve")?;
        assert_eq!(ds4_bt.input_report_len(), 78);
        assert_eq!(ds4_bt.input_report_id(), 0x11);

        assert!(
            ReportLayout::for_device(DualShockModel::Ds3, ConnectionKind::Bluetooth).is_none(),
            "sixaxis bluetooth pairing is a transport concern"
        );
        assert!(ReportLayout::for_device(DualShockModel::Unknown, ConnectionKind::Usb).is_none());
        Ok(())
    }
}
