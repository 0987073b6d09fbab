//! Sony USB vendor and product ID constants.

#![deny(static_mut_refs)]

/// Sony Interactive Entertainment USB vendor ID.
pub const SONY_VENDOR_ID: u16 = 0x054C;

/// Report IDs used by the DualShock HID protocols.
pub mod report_ids {
    /// DualShock 3 input report (buttons, sticks, pressures, motion, status).
    pub const DS3_INPUT: u8 = 0x01;
    /// DualShock 3 output report (rumble motors + LED bitmask).
    pub const DS3_OUTPUT: u8 = 0x01;
    /// DualShock 4 input report over USB.
    pub const DS4_USB_INPUT: u8 = 0x01;
    /// DualShock 4 full input report over Bluetooth.
    pub const DS4_BT_INPUT: u8 = 0x11;
    /// DualShock 4 output report over USB (rumble + lightbar).
    pub const DS4_USB_OUTPUT: u8 = 0x05;
    /// DualShock 4 output report over Bluetooth (CRC-trailed).
    pub const DS4_BT_OUTPUT: u8 = 0x11;
}

/// Known DualShock product IDs.
pub mod product_ids {
    /// DualShock 3 / Sixaxis.
    pub const DUALSHOCK_3: u16 = 0x0268;
    /// DualShock 4 (first generation, CUH-ZCT1).
    pub const DUALSHOCK_4: u16 = 0x05C4;
    /// DualShock 4 (second generation / slim, CUH-ZCT2).
    pub const DUALSHOCK_4_SLIM: u16 = 0x09CC;
    /// Sony DualShock 4 USB wireless adaptor.
    pub const DUALSHOCK_4_DONGLE: u16 = 0x0BA0;
}
