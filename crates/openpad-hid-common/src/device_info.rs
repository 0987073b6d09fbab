//! Device information types for HID devices

use serde::{Deserialize, Serialize};

/// Bus the device is attached to, as far as the backend can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BusKind {
    /// Wired USB.
    Usb,
    /// Bluetooth HID.
    Bluetooth,
    /// Backend could not classify the bus.
    #[default]
    Unknown,
}

/// Raw device identity as reported by the HID backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HidDeviceInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    pub bus: BusKind,
    pub serial_number: Option<String>,
    pub product_name: Option<String>,
    pub path: String,
}

impl HidDeviceInfo {
    pub fn new(vendor_id: u16, product_id: u16, path: String) -> Self {
        Self {
            vendor_id,
            product_id,
            bus: BusKind::Unknown,
            serial_number: None,
            product_name: None,
            path,
        }
    }

    pub fn with_bus(mut self, bus: BusKind) -> Self {
        self.bus = bus;
        self
    }

    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial_number = Some(serial.into());
        self
    }

    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        self.vendor_id == vendor_id && self.product_id == product_id
    }

    pub fn display_name(&self) -> String {
        self.product_name
            .clone()
            .unwrap_or_else(|| format!("{:04x}:{:04x}", self.vendor_id, self.product_id))
    }
}
