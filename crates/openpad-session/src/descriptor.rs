//! Device descriptors and enumeration.

use crate::error::OpenError;
use openpad_hid_common::{BusKind, HidDeviceInfo, HidPort};
use openpad_hid_dualshock_protocol::{is_gamepad_product, ConnectionKind, DualShockModel};
use tracing::debug;

/// One physical device candidate, as produced by [`list_devices`].
#[derive(Debug, Clone)]
pub struct DeviceDescriptor {
    /// Controller generation.
    pub model: DualShockModel,
    /// Transport the device is attached over.
    pub connection: ConnectionKind,
    /// Raw backend identity (VID/PID, path, product string).
    pub info: HidDeviceInfo,
}

impl DeviceDescriptor {
    /// Short type tag (`"ds3"`, `"ds4"`), as used for enumeration filters.
    pub fn tag(&self) -> &'static str {
        self.model.tag()
    }

    /// Human-readable name for logs and UIs.
    pub fn display_name(&self) -> String {
        self.info.display_name()
    }
}

/// List attached DualShock devices, optionally filtered by model.
///
/// One-shot: enumeration holds no resources once it returns.
///
/// # Errors
///
/// Returns [`OpenError::DeviceUnavailable`] when the backend cannot be
/// queried at all; an empty list is not an error.
pub fn list_devices(
    port: &dyn HidPort,
    filter: Option<DualShockModel>,
) -> Result<Vec<DeviceDescriptor>, OpenError> {
    let infos = port
        .enumerate()
        .map_err(|e| OpenError::DeviceUnavailable(e.to_string()))?;

    let mut found = Vec::new();
    for info in infos {
        if !is_gamepad_product(info.vendor_id, info.product_id) {
            continue;
        }
        let model = DualShockModel::from_product_id(info.product_id);
        if filter.is_some_and(|wanted| wanted != model) {
            continue;
        }
        let connection = match info.bus {
            BusKind::Usb => ConnectionKind::Usb,
            BusKind::Bluetooth => ConnectionKind::Bluetooth,
            BusKind::Unknown => {
                // Backends without bus classification report USB-sized frames.
                debug!(path = %info.path, "bus unknown, assuming USB");
                ConnectionKind::Usb
            }
        };
        found.push(DeviceDescriptor {
            model,
            connection,
            info,
        });
    }
    Ok(found)
}
