//! `hidapi`-backed implementations of the transport traits.
//!
//! Everything above this module is backend-agnostic; this is the only file
//! that touches `hidapi` directly.

use hidapi::{BusType, HidApi, HidDevice, HidError};
use openpad_hid_common::{
    BusKind, HidDeviceInfo, HidPort, HidTransport, HidTransportError, HidTransportResult,
};
use parking_lot::Mutex;
use std::ffi::CString;
use std::sync::Arc;
use tracing::debug;

/// [`HidPort`] over the system `hidapi` backend.
///
/// The `HidApi` handle is kept behind a mutex because device-list refresh
/// mutates it; open device handles do their I/O independently.
pub struct HidapiPort {
    api: Mutex<HidApi>,
}

impl HidapiPort {
    /// Initialize the HID backend.
    ///
    /// # Errors
    ///
    /// Returns [`HidTransportError::Backend`] when the system HID layer
    /// cannot be initialized (missing udev access, for example).
    pub fn new() -> HidTransportResult<Self> {
        let api = HidApi::new().map_err(|e| HidTransportError::Backend(e.to_string()))?;
        Ok(Self {
            api: Mutex::new(api),
        })
    }
}

impl std::fmt::Debug for HidapiPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HidapiPort").finish_non_exhaustive()
    }
}

fn bus_kind(bus: BusType) -> BusKind {
    match bus {
        BusType::Usb => BusKind::Usb,
        BusType::Bluetooth => BusKind::Bluetooth,
        _ => BusKind::Unknown,
    }
}

fn device_info(raw: &hidapi::DeviceInfo) -> HidDeviceInfo {
    let mut info = HidDeviceInfo::new(
        raw.vendor_id(),
        raw.product_id(),
        raw.path().to_string_lossy().to_string(),
    )
    .with_bus(bus_kind(raw.bus_type()));
    if let Some(serial) = raw.serial_number() {
        info = info.with_serial(serial);
    }
    if let Some(product) = raw.product_string() {
        info = info.with_product_name(product);
    }
    info
}

impl HidPort for HidapiPort {
    fn enumerate(&self) -> HidTransportResult<Vec<HidDeviceInfo>> {
        let mut api = self.api.lock();
        api.refresh_devices()
            .map_err(|e| HidTransportError::Backend(e.to_string()))?;
        Ok(api.device_list().map(device_info).collect())
    }

    fn open(&self, info: &HidDeviceInfo) -> HidTransportResult<Arc<dyn HidTransport>> {
        let path = CString::new(info.path.as_bytes())
            .map_err(|_| HidTransportError::OpenFailed(format!("bad device path {:?}", info.path)))?;
        let device = self
            .api
            .lock()
            .open_path(&path)
            .map_err(|e| HidTransportError::OpenFailed(e.to_string()))?;
        debug!(device = %info.display_name(), path = %info.path, "opened HID device");
        Ok(Arc::new(HidapiTransport {
            info: info.clone(),
            device,
        }))
    }
}

/// One open `hidapi` device handle.
///
/// `hidapi` allows a timed read and a write to run concurrently on the same
/// handle, which is what lets the session's flush path skip past an
/// in-progress read.
pub struct HidapiTransport {
    info: HidDeviceInfo,
    device: HidDevice,
}

/// The backend reports a vanished device as a generic I/O failure; treat any
/// read-side error on a previously working handle as a disconnect so the
/// session fires the disconnect callback instead of faulting.
fn read_error(e: &HidError) -> HidTransportError {
    let msg = e.to_string();
    let lower = msg.to_ascii_lowercase();
    // Linux hidraw surfaces an unplug as ENODEV ("No such device"), Windows
    // as "device is not connected"; other backends say "disconnected".
    if lower.contains("disconnect")
        || lower.contains("no such device")
        || lower.contains("not connected")
    {
        HidTransportError::Disconnected
    } else {
        HidTransportError::ReadError(msg)
    }
}

impl HidTransport for HidapiTransport {
    fn info(&self) -> &HidDeviceInfo {
        &self.info
    }

    fn read_input_report(&self, buf: &mut [u8], timeout_ms: i32) -> HidTransportResult<usize> {
        self.device
            .read_timeout(buf, timeout_ms)
            .map_err(|e| read_error(&e))
    }

    fn write_output_report(&self, data: &[u8]) -> HidTransportResult<usize> {
        self.device
            .write(data)
            .map_err(|e| HidTransportError::WriteError(e.to_string()))
    }
}

impl std::fmt::Debug for HidapiTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HidapiTransport")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}
