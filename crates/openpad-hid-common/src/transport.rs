//! HID transport traits and the mock implementation used in tests.
//!
//! Transport methods take `&self`: the underlying HID backends allow a timed
//! read and an output write to proceed concurrently, and the session relies
//! on that so a flush never waits behind an in-progress read.

use crate::{HidDeviceInfo, HidTransportError, HidTransportResult};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// One open HID device handle.
pub trait HidTransport: Send + Sync {
    /// Identity of the open device.
    fn info(&self) -> &HidDeviceInfo;

    /// Read one input report into `buf`, waiting at most `timeout_ms`.
    ///
    /// Returns `Ok(0)` on timeout (no report arrived), the report length
    /// otherwise. A timed read bounds how long the session's read loop can
    /// stay blocked, which is what makes `close()` prompt.
    fn read_input_report(&self, buf: &mut [u8], timeout_ms: i32) -> HidTransportResult<usize>;

    /// Write one output report, returning the number of bytes accepted.
    fn write_output_report(&self, data: &[u8]) -> HidTransportResult<usize>;
}

/// Enumeration and open: the one-shot discovery surface.
pub trait HidPort {
    /// List candidate devices currently attached.
    fn enumerate(&self) -> HidTransportResult<Vec<HidDeviceInfo>>;

    /// Open the device described by `info`.
    fn open(&self, info: &HidDeviceInfo) -> HidTransportResult<Arc<dyn HidTransport>>;
}

/// Mock transport: queue-driven reads, recorded writes, switchable
/// disconnection. Clonable handles share the same underlying state so a test
/// can keep feeding reports while a session owns "the device".
#[derive(Clone)]
pub struct MockHidTransport {
    info: HidDeviceInfo,
    read_queue: Arc<Mutex<VecDeque<Vec<u8>>>>,
    write_history: Arc<Mutex<Vec<Vec<u8>>>>,
    connected: Arc<AtomicBool>,
}

impl MockHidTransport {
    pub fn new(info: HidDeviceInfo) -> Self {
        Self {
            info,
            read_queue: Arc::new(Mutex::new(VecDeque::new())),
            write_history: Arc::new(Mutex::new(Vec::new())),
            connected: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Queue one input report for a future read.
    pub fn queue_input_report(&self, data: Vec<u8>) {
        self.read_queue.lock().push_back(data);
    }

    /// All output reports written so far, oldest first.
    pub fn write_history(&self) -> Vec<Vec<u8>> {
        self.write_history.lock().clone()
    }

    /// Number of output reports written so far.
    pub fn write_count(&self) -> usize {
        self.write_history.lock().len()
    }

    /// Simulate the device going away; subsequent reads and writes fail with
    /// [`HidTransportError::Disconnected`].
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Bring a disconnected mock device back, so tests can exercise retry
    /// behavior after failed I/O.
    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for MockHidTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockHidTransport")
            .field("info", &self.info)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

impl HidTransport for MockHidTransport {
    fn info(&self) -> &HidDeviceInfo {
        &self.info
    }

    fn read_input_report(&self, buf: &mut [u8], timeout_ms: i32) -> HidTransportResult<usize> {
        // Poll in short slices so a mid-read disconnect surfaces quickly,
        // mirroring how a real timed read gets interrupted.
        let deadline = timeout_ms.max(0) as u64;
        let mut waited = 0u64;
        loop {
            if !self.is_connected() {
                return Err(HidTransportError::Disconnected);
            }
            if let Some(report) = self.read_queue.lock().pop_front() {
                let n = report.len().min(buf.len());
                buf[..n].copy_from_slice(&report[..n]);
                return Ok(n);
            }
            if waited >= deadline {
                return Ok(0);
            }
            let slice = (deadline - waited).min(2);
            std::thread::sleep(Duration::from_millis(slice));
            waited += slice;
        }
    }

    fn write_output_report(&self, data: &[u8]) -> HidTransportResult<usize> {
        if !self.is_connected() {
            return Err(HidTransportError::Disconnected);
        }
        self.write_history.lock().push(data.to_vec());
        Ok(data.len())
    }
}

/// Mock port over a fixed set of mock devices.
#[derive(Debug, Default)]
pub struct MockHidPort {
    devices: Vec<MockHidTransport>,
}

impl MockHidPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_device(&mut self, device: MockHidTransport) {
        self.devices.push(device);
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}

impl HidPort for MockHidPort {
    fn enumerate(&self) -> HidTransportResult<Vec<HidDeviceInfo>> {
        Ok(self.devices.iter().map(|d| d.info().clone()).collect())
    }

    fn open(&self, info: &HidDeviceInfo) -> HidTransportResult<Arc<dyn HidTransport>> {
        for device in &self.devices {
            if device.info().path == info.path {
                return Ok(Arc::new(device.clone()));
            }
        }
        Err(HidTransportError::DeviceNotFound(info.path.clone()))
    }
}
