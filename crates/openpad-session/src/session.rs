//! Live device session: state machine, read loop, command surface.
//!
//! One reader thread per session owns every callback invocation and is the
//! sole authority on state transitions, so callbacks never race each other
//! and a caller never observes `Active` after the disconnect callback fired.

use crate::callbacks::SessionCallbacks;
use crate::config::OpenConfig;
use crate::descriptor::DeviceDescriptor;
use crate::diff::diff;
use crate::error::{OpenError, SessionError};
use crate::merger::{OutputMerger, RumbleDelta};
use openpad_filters::ChannelBank;
use openpad_hid_common::{HidPort, HidTransport, HidTransportError};
use openpad_hid_dualshock_protocol::{
    decode, encode_output_report, AnalogState, Axis, Button, DecodeOptions, DigitalState,
    DualShockModel, LedCommand, MotionAxis, MotionState, ReportLayout, Snapshot, StatusField,
    StatusState, MAX_OUTPUT_REPORT_LEN,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Bounds how long `close()` can wait for the reader to notice the stop flag.
const READ_TIMEOUT_MS: i32 = 10;

/// Lifecycle of a session. `Disconnected`, `Faulted`, and `Closed` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    /// Transport acquired, reader not yet processing frames.
    Opening = 0,
    /// Frames are flowing.
    Active = 1,
    /// The device went away; the disconnect callback has fired.
    Disconnected = 2,
    /// Unrecoverable transport error; the error callback has fired.
    Faulted = 3,
    /// `close()` completed from a healthy state; the write surface rejects
    /// further commands.
    Closed = 4,
}

impl SessionState {
    fn from_u8(value: u8) -> SessionState {
        match value {
            0 => SessionState::Opening,
            1 => SessionState::Active,
            2 => SessionState::Disconnected,
            3 => SessionState::Faulted,
            _ => SessionState::Closed,
        }
    }
}

/// State shared between the command surface and the reader thread.
///
/// The merger lock is only ever held long enough to copy state in or out,
/// never across transport I/O.
struct SessionShared {
    state: AtomicU8,
    stop: AtomicBool,
    snapshot: Mutex<Snapshot>,
    merger: Mutex<OutputMerger>,
}

impl SessionShared {
    fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: SessionState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

/// An open controller session.
///
/// Dropping the session closes it; [`DeviceSession::close`] does the same
/// explicitly and guarantees no callback runs after it returns.
pub struct DeviceSession {
    shared: Arc<SessionShared>,
    transport: Arc<dyn HidTransport>,
    descriptor: DeviceDescriptor,
    layout: ReportLayout,
    reader: Option<JoinHandle<()>>,
}

impl DeviceSession {
    /// Open a session on the device a descriptor points at.
    ///
    /// Motion and status decoding are enabled by the matching [`OpenConfig`]
    /// flags *or* by registering the matching callback; with neither, those
    /// report sections are never parsed.
    ///
    /// # Errors
    ///
    /// [`OpenError::UnsupportedType`] when no report layout exists for the
    /// model/transport pair (notably DualShock 3 over Bluetooth);
    /// [`OpenError::DeviceUnavailable`] when the transport cannot be opened.
    pub fn open(
        port: &dyn HidPort,
        descriptor: &DeviceDescriptor,
        config: OpenConfig,
        callbacks: SessionCallbacks,
    ) -> Result<DeviceSession, OpenError> {
        let layout = ReportLayout::for_device(descriptor.model, descriptor.connection).ok_or(
            OpenError::UnsupportedType {
                model: descriptor.model,
                connection: descriptor.connection,
            },
        )?;
        let transport = port
            .open(&descriptor.info)
            .map_err(|e| OpenError::DeviceUnavailable(e.to_string()))?;

        let options = DecodeOptions {
            motion: config.parse_motion || callbacks.wants_motion(),
            status: config.parse_status || callbacks.wants_status(),
        };
        debug!(
            device = %descriptor.display_name(),
            model = descriptor.model.tag(),
            connection = ?descriptor.connection,
            motion = options.motion,
            status = options.status,
            "opening session"
        );

        let shared = Arc::new(SessionShared {
            state: AtomicU8::new(SessionState::Opening as u8),
            stop: AtomicBool::new(false),
            snapshot: Mutex::new(Snapshot::default()),
            merger: Mutex::new(OutputMerger::new(layout, config.min_flush_interval)),
        });

        let reader = {
            let shared = Arc::clone(&shared);
            let transport = Arc::clone(&transport);
            std::thread::Builder::new()
                .name("openpad-reader".to_string())
                .spawn(move || read_loop(&shared, transport.as_ref(), layout, options, &config, callbacks))
                .map_err(|e| OpenError::DeviceUnavailable(format!("reader thread: {e}")))?
        };

        Ok(DeviceSession {
            shared,
            transport,
            descriptor: descriptor.clone(),
            layout,
            reader: Some(reader),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.shared.state()
    }

    /// Controller generation.
    pub fn model(&self) -> DualShockModel {
        self.descriptor.model
    }

    /// Descriptor the session was opened from.
    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    /// Copy of the retained snapshot (the last fully committed frame).
    pub fn snapshot(&self) -> Snapshot {
        *self.shared.snapshot.lock()
    }

    /// Digital section of the retained snapshot.
    pub fn digital(&self) -> DigitalState {
        self.shared.snapshot.lock().digital
    }

    /// Analog section of the retained snapshot (post-filter values).
    pub fn analog(&self) -> AnalogState {
        self.shared.snapshot.lock().analog
    }

    /// Motion section of the retained snapshot; defaults when motion
    /// decoding is off.
    pub fn motion(&self) -> MotionState {
        self.shared.snapshot.lock().motion
    }

    /// Status section of the retained snapshot; defaults when status
    /// decoding is off.
    pub fn status(&self) -> StatusState {
        self.shared.snapshot.lock().status
    }

    /// Set absolute rumble levels, held until changed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Transport`] when an eager flush fails; the
    /// merged state stays pending either way.
    pub fn set_rumble(&self, heavy: u8, light: u8) -> Result<(), SessionError> {
        self.shared.merger.lock().set_rumble(heavy, light);
        self.flush_pending(false)
    }

    /// Adjust rumble relative to the pending state, per motor.
    ///
    /// Durations are device ticks (255 = until changed); the DualShock 4
    /// ignores them. A motor with [`RumbleDelta::Keep`] is untouched,
    /// duration included.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Transport`] when an eager flush fails.
    pub fn add_rumble(
        &self,
        heavy: RumbleDelta,
        light: RumbleDelta,
        heavy_duration: u8,
        light_duration: u8,
    ) -> Result<(), SessionError> {
        self.shared
            .merger
            .lock()
            .add_rumble(heavy, light, heavy_duration, light_duration);
        self.flush_pending(false)
    }

    /// Set the LED state. A command kind the device cannot express is
    /// accepted and encodes as a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Transport`] when an eager flush fails.
    pub fn set_led(&self, led: LedCommand) -> Result<(), SessionError> {
        self.shared.merger.lock().set_led(led);
        self.flush_pending(false)
    }

    /// Flush any pending output state immediately, ignoring the inter-flush
    /// interval.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Transport`] when the write fails.
    pub fn flush(&self) -> Result<(), SessionError> {
        self.flush_pending(true)
    }

    fn flush_pending(&self, force: bool) -> Result<(), SessionError> {
        if self.state() == SessionState::Closed {
            return Err(SessionError::Closed);
        }
        if let Some(report) = claim_flush(&self.shared, force) {
            if let Err(e) = self.transport.write_output_report(report.bytes()) {
                // The claimed command stays pending for a later retry.
                self.shared.merger.lock().flush_failed();
                return Err(e.into());
            }
        }
        Ok(())
    }

    /// Stop the reader and wait for it to exit. Idempotent; after it
    /// returns, no further callback will run and the write surface rejects
    /// commands with [`SessionError::Closed`].
    pub fn close(&mut self) {
        self.shared.stop.store(true, Ordering::Release);
        if let Some(handle) = self.reader.take() {
            if handle.join().is_err() {
                warn!(device = %self.descriptor.display_name(), "reader thread panicked");
            }
            debug!(device = %self.descriptor.display_name(), "session closed");
        }
        // A terminal fault state stands; a clean shutdown records Closed.
        if matches!(
            self.shared.state(),
            SessionState::Opening | SessionState::Active
        ) {
            self.shared.set_state(SessionState::Closed);
        }
    }

    /// Report layout this session reads and writes.
    pub fn layout(&self) -> ReportLayout {
        self.layout
    }
}

impl Drop for DeviceSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for DeviceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("descriptor", &self.descriptor)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// A fully encoded output report, sized for the largest layout.
struct EncodedReport {
    buf: [u8; MAX_OUTPUT_REPORT_LEN],
    len: usize,
}

impl EncodedReport {
    fn bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// Claim and encode a due flush. The merger lock is released before any I/O.
fn claim_flush(shared: &SessionShared, force: bool) -> Option<EncodedReport> {
    let (layout, due) = {
        let mut merger = shared.merger.lock();
        let layout = merger.layout();
        (layout, merger.take_due(Instant::now(), force))
    };
    let (rumble, led) = due?;
    let mut buf = [0u8; MAX_OUTPUT_REPORT_LEN];
    let len = encode_output_report(layout, rumble, led, &mut buf);
    if len == 0 {
        return None;
    }
    trace!(heavy = rumble.heavy, light = rumble.light, led = ?led, "flushing output report");
    Some(EncodedReport { buf, len })
}

fn read_loop(
    shared: &SessionShared,
    transport: &dyn HidTransport,
    layout: ReportLayout,
    options: DecodeOptions,
    config: &OpenConfig,
    mut callbacks: SessionCallbacks,
) {
    let mut analog_bank: ChannelBank<{ Axis::COUNT }> =
        ChannelBank::new(config.smooth_analog, config.joy_deadband);
    let mut motion_bank: ChannelBank<{ MotionAxis::COUNT }> =
        ChannelBank::new(config.smooth_motion, config.move_deadband);

    let mut prev: Option<Snapshot> = None;
    let mut buf = [0u8; 128];

    shared.set_state(SessionState::Active);

    while !shared.stop.load(Ordering::Acquire) {
        // Deferred command state gets another chance every iteration; write
        // failures here keep the command pending and surface through the
        // next read instead.
        if let Some(report) = claim_flush(shared, false) {
            if let Err(e) = transport.write_output_report(report.bytes()) {
                shared.merger.lock().flush_failed();
                warn!(error = %e, "deferred flush failed");
            }
        }

        let n = match transport.read_input_report(&mut buf, READ_TIMEOUT_MS) {
            Ok(0) => continue,
            Ok(n) => n,
            Err(HidTransportError::Disconnected) => {
                shared.set_state(SessionState::Disconnected);
                debug!("device disconnected");
                if let Some(cb) = callbacks.disconnect.as_mut() {
                    cb();
                }
                return;
            }
            Err(e) => {
                shared.set_state(SessionState::Faulted);
                warn!(error = %e, "session faulted");
                if let Some(cb) = callbacks.error.as_mut() {
                    cb(&SessionError::Transport(e));
                }
                return;
            }
        };

        let mut snapshot = match decode(layout, &buf[..n], options) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                // Bad frame; drop it and keep reading.
                debug!(error = %e, "dropping malformed report");
                if let Some(cb) = callbacks.error.as_mut() {
                    cb(&SessionError::Decode(e));
                }
                continue;
            }
        };

        for &axis in &Axis::ALL {
            let filtered = analog_bank.apply_u8(axis as usize, snapshot.analog.get(axis));
            snapshot.analog.set(axis, filtered);
        }
        if options.motion {
            for &axis in &MotionAxis::ALL {
                let filtered = motion_bank.apply_i16(axis as usize, snapshot.motion.get(axis));
                snapshot.motion.set(axis, filtered);
            }
        }

        let changes = diff(prev.as_ref(), &snapshot, options);
        prev = Some(snapshot);
        if changes.is_empty() {
            *shared.snapshot.lock() = snapshot;
            continue;
        }
        trace!(changed = changes.len(), "frame changed");

        // Per-channel callbacks fire before the frame commits; the aggregate
        // update callback fires after, and sees the settled snapshot.
        if let Some(cb) = callbacks.digital.as_mut() {
            for &button in &Button::ALL {
                if changes.contains_button(button) {
                    cb(button, snapshot.digital.pressed(button));
                }
            }
        }
        if let Some(cb) = callbacks.analog.as_mut() {
            for &axis in &Axis::ALL {
                if changes.contains_axis(axis) {
                    cb(axis, snapshot.analog.get(axis));
                }
            }
        }
        if let Some(cb) = callbacks.motion.as_mut() {
            for &axis in &MotionAxis::ALL {
                if changes.contains_motion(axis) {
                    cb(axis, snapshot.motion.get(axis));
                }
            }
        }
        if let Some(cb) = callbacks.status.as_mut() {
            for &field in &StatusField::ALL {
                if changes.contains_status(field) {
                    cb(field, &snapshot.status);
                }
            }
        }

        *shared.snapshot.lock() = snapshot;

        if let Some(cb) = callbacks.update.as_mut() {
            cb(changes, &snapshot);
        }
    }
}
