//! Session event callbacks.
//!
//! All callbacks run on the session's reader thread, one at a time, in a
//! fixed order per frame: per-channel callbacks first (digital, analog,
//! motion, status), then the aggregate update callback. Keep them fast; a
//! slow callback delays the next read.

use crate::diff::ChangeSet;
use crate::error::SessionError;
use openpad_hid_dualshock_protocol::{Axis, Button, MotionAxis, Snapshot, StatusField, StatusState};

type UpdateFn = Box<dyn FnMut(ChangeSet, &Snapshot) + Send>;
type DigitalFn = Box<dyn FnMut(Button, bool) + Send>;
type AnalogFn = Box<dyn FnMut(Axis, u8) + Send>;
type MotionFn = Box<dyn FnMut(MotionAxis, i16) + Send>;
type StatusFn = Box<dyn FnMut(StatusField, &StatusState) + Send>;
type DisconnectFn = Box<dyn FnMut() + Send>;
type ErrorFn = Box<dyn FnMut(&SessionError) + Send>;

/// Callback bundle handed to [`DeviceSession::open`](crate::DeviceSession::open).
///
/// Every slot is optional. Registering a motion or status callback enables
/// decoding of that report section even when the matching
/// [`OpenConfig`](crate::OpenConfig) flag is off.
#[derive(Default)]
pub struct SessionCallbacks {
    pub(crate) update: Option<UpdateFn>,
    pub(crate) digital: Option<DigitalFn>,
    pub(crate) analog: Option<AnalogFn>,
    pub(crate) motion: Option<MotionFn>,
    pub(crate) status: Option<StatusFn>,
    pub(crate) disconnect: Option<DisconnectFn>,
    pub(crate) error: Option<ErrorFn>,
}

impl SessionCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires once per frame with at least one changed channel, after all
    /// per-channel callbacks for that frame.
    pub fn on_update(mut self, f: impl FnMut(ChangeSet, &Snapshot) + Send + 'static) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    /// Fires once per digital button whose pressed state changed.
    pub fn on_digital(mut self, f: impl FnMut(Button, bool) + Send + 'static) -> Self {
        self.digital = Some(Box::new(f));
        self
    }

    /// Fires once per analog axis whose filtered value changed.
    pub fn on_analog(mut self, f: impl FnMut(Axis, u8) + Send + 'static) -> Self {
        self.analog = Some(Box::new(f));
        self
    }

    /// Fires once per motion axis whose filtered value changed. Enables
    /// motion decoding.
    pub fn on_motion(mut self, f: impl FnMut(MotionAxis, i16) + Send + 'static) -> Self {
        self.motion = Some(Box::new(f));
        self
    }

    /// Fires once per status field that changed. Enables status decoding.
    pub fn on_status(mut self, f: impl FnMut(StatusField, &StatusState) + Send + 'static) -> Self {
        self.status = Some(Box::new(f));
        self
    }

    /// Fires exactly once when the device goes away mid-session.
    pub fn on_disconnect(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.disconnect = Some(Box::new(f));
        self
    }

    /// Fires on recoverable decode errors and on the fault that ends a
    /// session. Never fires for disconnection.
    pub fn on_error(mut self, f: impl FnMut(&SessionError) + Send + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }

    /// Whether a motion callback is registered.
    pub(crate) fn wants_motion(&self) -> bool {
        self.motion.is_some()
    }

    /// Whether a status callback is registered.
    pub(crate) fn wants_status(&self) -> bool {
        self.status.is_some()
    }
}

impl std::fmt::Debug for SessionCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCallbacks")
            .field("update", &self.update.is_some())
            .field("digital", &self.digital.is_some())
            .field("analog", &self.analog.is_some())
            .field("motion", &self.motion.is_some())
            .field("status", &self.status.is_some())
            .field("disconnect", &self.disconnect.is_some())
            .field("error", &self.error.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_builder_sets_slots() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits2 = Arc::clone(&hits);
        let mut callbacks = SessionCallbacks::new()
            .on_digital(move |_, _| {
                hits2.fetch_add(1, Ordering::SeqCst);
            })
            .on_motion(|_, _| {});

        assert!(callbacks.wants_motion());
        assert!(!callbacks.wants_status());
        assert!(callbacks.update.is_none());

        if let Some(cb) = callbacks.digital.as_mut() {
            cb(Button::Cross, true);
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_debug_redacts_closures() {
        let callbacks = SessionCallbacks::new().on_update(|_, _| {});
        let repr = format!("{callbacks:?}");
        assert!(repr.contains("update: true"));
        assert!(repr.contains("digital: false"));
    }
}
