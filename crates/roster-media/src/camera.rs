use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::capture::CaptureStream;
use super::session::SessionStore;

/// Session storage key for the camera permission flag.
pub const PERMISSION_GRANTED_KEY: &str = "cameraPermissionGranted";
/// The only stored value treated as "granted".
pub const PERMISSION_GRANTED_VALUE: &str = "true";

/// Outcome of [`SharedCameraStream::stop_and_clear_shared_stream`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearSummary {
    pub stopped: usize,
    pub failed: usize,
}

/// Holds the one camera capture shared by every surface of the app, plus the
/// session-scoped "permission granted" flag.
///
/// The stream slot and the flag are independent: clearing one never touches
/// the other. Nothing here returns an error; storage and track failures are
/// logged and swallowed.
pub struct SharedCameraStream {
    stream: Mutex<Option<Arc<CaptureStream>>>,
    session: Arc<dyn SessionStore>,
}

impl SharedCameraStream {
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self {
            stream: Mutex::new(None),
            session,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Arc<CaptureStream>>> {
        self.stream.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The currently registered stream, if any.
    pub fn shared_stream(&self) -> Option<Arc<CaptureStream>> {
        self.slot().clone()
    }

    /// Replace the registered stream. The previous stream, if any, is
    /// released without being stopped.
    pub fn set_shared_stream(&self, stream: Option<Arc<CaptureStream>>) {
        let previous = std::mem::replace(&mut *self.slot(), stream);
        if let Some(previous) = previous {
            tracing::debug!("Released shared camera stream {} without stopping it", previous.id());
        }
    }

    /// Whether a stream is registered and still has a live track.
    pub fn has_active_stream(&self) -> bool {
        self.slot().as_ref().is_some_and(|s| s.is_active())
    }

    /// Stop every track of the registered stream and clear the slot.
    ///
    /// A track failing to stop does not prevent the remaining tracks from
    /// being stopped, and the slot is always empty afterwards.
    pub fn stop_and_clear_shared_stream(&self) -> ClearSummary {
        // Take the stream out first so track callbacks never run under the lock.
        let Some(stream) = self.slot().take() else {
            return ClearSummary::default();
        };

        let mut summary = ClearSummary::default();
        for track in stream.tracks() {
            match track.stop() {
                Ok(()) => summary.stopped += 1,
                Err(e) => {
                    summary.failed += 1;
                    tracing::debug!("Failed to stop track {} of {}: {}", track.id(), stream.id(), e);
                }
            }
        }

        tracing::info!(
            "Cleared shared camera stream {} ({} tracks stopped, {} failed)",
            stream.id(),
            summary.stopped,
            summary.failed
        );
        summary
    }

    pub fn mark_permission_granted_for_session(&self) {
        if let Err(e) = self
            .session
            .set(PERMISSION_GRANTED_KEY, PERMISSION_GRANTED_VALUE)
        {
            tracing::warn!("Could not record camera permission for session: {}", e);
        }
    }

    pub fn clear_permission_for_session(&self) {
        if let Err(e) = self.session.remove(PERMISSION_GRANTED_KEY) {
            tracing::warn!("Could not clear camera permission for session: {}", e);
        }
    }

    pub fn was_permission_granted_this_session(&self) -> bool {
        match self.session.get(PERMISSION_GRANTED_KEY) {
            Ok(value) => value.as_deref() == Some(PERMISSION_GRANTED_VALUE),
            Err(e) => {
                tracing::debug!("Camera permission flag unreadable, treating as unset: {}", e);
                false
            }
        }
    }
}
