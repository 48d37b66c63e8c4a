use std::sync::Arc;

use roster_media::{AcquireError, CaptureConstraints, CaptureStream, SharedCameraStream};

/// Platform capture API, e.g. `getUserMedia` in a browser host.
#[allow(async_fn_in_trait)]
pub trait CaptureSource {
    async fn acquire(&self, constraints: &CaptureConstraints) -> Result<CaptureStream, AcquireError>;
}

/// A UI surface that shows the camera, such as the check-in photo modal.
///
/// Opening reuses the app-wide shared stream when one is live, so the user is
/// only prompted by the platform the first time.
pub struct CameraSurface<S> {
    name: String,
    camera: Arc<SharedCameraStream>,
    source: S,
    constraints: CaptureConstraints,
    attached: Option<Arc<CaptureStream>>,
}

impl<S: CaptureSource> CameraSurface<S> {
    pub fn new(
        name: impl Into<String>,
        camera: Arc<SharedCameraStream>,
        source: S,
        constraints: CaptureConstraints,
    ) -> Self {
        Self {
            name: name.into(),
            camera,
            source,
            constraints,
            attached: None,
        }
    }

    /// The stream this surface is currently showing.
    pub fn stream(&self) -> Option<&Arc<CaptureStream>> {
        self.attached.as_ref()
    }

    /// True when the platform will most likely prompt for permission on open.
    pub fn needs_permission_prompt(&self) -> bool {
        !self.camera.was_permission_granted_this_session()
    }

    pub async fn open(&mut self) -> Result<Arc<CaptureStream>, AcquireError> {
        if let Some(existing) = self.camera.shared_stream() {
            if existing.is_active() {
                tracing::debug!("{}: reusing shared camera stream {}", self.name, existing.id());
                self.attached = Some(existing.clone());
                return Ok(existing);
            }
            tracing::debug!(
                "{}: shared camera stream {} has ended, acquiring a new one",
                self.name,
                existing.id()
            );
            self.camera.stop_and_clear_shared_stream();
        }

        // Nothing is registered until acquisition completes, so dropping this
        // future mid-prompt leaves the manager untouched.
        match self.source.acquire(&self.constraints).await {
            Ok(stream) => {
                let stream = Arc::new(stream);
                tracing::info!("{}: acquired camera stream {}", self.name, stream.id());
                self.camera.set_shared_stream(Some(stream.clone()));
                self.camera.mark_permission_granted_for_session();
                self.attached = Some(stream.clone());
                Ok(stream)
            }
            Err(AcquireError::PermissionDenied) => {
                tracing::info!("{}: camera permission denied", self.name);
                self.camera.clear_permission_for_session();
                Err(AcquireError::PermissionDenied)
            }
            Err(e) => {
                tracing::warn!("{}: camera acquisition failed: {}", self.name, e);
                Err(e)
            }
        }
    }

    /// Detach from the stream. The shared stream stays registered for the
    /// next surface that opens.
    pub fn close(&mut self) {
        self.attached = None;
    }
}

/// Full camera teardown on logout: stop the shared stream and forget the
/// session's permission grant.
pub fn logout(camera: &SharedCameraStream) {
    camera.stop_and_clear_shared_stream();
    camera.clear_permission_for_session();
}
