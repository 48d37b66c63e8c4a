use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use roster_client::config::{Config, SessionBackend};
use roster_client::{logout, App, CameraSurface, CaptureSource};
use roster_media::{
    AcquireError, CaptureConstraints, CaptureStream, MediaTrack, MemorySessionStore,
    SharedCameraStream, TrackError, TrackKind, TrackState,
};

// ── Fake platform ───────────────────────────────────────────────────────────

struct FakeTrack {
    id: String,
    ended: Arc<AtomicBool>,
}

impl MediaTrack for FakeTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackKind {
        TrackKind::Video
    }

    fn state(&self) -> TrackState {
        if self.ended.load(Ordering::SeqCst) {
            TrackState::Ended
        } else {
            TrackState::Live
        }
    }

    fn stop(&self) -> Result<(), TrackError> {
        self.ended.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out single-track streams and records every acquisition.
#[derive(Clone, Default)]
struct FakeCamera {
    acquisitions: Arc<AtomicUsize>,
    deny: Arc<AtomicBool>,
    tracks: Arc<Mutex<Vec<Arc<AtomicBool>>>>,
    last_constraints: Arc<Mutex<Option<CaptureConstraints>>>,
}

impl FakeCamera {
    fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }

    /// Simulate the device being unplugged: every handed-out track ends.
    fn unplug(&self) {
        for ended in self.tracks.lock().unwrap().iter() {
            ended.store(true, Ordering::SeqCst);
        }
    }
}

impl CaptureSource for FakeCamera {
    async fn acquire(&self, constraints: &CaptureConstraints) -> Result<CaptureStream, AcquireError> {
        *self.last_constraints.lock().unwrap() = Some(constraints.clone());
        if self.deny.load(Ordering::SeqCst) {
            return Err(AcquireError::PermissionDenied);
        }
        let n = self.acquisitions.fetch_add(1, Ordering::SeqCst);
        let ended = Arc::new(AtomicBool::new(false));
        self.tracks.lock().unwrap().push(ended.clone());
        Ok(CaptureStream::new(
            format!("cam-{n}"),
            vec![Box::new(FakeTrack {
                id: format!("cam-{n}-video"),
                ended,
            })],
        ))
    }
}

struct NoDevice;

impl CaptureSource for NoDevice {
    async fn acquire(&self, _constraints: &CaptureConstraints) -> Result<CaptureStream, AcquireError> {
        Err(AcquireError::NoDevice)
    }
}

/// A permission prompt the user never answers.
struct Unanswered;

impl CaptureSource for Unanswered {
    async fn acquire(&self, _constraints: &CaptureConstraints) -> Result<CaptureStream, AcquireError> {
        std::future::pending().await
    }
}

fn shared_camera() -> Arc<SharedCameraStream> {
    Arc::new(SharedCameraStream::new(Arc::new(MemorySessionStore::new())))
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_reuses_the_shared_stream() {
    let camera = shared_camera();
    let source = FakeCamera::default();
    let mut modal = CameraSurface::new("checkin", camera.clone(), source.clone(), CaptureConstraints::default());

    assert!(modal.needs_permission_prompt());
    let first = modal.open().await.unwrap();
    modal.close();
    assert!(modal.stream().is_none());
    assert!(camera.shared_stream().is_some());

    let second = modal.open().await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(source.acquisitions(), 1);
    assert!(!modal.needs_permission_prompt());
}

#[tokio::test]
async fn surfaces_share_one_stream() {
    let camera = shared_camera();
    let source = FakeCamera::default();
    let mut modal = CameraSurface::new("modal", camera.clone(), source.clone(), CaptureConstraints::default());
    let mut scanner = CameraSurface::new("scanner", camera.clone(), source.clone(), CaptureConstraints::default());

    let a = modal.open().await.unwrap();
    let b = scanner.open().await.unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(source.acquisitions(), 1);
}

#[tokio::test]
async fn logout_forces_a_fresh_acquisition() {
    let camera = shared_camera();
    let source = FakeCamera::default();
    let mut modal = CameraSurface::new("checkin", camera.clone(), source.clone(), CaptureConstraints::default());

    let first = modal.open().await.unwrap();
    logout(&camera);
    assert!(camera.shared_stream().is_none());
    assert!(!camera.was_permission_granted_this_session());
    assert!(!first.is_active());

    let second = modal.open().await.unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(source.acquisitions(), 2);
}

#[tokio::test]
async fn denied_permission_leaves_manager_empty() {
    let camera = shared_camera();
    camera.mark_permission_granted_for_session();
    let source = FakeCamera::default();
    source.deny.store(true, Ordering::SeqCst);
    let mut modal = CameraSurface::new("checkin", camera.clone(), source, CaptureConstraints::default());

    assert_eq!(modal.open().await.unwrap_err(), AcquireError::PermissionDenied);
    assert!(camera.shared_stream().is_none());
    assert!(!camera.was_permission_granted_this_session());
    assert!(modal.stream().is_none());
}

#[tokio::test]
async fn missing_device_keeps_permission_flag() {
    let camera = shared_camera();
    camera.mark_permission_granted_for_session();
    let mut modal = CameraSurface::new("checkin", camera.clone(), NoDevice, CaptureConstraints::default());

    assert_eq!(modal.open().await.unwrap_err(), AcquireError::NoDevice);
    assert!(camera.shared_stream().is_none());
    assert!(camera.was_permission_granted_this_session());
}

#[tokio::test]
async fn ended_stream_is_replaced() {
    let camera = shared_camera();
    let source = FakeCamera::default();
    let mut modal = CameraSurface::new("checkin", camera.clone(), source.clone(), CaptureConstraints::default());

    let first = modal.open().await.unwrap();
    source.unplug();
    assert!(!camera.has_active_stream());

    let second = modal.open().await.unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&camera.shared_stream().unwrap(), &second));
    assert_eq!(source.acquisitions(), 2);
}

#[tokio::test]
async fn open_abandoned_during_prompt_registers_nothing() {
    let camera = shared_camera();
    let mut modal = CameraSurface::new("checkin", camera.clone(), Unanswered, CaptureConstraints::default());

    let outcome = tokio::time::timeout(Duration::from_millis(20), modal.open()).await;
    assert!(outcome.is_err(), "acquisition should still be pending");
    assert!(camera.shared_stream().is_none());
    assert!(!camera.was_permission_granted_this_session());
    assert!(modal.stream().is_none());
}

#[tokio::test]
async fn app_wires_surfaces_to_one_manager() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.session.dir = dir.path().to_string_lossy().into_owned();
    config.camera.preset = "480p".into();

    let app = App::from_config(&config, Some("tab-3")).unwrap();
    assert_eq!(app.session_id(), Some("tab-3"));
    assert!(!app.started_new_session());

    let source = FakeCamera::default();
    let mut surface = app.surface("roster-photo", source.clone());
    surface.open().await.unwrap();
    let requested = source.last_constraints.lock().unwrap().clone().unwrap();
    assert_eq!((requested.width, requested.height), (640, 480));
    assert!(requested.video && !requested.audio);

    // A second app on the same session sees the grant but not the stream.
    let other = App::from_config(&config, Some("tab-3")).unwrap();
    assert!(other.camera.was_permission_granted_this_session());
    assert!(other.camera.shared_stream().is_none());

    app.end_session().unwrap();
    assert!(app.camera.shared_stream().is_none());
    assert!(!other.camera.was_permission_granted_this_session());
}

#[test]
fn disabled_backend_never_reports_a_grant() {
    let mut config = Config::default();
    config.session.backend = SessionBackend::Disabled;
    let app = App::from_config(&config, None).unwrap();

    assert_eq!(app.session_id(), None);
    app.camera.mark_permission_granted_for_session();
    assert!(!app.camera.was_permission_granted_this_session());
    app.end_session().unwrap();
}

#[test]
fn invalid_session_id_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.session.dir = dir.path().to_string_lossy().into_owned();
    assert!(App::from_config(&config, Some("../etc")).is_err());
}

#[test]
fn missing_session_id_starts_a_new_file_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.session.dir = dir.path().to_string_lossy().into_owned();

    let first = App::from_config(&config, None).unwrap();
    let second = App::from_config(&config, None).unwrap();
    assert!(first.started_new_session());
    assert_ne!(first.session_id(), second.session_id());

    first.camera.mark_permission_granted_for_session();
    assert!(!second.camera.was_permission_granted_this_session());

    let resumed = App::from_config(&config, first.session_id()).unwrap();
    assert!(!resumed.started_new_session());
    assert!(resumed.camera.was_permission_granted_this_session());
}
