pub mod config;
pub mod surface;

use std::sync::Arc;

use anyhow::Result;
use roster_media::{
    CaptureConstraints, DisabledSessionStore, FileSessionStore, MemorySessionStore, SessionStore,
    SharedCameraStream,
};

use config::{Config, SessionBackend};

pub use surface::{logout, CameraSurface, CaptureSource};

/// Application root. Owns the single camera manager that surfaces share.
#[derive(Clone)]
pub struct App {
    pub camera: Arc<SharedCameraStream>,
    pub constraints: CaptureConstraints,
    /// Present only with the file backend; needed to end the session.
    file_session: Option<Arc<FileSessionStore>>,
    new_session: bool,
}

impl App {
    /// Build the app from config. `session_id` selects an existing file-backed
    /// session; without one a new session is started.
    pub fn from_config(config: &Config, session_id: Option<&str>) -> Result<Self> {
        let constraints = config.camera.constraints()?;

        let mut file_session = None;
        let mut new_session = false;
        let store: Arc<dyn SessionStore> = match config.session.backend {
            SessionBackend::Memory => Arc::new(MemorySessionStore::new()),
            SessionBackend::Disabled => Arc::new(DisabledSessionStore),
            SessionBackend::File => {
                let store = Arc::new(match session_id {
                    Some(id) => FileSessionStore::open(&config.session.dir, id)?,
                    None => {
                        new_session = true;
                        FileSessionStore::new_session(&config.session.dir)?
                    }
                });
                tracing::debug!("Using session file {:?}", store.path());
                file_session = Some(store.clone());
                store
            }
        };

        Ok(Self {
            camera: Arc::new(SharedCameraStream::new(store)),
            constraints,
            file_session,
            new_session,
        })
    }

    pub fn session_id(&self) -> Option<&str> {
        self.file_session.as_ref().map(|s| s.session_id())
    }

    /// True when no session id was given and a fresh file session was started.
    pub fn started_new_session(&self) -> bool {
        self.new_session
    }

    /// Build a surface wired to the shared camera.
    pub fn surface<S: CaptureSource>(&self, name: &str, source: S) -> CameraSurface<S> {
        CameraSurface::new(name, self.camera.clone(), source, self.constraints.clone())
    }

    /// End the session: tear down the camera and drop the session's storage.
    pub fn end_session(&self) -> Result<()> {
        logout(&self.camera);
        if let Some(store) = &self.file_session {
            store.end_session()?;
        }
        Ok(())
    }
}
