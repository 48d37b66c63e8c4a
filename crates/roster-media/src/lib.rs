pub mod camera;
pub mod capture;
pub mod constraints;
pub mod session;

pub use camera::{ClearSummary, SharedCameraStream, PERMISSION_GRANTED_KEY, PERMISSION_GRANTED_VALUE};
pub use capture::{AcquireError, CaptureStream, MediaTrack, TrackError, TrackKind, TrackState};
pub use constraints::{CaptureConstraints, CapturePreset, FacingMode};
pub use session::{DisabledSessionStore, FileSessionStore, MemorySessionStore, SessionStore, StoreError};
