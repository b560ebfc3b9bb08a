//! Live session domain: connection lifecycle, wire frames and the events
//! that drive pushes to connected users.

mod events;
mod frame;
mod state;

pub use events::{LiveSessionOpened, SensorsUpdatedForUser};
pub use frame::{
    FrameContent, LiveFrame, AUTHENTICATION_FAILED, AUTHENTICATION_TIMEOUT, DIAGRAM_FRAME,
    ERROR_FRAME, HEARTBEAT_FRAME, INVALID_CREDENTIALS,
};
pub use state::{SessionState, SupersedePolicy};
