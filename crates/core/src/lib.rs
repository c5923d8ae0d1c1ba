//! userguide-core: Host contract and error taxonomy for userguide.
//!
//! This crate contains the `Host` trait (everything the engine consumes
//! from the collaboration endpoint), the errors those calls and the
//! engine's own fallible steps produce, and shared constants.

pub mod constants;
mod error;
mod host;

pub use constants::{
    DEFAULT_PANEL_ID, HTTP_STATUS_OK, NAVIGATOR_NAME_SUFFIX, NO_CONTENT_WIDGET_SUFFIX,
    OPTION_WIDGET_SEGMENT, STARTUP_DELAY,
};
pub use error::{FetchFailure, HostError, HostResult, OverlayOp, SyncError};
pub use host::{EventSink, Host, HttpResponse, OverlayRequest};

// Re-export types used in trait signatures for convenience
pub use userguide_types::{
    GlobalFeature, HostEvent, Peripheral, Surface, VisibleOverlay, WidgetValue,
};
