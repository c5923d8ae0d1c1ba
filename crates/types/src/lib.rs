//! userguide-types: Shared data types for the userguide touch-panel catalog.
//!
//! This crate contains pure data types (catalog items, display surfaces,
//! host status records and events) that are shared across all userguide
//! crates. Nothing here talks to the host.

pub mod content;
pub mod events;
pub mod panel;
pub mod status;
pub mod surface;

// Re-export commonly used types at the crate root for convenience
pub use content::{ContentItem, ItemId, OverlayMode};
pub use events::{GlobalFeature, HostEvent, PanelClicked, WidgetAction, WidgetActionType};
pub use panel::{ButtonConfig, PanelLocation, PanelType};
pub use status::{
    OverlayKind, OverlayStatus, Peripheral, PeripheralLocation, VisibleOverlay, WidgetValue,
};
pub use surface::Surface;
