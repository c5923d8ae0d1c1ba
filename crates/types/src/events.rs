//! Events emitted by the host and host-side feature switches

use serde::{Deserialize, Serialize};

/// Widget interaction type reported with a widget action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetActionType {
    Pressed,
    Released,
    Clicked,
    Changed,
}

/// A user interacted with a panel widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetAction {
    pub widget_id: String,
    #[serde(rename = "type")]
    pub action: WidgetActionType,
}

impl WidgetAction {
    pub fn clicked(widget_id: impl Into<String>) -> Self {
        Self {
            widget_id: widget_id.into(),
            action: WidgetActionType::Clicked,
        }
    }
}

/// A user opened a panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelClicked {
    pub panel_id: String,
}

/// The event classes the dispatcher subscribes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostEvent {
    /// Button tap (or other widget interaction)
    WidgetAction(WidgetAction),
    /// Panel invoked by the user
    PanelClicked(PanelClicked),
    /// The set of visible overlays changed
    OverlaysChanged,
}

/// Host subsystems switched on at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlobalFeature {
    /// Overlay rendering
    WebEngine,
    /// Outbound HTTP, needed for a remote catalog
    HttpClient,
    /// Let overlays play audio through the room's peripherals
    WebEngineAudioOutput,
}
