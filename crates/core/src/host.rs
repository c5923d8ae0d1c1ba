//! The host contract
//!
//! Everything the engine needs from the collaboration endpoint: feature
//! switches, peripheral and overlay status, the overlay primitives, button
//! state, panel registration, event subscription and outbound HTTP.

use crate::error::HostResult;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use userguide_types::{
    GlobalFeature, HostEvent, OverlayMode, Peripheral, Surface, VisibleOverlay, WidgetValue,
};

/// Where a host delivers subscribed events
pub type EventSink = UnboundedSender<HostEvent>;

/// Arguments of the display-overlay primitive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayRequest {
    pub mode: OverlayMode,
    pub title: String,
    /// Already resolved surface
    pub target: Surface,
    pub url: String,
}

/// Result of an outbound GET
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }
}

/// Trait for collaboration endpoint hosts
///
/// All calls run on a single cooperative event loop, so implementations
/// need not be `Send`. Any call may suspend, and other events can be handled
/// while it does.
#[allow(async_fn_in_trait)]
pub trait Host {
    /// Switch a host subsystem on or off
    async fn set_global_mode(&self, feature: GlobalFeature, on: bool) -> HostResult<()>;

    /// Currently connected peripherals
    async fn query_peripherals(&self) -> HostResult<Vec<Peripheral>>;

    /// Open one overlay on a surface, replacing any overlay already there
    async fn display_overlay(&self, request: &OverlayRequest) -> HostResult<()>;

    /// Close the overlay on a surface; no-op if none is open
    async fn clear_overlay(&self, target: Surface) -> HostResult<()>;

    /// Overlays the host currently knows about
    async fn query_visible_overlays(&self) -> HostResult<Vec<VisibleOverlay>>;

    /// Push a value to one panel button
    async fn set_button_state(&self, widget_id: &str, value: WidgetValue) -> HostResult<()>;

    /// Publish a declarative panel description, replacing any prior one
    /// registered under the same id
    async fn register_panel(&self, panel_id: &str, description: &str) -> HostResult<()>;

    /// Route widget actions, panel clicks and overlay changes to `sink`
    fn subscribe(&self, sink: EventSink);

    async fn http_get(&self, url: &str) -> HostResult<HttpResponse>;
}
