//! In-process endpoint simulator
//!
//! Behaves like a collaboration endpoint as far as the engine can observe:
//! one overlay per surface, a peripheral inventory, panel and widget
//! registries, and an "overlays changed" notification after every display
//! or clear. Every command is recorded so callers can inspect what was sent.

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;
use userguide_core::{
    EventSink, GlobalFeature, Host, HostError, HostEvent, HostResult, HttpResponse,
    OverlayRequest, Peripheral, Surface, VisibleOverlay, WidgetValue, NAVIGATOR_NAME_SUFFIX,
};
use userguide_types::{OverlayKind, OverlayStatus, PeripheralLocation};

static WIDGET_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<WidgetId>([^<]+)</WidgetId>").expect("widget id pattern is valid")
});

/// A command the simulated host received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    SetGlobalMode(GlobalFeature, bool),
    DisplayOverlay(OverlayRequest),
    ClearOverlay(Surface),
    SetButtonState(String, WidgetValue),
    RegisterPanel(String),
    HttpGet(String),
}

/// Host calls that should fail
#[derive(Debug, Clone, Copy, Default)]
pub struct Failures {
    pub display: bool,
    pub clear: bool,
    pub peripherals: bool,
    pub overlays: bool,
}

/// Where `http_get` goes
pub enum HttpBackend {
    /// Real requests
    Live(reqwest::Client),
    /// Fixed responses by URL; unknown URLs fail with a transport error
    Canned(RefCell<HashMap<String, HttpResponse>>),
}

impl HttpBackend {
    pub fn live() -> Self {
        HttpBackend::Live(reqwest::Client::new())
    }

    pub fn canned() -> Self {
        HttpBackend::Canned(RefCell::new(HashMap::new()))
    }
}

#[derive(Default)]
struct SimState {
    overlays: HashMap<Surface, VisibleOverlay>,
    peripherals: Vec<Peripheral>,
    widget_values: HashMap<String, WidgetValue>,
    /// Panel id -> widget ids in registration order
    panels: HashMap<String, Vec<String>>,
    features: HashMap<GlobalFeature, bool>,
    commands: Vec<HostCommand>,
    failures: Failures,
    /// Appended to overlay URLs when they are reported back
    reported_url_suffix: String,
    /// Delay before the next overlay status answer is delivered
    status_latency: Option<Duration>,
}

/// Simulated collaboration endpoint
pub struct SimulatedHost {
    state: RefCell<SimState>,
    http: HttpBackend,
    sink: RefCell<Option<EventSink>>,
}

impl SimulatedHost {
    pub fn new(http: HttpBackend) -> Self {
        Self {
            state: RefCell::new(SimState::default()),
            http,
            sink: RefCell::new(None),
        }
    }

    /// Simulator with canned HTTP responses only
    pub fn offline() -> Self {
        Self::new(HttpBackend::canned())
    }

    pub fn set_http_response(&self, url: &str, response: HttpResponse) {
        match &self.http {
            HttpBackend::Canned(responses) => {
                responses.borrow_mut().insert(url.to_string(), response);
            }
            HttpBackend::Live(_) => {
                log::warn!("Ignoring canned response for {}: live HTTP backend", url);
            }
        }
    }

    pub fn set_failures(&self, failures: Failures) {
        self.state.borrow_mut().failures = failures;
    }

    pub fn set_reported_url_suffix(&self, suffix: &str) {
        self.state.borrow_mut().reported_url_suffix = suffix.to_string();
    }

    /// Answer the next overlay status query late. The answer still reflects
    /// the overlays at the time of the query.
    pub fn delay_next_status(&self, latency: Duration) {
        self.state.borrow_mut().status_latency = Some(latency);
    }

    pub fn set_peripherals(&self, peripherals: Vec<Peripheral>) {
        self.state.borrow_mut().peripherals = peripherals;
    }

    /// Connect an in-room touch panel
    pub fn attach_navigator(&self) {
        self.state.borrow_mut().peripherals.push(Peripheral::new(
            format!("Cisco {}", NAVIGATOR_NAME_SUFFIX),
            PeripheralLocation::InsideRoom,
        ));
    }

    pub fn detach_navigators(&self) {
        self.state
            .borrow_mut()
            .peripherals
            .retain(|p| !p.name.ends_with(NAVIGATOR_NAME_SUFFIX));
    }

    /// Close an overlay from the host side, as a user dismissing it would
    pub fn dismiss(&self, surface: Surface) {
        let removed = self.state.borrow_mut().overlays.remove(&surface).is_some();
        if removed {
            self.emit(HostEvent::OverlaysChanged);
        }
    }

    /// Recorded commands, oldest first
    pub fn commands(&self) -> Vec<HostCommand> {
        self.state.borrow().commands.clone()
    }

    pub fn clear_commands(&self) {
        self.state.borrow_mut().commands.clear();
    }

    /// Count of recorded commands matching `pred`
    pub fn count_commands(&self, pred: impl Fn(&HostCommand) -> bool) -> usize {
        self.state.borrow().commands.iter().filter(|c| pred(c)).count()
    }

    pub fn overlay_on(&self, surface: Surface) -> Option<VisibleOverlay> {
        self.state.borrow().overlays.get(&surface).cloned()
    }

    pub fn widget_value(&self, widget_id: &str) -> Option<WidgetValue> {
        self.state.borrow().widget_values.get(widget_id).copied()
    }

    /// Widget ids of a registered panel, in layout order
    pub fn widget_ids(&self, panel_id: &str) -> Vec<String> {
        self.state
            .borrow()
            .panels
            .get(panel_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn feature_enabled(&self, feature: GlobalFeature) -> bool {
        self.state
            .borrow()
            .features
            .get(&feature)
            .copied()
            .unwrap_or(false)
    }

    fn record(&self, command: HostCommand) {
        trace!("Host command: {:?}", command);
        self.state.borrow_mut().commands.push(command);
    }

    /// Deliver an event to the subscriber, if any
    pub fn emit(&self, event: HostEvent) {
        if let Some(sink) = self.sink.borrow().as_ref() {
            if sink.send(event).is_err() {
                debug!("Event subscriber has gone away");
            }
        }
    }

    fn navigator_in_room(&self) -> bool {
        self.state.borrow().peripherals.iter().any(|p| {
            p.name.ends_with(NAVIGATOR_NAME_SUFFIX) && p.location == PeripheralLocation::InsideRoom
        })
    }
}

impl Host for SimulatedHost {
    async fn set_global_mode(&self, feature: GlobalFeature, on: bool) -> HostResult<()> {
        self.record(HostCommand::SetGlobalMode(feature, on));
        self.state.borrow_mut().features.insert(feature, on);
        Ok(())
    }

    async fn query_peripherals(&self) -> HostResult<Vec<Peripheral>> {
        let state = self.state.borrow();
        if state.failures.peripherals {
            return Err(HostError::Transport("peripheral status unavailable".to_string()));
        }
        Ok(state.peripherals.clone())
    }

    async fn display_overlay(&self, request: &OverlayRequest) -> HostResult<()> {
        self.record(HostCommand::DisplayOverlay(request.clone()));
        if self.state.borrow().failures.display {
            return Err(HostError::Rejected {
                command: "DisplayOverlay",
                reason: "simulated failure".to_string(),
            });
        }
        if request.target == Surface::Controller && !self.navigator_in_room() {
            return Err(HostError::Rejected {
                command: "DisplayOverlay",
                reason: "no touch panel attached".to_string(),
            });
        }
        {
            let mut state = self.state.borrow_mut();
            let url = format!("{}{}", request.url, state.reported_url_suffix);
            state.overlays.insert(
                request.target,
                VisibleOverlay {
                    url,
                    kind: OverlayKind::Integration,
                    status: OverlayStatus::Visible,
                },
            );
        }
        self.emit(HostEvent::OverlaysChanged);
        Ok(())
    }

    async fn clear_overlay(&self, target: Surface) -> HostResult<()> {
        self.record(HostCommand::ClearOverlay(target));
        if self.state.borrow().failures.clear {
            return Err(HostError::Rejected {
                command: "ClearOverlay",
                reason: "simulated failure".to_string(),
            });
        }
        let removed = self.state.borrow_mut().overlays.remove(&target).is_some();
        if removed {
            self.emit(HostEvent::OverlaysChanged);
        }
        Ok(())
    }

    async fn query_visible_overlays(&self) -> HostResult<Vec<VisibleOverlay>> {
        let (answer, latency) = {
            let mut state = self.state.borrow_mut();
            let answer = if state.failures.overlays {
                Err(HostError::Transport("overlay status unavailable".to_string()))
            } else {
                Ok(Surface::ALL
                    .iter()
                    .filter_map(|s| state.overlays.get(s).cloned())
                    .collect())
            };
            (answer, state.status_latency.take())
        };
        if let Some(latency) = latency {
            trace!("Delaying overlay status by {:?}", latency);
            tokio::time::sleep(latency).await;
        }
        answer
    }

    async fn set_button_state(&self, widget_id: &str, value: WidgetValue) -> HostResult<()> {
        self.record(HostCommand::SetButtonState(widget_id.to_string(), value));
        let mut state = self.state.borrow_mut();
        let known = state
            .panels
            .values()
            .any(|ids| ids.iter().any(|id| id == widget_id));
        if !known {
            return Err(HostError::Rejected {
                command: "SetButtonState",
                reason: format!("no widget {}", widget_id),
            });
        }
        state.widget_values.insert(widget_id.to_string(), value);
        Ok(())
    }

    async fn register_panel(&self, panel_id: &str, description: &str) -> HostResult<()> {
        self.record(HostCommand::RegisterPanel(panel_id.to_string()));
        let ids: Vec<String> = WIDGET_ID_PATTERN
            .captures_iter(description)
            .map(|c| c[1].to_string())
            .collect();
        let mut state = self.state.borrow_mut();
        if let Some(previous) = state.panels.insert(panel_id.to_string(), ids) {
            for id in previous {
                state.widget_values.remove(&id);
            }
        }
        Ok(())
    }

    fn subscribe(&self, sink: EventSink) {
        *self.sink.borrow_mut() = Some(sink);
    }

    async fn http_get(&self, url: &str) -> HostResult<HttpResponse> {
        self.record(HostCommand::HttpGet(url.to_string()));
        match &self.http {
            HttpBackend::Canned(responses) => responses
                .borrow()
                .get(url)
                .cloned()
                .ok_or_else(|| HostError::Transport(format!("no route to {}", url))),
            HttpBackend::Live(client) => {
                let response = client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| HostError::Transport(e.to_string()))?;
                let status_code = response.status().as_u16();
                let body = response
                    .text()
                    .await
                    .map_err(|e| HostError::Transport(e.to_string()))?;
                Ok(HttpResponse { status_code, body })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userguide_types::OverlayMode;

    fn request(target: Surface) -> OverlayRequest {
        OverlayRequest {
            mode: OverlayMode::Modal,
            title: "A".to_string(),
            target,
            url: "https://example.com/a".to_string(),
        }
    }

    #[tokio::test]
    async fn test_one_overlay_per_surface() {
        let host = SimulatedHost::offline();
        host.display_overlay(&request(Surface::Osd)).await.unwrap();
        let mut second = request(Surface::Osd);
        second.url = "https://example.com/b".to_string();
        host.display_overlay(&second).await.unwrap();

        let overlays = host.query_visible_overlays().await.unwrap();
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].url, "https://example.com/b");
    }

    #[tokio::test]
    async fn test_controller_requires_navigator() {
        let host = SimulatedHost::offline();
        assert!(host.display_overlay(&request(Surface::Controller)).await.is_err());

        host.attach_navigator();
        assert!(host.display_overlay(&request(Surface::Controller)).await.is_ok());
    }

    #[tokio::test]
    async fn test_register_panel_extracts_widget_ids() {
        let host = SimulatedHost::offline();
        let xml = "<Row><Widget><WidgetId>p-option-1</WidgetId></Widget></Row>\
                   <Row><Widget><WidgetId>p-option-2</WidgetId></Widget></Row>";
        host.register_panel("p", xml).await.unwrap();

        assert_eq!(host.widget_ids("p"), vec!["p-option-1", "p-option-2"]);
        assert!(host.set_button_state("p-option-2", WidgetValue::Active).await.is_ok());
        assert!(host.set_button_state("p-option-9", WidgetValue::Active).await.is_err());
    }

    #[tokio::test]
    async fn test_changes_are_notified() {
        let host = SimulatedHost::offline();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        host.subscribe(tx);

        host.display_overlay(&request(Surface::Osd)).await.unwrap();
        host.clear_overlay(Surface::Osd).await.unwrap();
        // Clearing an empty surface is silent
        host.clear_overlay(Surface::Osd).await.unwrap();

        assert_eq!(rx.try_recv().unwrap(), HostEvent::OverlaysChanged);
        assert_eq!(rx.try_recv().unwrap(), HostEvent::OverlaysChanged);
        assert!(rx.try_recv().is_err());
    }
}
