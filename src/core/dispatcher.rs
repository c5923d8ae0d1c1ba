//! Event dispatcher
//!
//! Entry point wiring host events to the components: button taps toggle
//! overlays, opening the panel refreshes the catalog, and overlay changes
//! trigger reconciliation. Each event is handled as its own local task, so
//! handlers interleave at their suspension points.

use crate::core::catalog::{CatalogSource, CatalogStore};
use crate::core::overlay_manager::OverlayManager;
use crate::core::panel_builder::{parse_option_widget_id, PanelBuilder};
use crate::core::reconciler::Reconciler;
use log::{debug, info, trace, warn};
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use userguide_core::{GlobalFeature, Host, HostEvent, STARTUP_DELAY};
use userguide_types::{ButtonConfig, PanelClicked, WidgetAction, WidgetActionType};

/// Everything the dispatcher needs to know about its deployment
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub panel_id: String,
    pub button: ButtonConfig,
    pub source: CatalogSource,
    pub startup_delay: Duration,
    pub enable_audio_output: bool,
}

impl DispatcherConfig {
    pub fn new(panel_id: impl Into<String>, source: CatalogSource) -> Self {
        Self {
            panel_id: panel_id.into(),
            button: ButtonConfig::default(),
            source,
            startup_delay: STARTUP_DELAY,
            enable_audio_output: true,
        }
    }
}

pub struct Dispatcher<H: Host> {
    host: Rc<H>,
    config: DispatcherConfig,
    catalog: CatalogStore,
    overlays: Rc<OverlayManager<H>>,
    reconciler: Reconciler<H>,
    panel: PanelBuilder,
    /// Reconciliations read, catalog swaps write
    sync_gate: RwLock<()>,
}

impl<H: Host + 'static> Dispatcher<H> {
    pub fn new(host: Rc<H>, config: DispatcherConfig) -> Rc<Self> {
        Rc::new(Self {
            catalog: CatalogStore::new(config.source.clone()),
            overlays: OverlayManager::new(Rc::clone(&host)),
            reconciler: Reconciler::new(Rc::clone(&host), config.panel_id.clone()),
            panel: PanelBuilder::new(config.panel_id.clone(), config.button.clone()),
            sync_gate: RwLock::new(()),
            host,
            config,
        })
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn overlays(&self) -> &Rc<OverlayManager<H>> {
        &self.overlays
    }

    pub fn reconciler(&self) -> &Reconciler<H> {
        &self.reconciler
    }

    /// Enable host features, load the catalog, publish the panel and
    /// reconcile once
    pub async fn startup(&self) {
        self.enable(GlobalFeature::WebEngine).await;
        if self.catalog.source().is_remote() {
            self.enable(GlobalFeature::HttpClient).await;
        }

        let items = self.catalog.load(self.host.as_ref()).await;
        {
            let _swap = self.sync_gate.write().await;
            let catalog = self.catalog.install(items);
            self.panel.publish(self.host.as_ref(), &catalog).await;
        }
        self.reconcile().await;
    }

    /// Start up, subscribe and handle events until the host goes away.
    ///
    /// Must run inside a `tokio::task::LocalSet`.
    pub async fn run(self: Rc<Self>) {
        if !self.config.startup_delay.is_zero() {
            tokio::time::sleep(self.config.startup_delay).await;
        }
        self.startup().await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        self.host.subscribe(tx);
        if self.config.enable_audio_output {
            self.enable(GlobalFeature::WebEngineAudioOutput).await;
        }
        info!("Listening for events on panel [{}]", self.config.panel_id);

        while let Some(event) = rx.recv().await {
            let dispatcher = Rc::clone(&self);
            tokio::task::spawn_local(async move {
                dispatcher.handle(event).await;
            });
        }
        debug!("Event stream closed");
    }

    pub async fn handle(&self, event: HostEvent) {
        trace!("Event: {:?}", event);
        match event {
            HostEvent::WidgetAction(action) => self.on_widget_action(&action).await,
            HostEvent::PanelClicked(clicked) => self.on_panel_clicked(&clicked).await,
            HostEvent::OverlaysChanged => self.reconcile().await,
        }
    }

    async fn on_widget_action(&self, action: &WidgetAction) {
        if action.action != WidgetActionType::Clicked {
            return;
        }
        let Some(id) = parse_option_widget_id(&self.config.panel_id, &action.widget_id) else {
            return;
        };

        // Resolve against the catalog in place when the tap arrived
        let catalog = self.catalog.snapshot();
        let Some(entry) = catalog.get(&id) else {
            warn!(
                "Ignoring tap on {}: not in catalog {}",
                action.widget_id,
                catalog.generation()
            );
            return;
        };

        info!("Button clicked [{}]", entry.item.title);
        let active = self.reconciler.last_known(&entry.id).is_active();
        self.overlays.toggle(&entry.item, active).await;
    }

    async fn on_panel_clicked(&self, clicked: &PanelClicked) {
        if clicked.panel_id != self.config.panel_id {
            return;
        }
        self.refresh().await;
    }

    /// Re-load the catalog; on success swap it in, re-render the panel and
    /// reconcile the new buttons. A failed fetch changes nothing.
    pub async fn refresh(&self) {
        let Some(items) = self.catalog.fetch(self.host.as_ref()).await else {
            return;
        };
        {
            let _swap = self.sync_gate.write().await;
            let catalog = self.catalog.install(items);
            self.panel.publish(self.host.as_ref(), &catalog).await;
        }
        self.reconcile().await;
    }

    pub async fn reconcile(&self) {
        let _read = self.sync_gate.read().await;
        let catalog = self.catalog.snapshot();
        self.reconciler.reconcile(&catalog).await;
    }

    async fn enable(&self, feature: GlobalFeature) {
        if let Err(e) = self.host.set_global_mode(feature, true).await {
            warn!("Failed to enable {:?}: {}", feature, e);
        }
    }
}
