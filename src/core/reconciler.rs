//! Presentation state reconciliation
//!
//! Button state is derived, never advanced on its own: every pass asks the
//! host which overlays are visible and pushes `active`/`inactive` to every
//! button of the catalog snapshot. The host drops identical pushes, so each
//! pass is a full, idempotent recomputation.
//!
//! Passes may overlap. Only the most recently started pass may publish or
//! push; an older pass whose status answer arrives late is dropped.
//!
//! An item counts as visible when a visible integration overlay's reported
//! URL *contains* the item URL. The host may append query parameters to a
//! URL before reporting it. Two items whose URLs share a prefix can both
//! match the same overlay.

use crate::core::catalog::Catalog;
use crate::core::panel_builder::option_widget_id;
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use userguide_core::{Host, VisibleOverlay, WidgetValue};
use userguide_types::{ContentItem, ItemId, OverlayKind, OverlayStatus};

/// Whether any overlay in `overlays` shows `item`
pub fn is_item_visible(item: &ContentItem, overlays: &[VisibleOverlay]) -> bool {
    overlays.iter().any(|overlay| {
        overlay.url.contains(&item.url)
            && overlay.kind == OverlayKind::Integration
            && overlay.status == OverlayStatus::Visible
    })
}

/// Visibility of every catalog entry, in catalog order
pub fn visible_entries(catalog: &Catalog, overlays: &[VisibleOverlay]) -> Vec<bool> {
    catalog
        .items()
        .map(|item| is_item_visible(item, overlays))
        .collect()
}

pub struct Reconciler<H: Host> {
    host: Rc<H>,
    panel_id: String,
    /// Last value pushed per item of the last reconciled catalog
    last_known: RefCell<HashMap<ItemId, WidgetValue>>,
    /// Sequence number of the latest pass started
    latest_pass: Cell<u64>,
}

impl<H: Host> Reconciler<H> {
    pub fn new(host: Rc<H>, panel_id: impl Into<String>) -> Self {
        Self {
            host,
            panel_id: panel_id.into(),
            last_known: RefCell::new(HashMap::new()),
            latest_pass: Cell::new(0),
        }
    }

    /// Last state pushed for `id`; inactive if never reconciled
    pub fn last_known(&self, id: &ItemId) -> WidgetValue {
        self.last_known
            .borrow()
            .get(id)
            .copied()
            .unwrap_or_default()
    }

    /// Recompute and push the state of every button in `catalog`.
    ///
    /// If the overlay status cannot be read, buttons are left as they are.
    /// A pass superseded by a newer one stops without touching anything
    /// further.
    pub async fn reconcile(&self, catalog: &Catalog) {
        let pass = self.latest_pass.get() + 1;
        self.latest_pass.set(pass);
        debug!("Updating UI for panel [{}] (pass {})", self.panel_id, pass);

        let overlays = match self.host.query_visible_overlays().await {
            Ok(overlays) => overlays,
            Err(e) => {
                warn!("Cannot read overlay status for [{}]: {}", self.panel_id, e);
                return;
            }
        };
        if self.is_superseded(pass) {
            return;
        }
        debug!("Number of overlays [{}]", overlays.len());

        let visibility = visible_entries(catalog, &overlays);
        let mut states = HashMap::with_capacity(catalog.len());
        for (entry, visible) in catalog.entries().iter().zip(visibility) {
            states.insert(entry.id.clone(), WidgetValue::from_active(visible));
        }
        // Publish before pushing so taps arriving meanwhile see this pass
        *self.last_known.borrow_mut() = states.clone();

        let mut active = 0;
        for entry in catalog.entries() {
            if self.is_superseded(pass) {
                return;
            }
            let value = states[&entry.id];
            if value.is_active() {
                active += 1;
            }
            let widget_id = option_widget_id(&self.panel_id, &entry.id);
            if let Err(e) = self.host.set_button_state(&widget_id, value).await {
                warn!("Failed to set {} on {}: {}", value.as_str(), widget_id, e);
            }
        }
        info!(
            "Reconciled panel [{}]: {} of {} items visible",
            self.panel_id,
            active,
            catalog.len()
        );
    }

    fn is_superseded(&self, pass: u64) -> bool {
        let latest = self.latest_pass.get();
        if latest != pass {
            debug!("Dropping reconcile pass {}: pass {} started since", pass, latest);
            return true;
        }
        false
    }
}
