//! Presentation-state synchronization engine

pub mod catalog;
pub mod dispatcher;
pub mod overlay_manager;
pub mod panel_builder;
pub mod reconciler;
pub mod target_resolver;

pub use catalog::{Catalog, CatalogEntry, CatalogSource, CatalogStore};
pub use dispatcher::{Dispatcher, DispatcherConfig};
pub use overlay_manager::{OverlayManager, SurfaceState, TimerRegistry};
pub use panel_builder::PanelBuilder;
pub use reconciler::Reconciler;
pub use target_resolver::TargetResolver;
