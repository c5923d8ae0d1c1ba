//! userguide: touch-panel catalog of user-guide videos for collaboration endpoints
//!
//! This library provides:
//! - The content catalog, static or fetched from a content server
//! - Target surface resolution against the live peripheral inventory
//! - Overlay lifecycle management with per-surface auto-close timers
//! - Reconciliation of button state against visible overlays
//! - Panel rendering and the event dispatcher tying it all together
//! - Configuration management and a simulated endpoint host

pub mod config;
pub mod core;
pub mod host;

// Re-export commonly used types
pub use config::AppConfig;
pub use core::{Dispatcher, DispatcherConfig};
pub use host::SimulatedHost;
