//! Shared constants

use std::time::Duration;

/// Panel namespace used when none is configured
pub const DEFAULT_PANEL_ID: &str = "userguide";

/// Separator between the panel namespace and an item id in button ids
pub const OPTION_WIDGET_SEGMENT: &str = "-option-";

/// Suffix of the informational row shown for an empty catalog
pub const NO_CONTENT_WIDGET_SUFFIX: &str = "-no-content";

/// Peripheral names ending with this are secondary touch panels
pub const NAVIGATOR_NAME_SUFFIX: &str = "Room Navigator";

pub const HTTP_STATUS_OK: u16 = 200;

/// Grace period before the panel is first published
pub const STARTUP_DELAY: Duration = Duration::from_millis(1000);
