//! Catalog content items

use crate::surface::Surface;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// How the overlay is presented; passed through to the host untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OverlayMode {
    Fullscreen,
    #[default]
    Modal,
}

impl OverlayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayMode::Fullscreen => "Fullscreen",
            OverlayMode::Modal => "Modal",
        }
    }
}

fn default_target() -> Surface {
    Surface::Osd
}

/// One selectable piece of content, usually an embedded video.
///
/// The `url` doubles as the identity key when matching a live overlay back
/// to the item it came from (see the reconciler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Button label and overlay title. Not required to be unique.
    pub title: String,
    /// Document to display
    pub url: String,
    /// Requested surface
    #[serde(default = "default_target")]
    pub target: Surface,
    #[serde(default)]
    pub mode: OverlayMode,
    /// Delay before the overlay closes itself; `None` keeps it open.
    /// Written as a number of seconds, fractions allowed.
    #[serde(default, with = "autoclose_secs")]
    pub autoclose: Option<Duration>,
}

impl ContentItem {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            target: Surface::Osd,
            mode: OverlayMode::Modal,
            autoclose: None,
        }
    }

    pub fn with_target(mut self, target: Surface) -> Self {
        self.target = target;
        self
    }

    pub fn with_mode(mut self, mode: OverlayMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_autoclose(mut self, seconds: u64) -> Self {
        self.autoclose = Some(Duration::from_secs(seconds));
        self
    }

    /// Auto-close delay, if any
    pub fn autoclose_after(&self) -> Option<Duration> {
        self.autoclose
    }
}

/// `autoclose` as seconds. Negative, non-finite or out of range values
/// read as no auto-close.
mod autoclose_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) if d.subsec_nanos() == 0 => s.serialize_some(&d.as_secs()),
            Some(d) => s.serialize_some(&d.as_secs_f64()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let seconds = Option::<f64>::deserialize(d)?;
        Ok(seconds.and_then(|secs| Duration::try_from_secs_f64(secs).ok()))
    }
}

/// Opaque identifier of an item within one catalog load.
///
/// A fresh id is minted for every item each time a catalog is loaded, so an
/// id issued for a previous catalog never resolves against a newer one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn mint() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_from_catalog_json() {
        let json = r#"[
            {"title": "A", "url": "u1", "target": "OSD", "mode": "Modal", "autoclose": 30},
            {"title": "B", "url": "u2", "target": "Controller", "mode": "Fullscreen", "autoclose": null},
            {"title": "C", "url": "u3"}
        ]"#;
        let items: Vec<ContentItem> = serde_json::from_str(json).unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].autoclose_after(), Some(Duration::from_secs(30)));
        assert_eq!(items[1].target, Surface::Controller);
        assert_eq!(items[1].mode, OverlayMode::Fullscreen);
        assert_eq!(items[1].autoclose, None);
        assert_eq!(items[2].target, Surface::Osd);
        assert_eq!(items[2].mode, OverlayMode::Modal);
    }

    #[test]
    fn test_fractional_and_invalid_autoclose() {
        let json = r#"[
            {"title": "A", "url": "u1", "autoclose": 2.5},
            {"title": "B", "url": "u2", "autoclose": -4},
            {"title": "C", "url": "u3", "autoclose": 40}
        ]"#;
        let items: Vec<ContentItem> = serde_json::from_str(json).unwrap();

        assert_eq!(items[0].autoclose_after(), Some(Duration::from_millis(2500)));
        assert_eq!(items[1].autoclose_after(), None);
        assert_eq!(items[2].autoclose_after(), Some(Duration::from_secs(40)));

        let written = serde_json::to_value(&items[2]).unwrap();
        assert_eq!(written["autoclose"], serde_json::json!(40));
    }

    #[test]
    fn test_minted_ids_differ() {
        let a = ItemId::mint();
        let b = ItemId::mint();
        assert_ne!(a, b);
        assert!(!a.as_str().contains('-'));
    }
}
