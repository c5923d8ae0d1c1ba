//! Host status records: peripherals, visible overlays and widget values

use serde::{Deserialize, Serialize};

/// Where the host reports a peripheral to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeripheralLocation {
    InsideRoom,
    OutsideRoom,
    #[serde(other)]
    Unknown,
}

/// A connected peripheral as reported by the inventory query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peripheral {
    pub name: String,
    pub location: PeripheralLocation,
}

impl Peripheral {
    pub fn new(name: impl Into<String>, location: PeripheralLocation) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// Kind of overlay reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayKind {
    /// Opened by an integration such as this one
    Integration,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayStatus {
    Visible,
    NotVisible,
    #[serde(other)]
    Unknown,
}

/// One overlay currently known to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleOverlay {
    /// URL as reported back; the host may have appended query parameters
    pub url: String,
    pub kind: OverlayKind,
    pub status: OverlayStatus,
}

impl VisibleOverlay {
    pub fn integration(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: OverlayKind::Integration,
            status: OverlayStatus::Visible,
        }
    }
}

/// Value pushed to a panel button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WidgetValue {
    Active,
    #[default]
    Inactive,
}

impl WidgetValue {
    pub fn from_active(active: bool) -> Self {
        if active {
            WidgetValue::Active
        } else {
            WidgetValue::Inactive
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, WidgetValue::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetValue::Active => "active",
            WidgetValue::Inactive => "inactive",
        }
    }
}
