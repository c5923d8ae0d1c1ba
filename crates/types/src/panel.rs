//! Panel appearance configuration

use serde::{Deserialize, Serialize};

/// Where the panel's launcher button appears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelLocation {
    HomeScreen,
    HomeScreenAndCallControls,
}

/// Launcher type matching a [`PanelLocation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelType {
    Home,
    Statusbar,
}

/// Appearance of the panel launcher and its page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonConfig {
    /// Launcher label and page title
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    /// One of the host's prebuilt icon names (e.g. "Help", "Concierge", "Tv")
    #[serde(default = "default_icon")]
    pub icon: String,
    /// Also show the launcher during calls
    #[serde(default = "default_true")]
    pub show_in_call: bool,
}

fn default_name() -> String {
    "User Guide".to_string()
}

fn default_color() -> String {
    "#6F739E".to_string()
}

fn default_icon() -> String {
    "Help".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            color: default_color(),
            icon: default_icon(),
            show_in_call: true,
        }
    }
}

impl ButtonConfig {
    pub fn location(&self) -> PanelLocation {
        if self.show_in_call {
            PanelLocation::HomeScreenAndCallControls
        } else {
            PanelLocation::HomeScreen
        }
    }

    pub fn panel_type(&self) -> PanelType {
        if self.show_in_call {
            PanelType::Statusbar
        } else {
            PanelType::Home
        }
    }
}
