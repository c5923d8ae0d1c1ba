//! Logical display surfaces an overlay can target

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two logical displays of an endpoint.
///
/// `Osd` is the main display and always exists. `Controller` is a secondary
/// touch panel that may or may not be attached; requests for it are
/// resolved against the live peripheral inventory before every use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Surface {
    #[serde(rename = "OSD", alias = "Osd", alias = "osd")]
    Osd,
    #[serde(rename = "Controller", alias = "controller")]
    Controller,
}

impl Surface {
    /// Both surfaces, main display first
    pub const ALL: [Surface; 2] = [Surface::Osd, Surface::Controller];

    /// Name used on the host wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Osd => "OSD",
            Surface::Controller => "Controller",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Surface::Osd).unwrap(), "\"OSD\"");
        let s: Surface = serde_json::from_str("\"Controller\"").unwrap();
        assert_eq!(s, Surface::Controller);
        assert_eq!(Surface::Controller.to_string(), "Controller");
    }
}
