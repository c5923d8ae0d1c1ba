//! Declarative panel description
//!
//! One button row per catalog entry, wrapped in a panel carrying the
//! configured icon, color, name and placement. The host only accepts whole
//! panels, so every catalog change re-renders and re-registers everything.

use crate::core::catalog::Catalog;
use log::{info, warn};
use std::fmt::Write;
use userguide_core::{Host, NO_CONTENT_WIDGET_SUFFIX, OPTION_WIDGET_SEGMENT};
use userguide_types::{ButtonConfig, ItemId, PanelLocation, PanelType};

/// Button id for an item: `<panel>-option-<item id>`
pub fn option_widget_id(panel_id: &str, id: &ItemId) -> String {
    format!("{}{}{}", panel_id, OPTION_WIDGET_SEGMENT, id)
}

/// Item id encoded in a button id of this panel, if it is one
pub fn parse_option_widget_id(panel_id: &str, widget_id: &str) -> Option<ItemId> {
    let id = widget_id
        .strip_prefix(panel_id)?
        .strip_prefix(OPTION_WIDGET_SEGMENT)?;
    if id.is_empty() {
        None
    } else {
        Some(ItemId::from(id))
    }
}

pub fn no_content_widget_id(panel_id: &str) -> String {
    format!("{}{}", panel_id, NO_CONTENT_WIDGET_SUFFIX)
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn location_name(location: PanelLocation) -> &'static str {
    match location {
        PanelLocation::HomeScreen => "HomeScreen",
        PanelLocation::HomeScreenAndCallControls => "HomeScreenAndCallControls",
    }
}

fn type_name(panel_type: PanelType) -> &'static str {
    match panel_type {
        PanelType::Home => "Home",
        PanelType::Statusbar => "Statusbar",
    }
}

pub struct PanelBuilder {
    panel_id: String,
    button: ButtonConfig,
}

impl PanelBuilder {
    pub fn new(panel_id: impl Into<String>, button: ButtonConfig) -> Self {
        Self {
            panel_id: panel_id.into(),
            button,
        }
    }

    /// Panel description for `catalog`
    pub fn render(&self, catalog: &Catalog) -> String {
        let mut rows = String::new();
        if catalog.is_empty() {
            // An empty page is never shown; explain instead
            let _ = write!(
                rows,
                "<Row><Widget>\
                 <WidgetId>{}</WidgetId>\
                 <Name>No Content Available</Name>\
                 <Type>Text</Type>\
                 <Options>size=4;fontSize=normal;align=center</Options>\
                 </Widget></Row>",
                escape_xml(&no_content_widget_id(&self.panel_id))
            );
        } else {
            for entry in catalog.entries() {
                let _ = write!(
                    rows,
                    "<Row><Widget>\
                     <WidgetId>{}</WidgetId>\
                     <Name>{}</Name>\
                     <Type>Button</Type>\
                     <Options>size=4</Options>\
                     </Widget></Row>",
                    escape_xml(&option_widget_id(&self.panel_id, &entry.id)),
                    escape_xml(&entry.item.title)
                );
            }
        }

        let name = escape_xml(&self.button.name);
        format!(
            "<Extensions><Panel>\
             <Location>{}</Location>\
             <Type>{}</Type>\
             <Icon>{}</Icon>\
             <Color>{}</Color>\
             <Name>{}</Name>\
             <ActivityType>Custom</ActivityType>\
             <Page><Name>{}</Name>{}<Options>hideRowNames=1</Options></Page>\
             </Panel></Extensions>",
            location_name(self.button.location()),
            type_name(self.button.panel_type()),
            escape_xml(&self.button.icon),
            escape_xml(&self.button.color),
            name,
            name,
            rows
        )
    }

    /// Render `catalog` and register it, replacing the previous panel
    pub async fn publish<H: Host>(&self, host: &H, catalog: &Catalog) {
        if catalog.is_empty() {
            info!("No content available to show for [{}]", self.panel_id);
        }
        info!(
            "Creating panel [{}] with {} items",
            self.panel_id,
            catalog.len()
        );
        let description = self.render(catalog);
        if let Err(e) = host.register_panel(&self.panel_id, &description).await {
            warn!("Failed to register panel [{}]: {}", self.panel_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userguide_types::ContentItem;

    #[test]
    fn test_widget_id_round_trip() {
        let id = ItemId::mint();
        let widget = option_widget_id("userguide", &id);
        assert_eq!(parse_option_widget_id("userguide", &widget), Some(id));
    }

    #[test]
    fn test_foreign_widget_ids_are_rejected() {
        assert_eq!(parse_option_widget_id("userguide", "other-option-abc"), None);
        assert_eq!(parse_option_widget_id("userguide", "userguide-no-content"), None);
        assert_eq!(parse_option_widget_id("userguide", "userguide-option-"), None);
    }

    #[test]
    fn test_one_row_per_item() {
        let catalog = Catalog::new(vec![ContentItem::new("A", "u1"), ContentItem::new("B", "u2")]);
        let xml = PanelBuilder::new("userguide", ButtonConfig::default()).render(&catalog);

        assert_eq!(xml.matches("<Row>").count(), 2);
        for entry in catalog.entries() {
            assert!(xml.contains(&option_widget_id("userguide", &entry.id)));
        }
        assert!(xml.contains("<Location>HomeScreenAndCallControls</Location>"));
        assert!(xml.contains("<Type>Statusbar</Type>"));
        assert!(xml.contains("<Icon>Help</Icon>"));
        assert!(xml.contains("<Color>#6F739E</Color>"));
        assert!(xml.contains("<Name>User Guide</Name>"));
    }

    #[test]
    fn test_empty_catalog_renders_notice() {
        let button = ButtonConfig {
            show_in_call: false,
            ..Default::default()
        };
        let xml = PanelBuilder::new("userguide", button).render(&Catalog::empty());

        assert_eq!(xml.matches("<Row>").count(), 1);
        assert!(xml.contains("<WidgetId>userguide-no-content</WidgetId>"));
        assert!(xml.contains("<Type>Text</Type>"));
        assert!(!xml.contains("<Type>Button</Type>"));
        assert!(xml.contains("<Location>HomeScreen</Location>"));
        assert!(xml.contains("<Type>Home</Type>"));
    }

    #[test]
    fn test_titles_are_escaped() {
        let catalog = Catalog::new(vec![ContentItem::new("Q&A <live>", "u1")]);
        let xml = PanelBuilder::new("userguide", ButtonConfig::default()).render(&catalog);
        assert!(xml.contains("<Name>Q&amp;A &lt;live&gt;</Name>"));
    }
}
