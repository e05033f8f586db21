use super::domain::PropertyId;
use super::views::PropertyView;

/// Selection state for a rendered list of properties.
///
/// Selecting a property yields the row index that should be scrolled into view.
#[derive(Debug)]
pub struct PropertyListPanel<'a> {
    properties: &'a [PropertyView],
    selected: Option<usize>,
}

/// One rendered row of the panel.
#[derive(Debug, Clone, Copy)]
pub struct PanelRow<'a> {
    pub property: &'a PropertyView,
    pub selected: bool,
}

impl<'a> PropertyListPanel<'a> {
    pub fn new(properties: &'a [PropertyView]) -> Self {
        Self {
            properties,
            selected: None,
        }
    }

    pub fn header(&self) -> String {
        format!("Properties ({})", self.properties.len())
    }

    /// Select by id. Unknown ids leave the current selection untouched.
    pub fn select(&mut self, id: &PropertyId) -> Option<usize> {
        let index = self
            .properties
            .iter()
            .position(|view| &view.property.id == id)?;
        self.selected = Some(index);
        Some(index)
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&'a PropertyView> {
        let properties = self.properties;
        self.selected.map(|index| &properties[index])
    }

    /// Whether a "clear selection" affordance should be offered.
    pub fn can_clear(&self) -> bool {
        self.selected.is_some()
    }

    pub fn rows(&self) -> impl Iterator<Item = PanelRow<'a>> + 'a {
        let selected = self.selected;
        let properties: &'a [PropertyView] = self.properties;
        properties
            .iter()
            .enumerate()
            .map(move |(index, property)| PanelRow {
                property,
                selected: selected == Some(index),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed::CatalogSeed;
    use crate::catalog::{CatalogService, SearchQuery};
    use std::sync::Arc;

    fn views() -> Vec<PropertyView> {
        let catalog = CatalogSeed::demo().into_catalog().expect("demo seed");
        let service = CatalogService::new(Arc::new(catalog));
        service
            .search_properties(&SearchQuery::default())
            .expect("search")
            .properties
    }

    #[test]
    fn header_counts_properties() {
        let views = views();
        let panel = PropertyListPanel::new(&views);
        assert_eq!(panel.header(), "Properties (3)");
        assert!(!panel.can_clear());
    }

    #[test]
    fn selecting_returns_scroll_target() {
        let views = views();
        let mut panel = PropertyListPanel::new(&views);
        let target = views[1].property.id.clone();

        assert_eq!(panel.select(&target), Some(1));
        assert_eq!(panel.selected().map(|view| &view.property.id), Some(&target));
        assert_eq!(panel.rows().filter(|row| row.selected).count(), 1);

        assert_eq!(panel.select(&PropertyId::from("nope")), None);
        assert_eq!(panel.selected().map(|view| &view.property.id), Some(&target));

        panel.deselect();
        assert!(panel.selected().is_none());
        assert!(panel.rows().all(|row| !row.selected));
    }
}
