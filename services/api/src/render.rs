use crate::infra::load_catalog;
use clap::Args;
use propdesk::catalog::{
    CatalogService, PageRequest, PanelRow, PropertyId, PropertyListPanel, PropertyPage,
    PropertyView, SearchQuery,
};
use propdesk::error::AppError;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct PropertiesArgs {
    /// JSON seed file to load (defaults to the built-in demo portfolio)
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
    /// Filter by street address, city, state, zip code, or owner name
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Highlight the property with this id
    #[arg(long)]
    pub(crate) select: Option<String>,
    /// Page number (1-based)
    #[arg(long, default_value_t = 1)]
    pub(crate) page: u32,
    /// Page size
    #[arg(long, default_value_t = 10)]
    pub(crate) limit: u32,
}

pub(crate) fn run_properties(args: PropertiesArgs) -> Result<(), AppError> {
    let PropertiesArgs {
        seed,
        search,
        select,
        page,
        limit,
    } = args;

    let catalog = load_catalog(seed.as_deref())?;
    let service = CatalogService::new(Arc::new(catalog));
    let result = service.search_properties(&SearchQuery {
        search,
        page: PageRequest::new(page, limit),
    })?;

    print!("{}", render_panel(&result, select.as_deref()));
    Ok(())
}

fn render_panel(result: &PropertyPage, select: Option<&str>) -> String {
    let mut panel = PropertyListPanel::new(&result.properties);
    let mut out = String::new();

    if let Some(id) = select {
        if panel.select(&PropertyId::from(id)).is_none() {
            let _ = writeln!(out, "Property {id} is not on this page");
        }
    }

    let _ = writeln!(out, "{}", panel.header());
    if result.properties.is_empty() {
        let _ = writeln!(out, "  No properties match.");
    }
    for row in panel.rows() {
        render_row(&mut out, row);
    }

    let pagination = &result.pagination;
    let _ = writeln!(
        out,
        "Page {} of {} | {} total",
        pagination.current_page,
        pagination.total_pages.max(1),
        pagination.total_count
    );

    if let Some(selected) = panel.selected() {
        render_detail(&mut out, selected);
    }
    out
}

fn render_row(out: &mut String, row: PanelRow<'_>) {
    let property = &row.property.property;
    let marker = if row.selected { ">" } else { " " };
    let _ = writeln!(
        out,
        "{marker} {} | {}, {} {}",
        property.street_address, property.city, property.state, property.zip_code
    );

    let mut facts = Vec::new();
    if let Some(price) = property.price {
        facts.push(format!("${price:.0}"));
    }
    if let Some(units) = property.number_of_units {
        facts.push(format!("{units} units"));
    }
    if let Some(square_feet) = property.square_feet {
        facts.push(format!("{square_feet} sq ft"));
    }
    if !facts.is_empty() {
        let _ = writeln!(out, "    {}", facts.join(" | "));
    }
}

fn render_detail(out: &mut String, view: &PropertyView) {
    let property = &view.property;
    let _ = writeln!(out, "\nSelected: {} ({})", property.street_address, property.id);
    if let Some(owner) = &view.owner {
        let _ = writeln!(out, "- Owner: {}", owner.name);
    }
    if let Some(noi) = property.net_operating_income {
        let _ = writeln!(out, "- Net operating income: ${noi:.0}");
    }
    if let Some(roi) = property.return_on_investment {
        let _ = writeln!(out, "- Return on investment: {roi:.1}%");
    }
    if view.lists.is_empty() {
        let _ = writeln!(out, "- Lists: none");
    } else {
        let names: Vec<&str> = view
            .lists
            .iter()
            .map(|membership| membership.list.name.as_str())
            .collect();
        let _ = writeln!(out, "- Lists: {}", names.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propdesk::catalog::CatalogSeed;

    fn demo_page(search: Option<&str>) -> PropertyPage {
        let catalog = CatalogSeed::demo().into_catalog().expect("demo seed");
        CatalogService::new(Arc::new(catalog))
            .search_properties(&SearchQuery {
                search: search.map(str::to_string),
                page: PageRequest::default(),
            })
            .expect("search")
    }

    #[test]
    fn renders_header_and_rows() {
        let output = render_panel(&demo_page(None), None);
        assert!(output.starts_with("Properties (3)\n"));
        assert!(output.contains("Page 1 of 1 | 3 total"));
        assert!(!output.contains("Selected:"));
    }

    #[test]
    fn marks_selected_property_and_lists_memberships() {
        let output = render_panel(&demo_page(None), Some("prop-ingersoll"));
        let selected_line = output
            .lines()
            .find(|line| line.starts_with('>'))
            .expect("selected row");
        assert!(selected_line.contains("Ingersoll"));
        assert!(output.contains("- Lists: Follow Up"));
    }

    #[test]
    fn reports_unknown_selection() {
        let output = render_panel(&demo_page(None), Some("prop-missing"));
        assert!(output.starts_with("Property prop-missing is not on this page"));
        assert!(!output.lines().any(|line| line.starts_with('>')));
    }

    #[test]
    fn empty_search_shows_placeholder() {
        let output = render_panel(&demo_page(Some("no-such-street")), None);
        assert!(output.contains("Properties (0)"));
        assert!(output.contains("No properties match."));
        assert!(output.contains("Page 1 of 1 | 0 total"));
    }
}
