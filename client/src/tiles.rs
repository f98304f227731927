//! Static tile configuration compiled into the app.
//!
//! Each tile opens one embedded report. A tile without `report_url` is valid
//! content that has not been assigned a report yet.

/// One dashboard tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileConfig {
    pub id: &'static str,
    pub label: &'static str,
    pub report_url: Option<&'static str>,
}

impl TileConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.report_url.is_some_and(|url| !url.trim().is_empty())
    }
}

/// Dashboard tiles in display order.
pub const TILE_CONFIG: &[TileConfig] = &[
    TileConfig { id: "executive-summary", label: "Executive Summary", report_url: None },
    TileConfig { id: "sales-performance", label: "Sales Performance", report_url: None },
    TileConfig { id: "finance-overview", label: "Finance Overview", report_url: None },
    TileConfig { id: "operations", label: "Operations", report_url: None },
    TileConfig { id: "inventory", label: "Inventory", report_url: None },
    TileConfig { id: "customer-insights", label: "Customer Insights", report_url: None },
    TileConfig { id: "human-resources", label: "Human Resources", report_url: None },
    TileConfig { id: "procurement", label: "Procurement", report_url: None },
];

/// Tile with `id`, if configured.
#[must_use]
pub fn find_tile<'a>(tiles: &'a [TileConfig], id: &str) -> Option<&'a TileConfig> {
    tiles.iter().find(|tile| tile.id == id)
}
