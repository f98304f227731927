//! Tile navigator: which report, if any, fills the viewport.

#[cfg(test)]
#[path = "tiles_test.rs"]
mod tiles_test;

use crate::tiles::{TileConfig, find_tile};

/// Selected tile id; absent means the grid is shown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileNavigator {
    selected: Option<String>,
}

/// What the dashboard body renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigatorView<'a> {
    Grid,
    Report(&'a TileConfig),
}

impl TileNavigator {
    pub fn select(&mut self, id: impl Into<String>) {
        self.selected = Some(id.into());
    }

    /// Return to the grid.
    pub fn back(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Resolve the selection against `tiles`. Unknown ids fall back to the grid.
    pub fn view<'a>(&self, tiles: &'a [TileConfig]) -> NavigatorView<'a> {
        self.selected
            .as_deref()
            .and_then(|id| find_tile(tiles, id))
            .map_or(NavigatorView::Grid, NavigatorView::Report)
    }
}
