//! Grid of dashboard tiles.

#[cfg(test)]
#[path = "tile_grid_test.rs"]
mod tile_grid_test;

use leptos::prelude::*;

use crate::tiles::TileConfig;

pub const NOT_CONFIGURED_BADGE: &str = "Not configured";

fn tile_badge(tile: &TileConfig) -> Option<&'static str> {
    (!tile.is_configured()).then_some(NOT_CONFIGURED_BADGE)
}

/// Selectable card per tile; the card matching `active` is highlighted.
#[component]
pub fn TileGrid(
    tiles: &'static [TileConfig],
    #[prop(into)] active: Signal<Option<String>>,
    on_select: Callback<String>,
) -> impl IntoView {
    view! {
        <div class="tile-grid">
            {tiles
                .iter()
                .map(|tile| {
                    let id = tile.id;
                    let badge = tile_badge(tile);
                    view! {
                        <button
                            class="tile-card"
                            class:tile-card--active=move || active.get().as_deref() == Some(id)
                            on:click=move |_| on_select.run(id.to_owned())
                        >
                            <span class="tile-card__label">{tile.label}</span>
                            {badge.map(|text| view! { <span class="tile-card__badge">{text}</span> })}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}
