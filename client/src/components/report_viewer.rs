//! Full-size report viewer for the selected tile.

#[cfg(test)]
#[path = "report_viewer_test.rs"]
mod report_viewer_test;

use leptos::prelude::*;

use crate::tiles::TileConfig;

pub const BACK_LABEL: &str = "Back to dashboard";
pub const PLACEHOLDER_TITLE: &str = "Power BI report link not configured.";
pub const PLACEHOLDER_DETAIL: &str = "Once assigned, the analytics view will render here.";

/// Viewer body for a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReportBody {
    Frame(&'static str),
    Placeholder,
}

impl ReportBody {
    fn for_tile(tile: &TileConfig) -> Self {
        match tile.report_url {
            Some(url) if tile.is_configured() => Self::Frame(url),
            _ => Self::Placeholder,
        }
    }
}

#[component]
pub fn ReportViewer(tile: TileConfig, on_back: Callback<()>) -> impl IntoView {
    let body = match ReportBody::for_tile(&tile) {
        ReportBody::Frame(url) => view! {
            <iframe class="report-viewer__frame" src=url title=tile.label allowfullscreen=true></iframe>
        }
        .into_any(),
        ReportBody::Placeholder => view! {
            <div class="report-viewer__placeholder">
                <p class="report-viewer__placeholder-title">{PLACEHOLDER_TITLE}</p>
                <p class="report-viewer__placeholder-detail">{PLACEHOLDER_DETAIL}</p>
            </div>
        }
        .into_any(),
    };

    view! {
        <div class="report-viewer">
            <div class="report-viewer__bar">
                <button class="btn report-viewer__back" on:click=move |_| on_back.run(())>
                    "← "
                    {BACK_LABEL}
                </button>
                <h2 class="report-viewer__title">{tile.label}</h2>
            </div>
            <div class="report-viewer__body">{body}</div>
        </div>
    }
}
