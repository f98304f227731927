//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the auth session from context and render the dashboard
//! surfaces; page modules compose them.

pub mod protected_route;
pub mod report_viewer;
pub mod tile_grid;
